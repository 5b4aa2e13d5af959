pub mod structural;

pub use structural::{MemberOf, MemberOfSources};
