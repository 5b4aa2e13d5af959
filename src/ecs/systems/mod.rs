pub mod presentation;
pub mod siege;
pub mod threat;
