#[macro_use]
mod macros;

pub mod claim;
pub mod effect;
pub mod event;
pub mod position;
pub mod role;
pub mod structure;

pub use claim::{CLAIM_CHUNK_SIZE, ClaimError, ClaimedArea};
pub use effect::{EventEffect, StateChange};
pub use event::{SiegeEventKind, SiegeOutcome};
pub use position::Position;
pub use role::{CombatantRole, HostileKind};
pub use structure::StructureCategory;
