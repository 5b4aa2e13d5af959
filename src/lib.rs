pub mod ecs;
pub mod flush;
pub mod model;

pub use ecs::{build_siege_app, build_siege_app_with};
pub use flush::flush_to_jsonl;
pub use model::{
    ClaimError, ClaimedArea, CombatantRole, EventEffect, HostileKind, Position, SiegeEventKind,
    SiegeOutcome, StateChange, StructureCategory,
};
