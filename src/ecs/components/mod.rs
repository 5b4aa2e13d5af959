pub mod combatant;
pub mod common;
pub mod player;
pub mod settlement;
pub mod structure;

pub use combatant::{CombatTarget, CombatantState};
pub use common::{Combatant, Player, Settlement, SimEntity, Structure, WorldPos};
pub use player::{PlayerMode, PlayerState};
pub use settlement::{MAX_INTEGRITY, SettlementCore};
pub use structure::StructureState;
