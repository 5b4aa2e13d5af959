pub mod applicator;
mod apply_combatants;
mod apply_siege;
mod apply_structures;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::{Message, Messages};
use bevy_ecs::world::World;

use crate::model::{Position, SiegeOutcome};

pub use applicator::apply_siege_commands;

/// A command describing an intended state change to a siege collaborator.
///
/// Systems emit these via `MessageWriter<SiegeCommand>`; the host writes them
/// with [`submit`]. The applicator in `SimPhase::PostUpdate` applies them in
/// write order, which serialises every same-tick mutation of one structure.
#[derive(Message, Clone, Debug)]
pub struct SiegeCommand {
    pub kind: SiegeCommandKind,
    /// Entity that caused the command, if any.
    pub issued_by: Option<Entity>,
}

impl SiegeCommand {
    pub fn new(kind: SiegeCommandKind) -> Self {
        Self {
            kind,
            issued_by: None,
        }
    }

    pub fn issued_by(mut self, entity: Entity) -> Self {
        self.issued_by = Some(entity);
        self
    }
}

#[derive(Clone, Debug)]
pub enum SiegeCommandKind {
    // -- Structures --
    DamageStructure {
        structure: Entity,
        amount: f64,
    },

    // -- Combatants --
    /// Damage dealt to a hostile by defenders. Reaching zero health kills it.
    DamageCombatant {
        combatant: Entity,
        amount: f64,
    },
    /// Death notification for a hostile.
    SlayCombatant {
        combatant: Entity,
    },

    // -- Lifecycle --
    BeginSiege {
        settlement: Entity,
        origin: Position,
        /// Bypass the cooldown check.
        forced: bool,
    },
    EndSiege {
        settlement: Entity,
        outcome: SiegeOutcome,
    },
}

/// Queue a command from outside the schedule (host input, tests).
pub fn submit(world: &mut World, command: SiegeCommand) {
    if let Some(mut messages) = world.get_resource_mut::<Messages<SiegeCommand>>() {
        messages.write(command);
    }
}
