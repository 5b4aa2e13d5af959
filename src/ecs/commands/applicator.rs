use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use super::apply_combatants;
use super::apply_siege;
use super::apply_structures;
use super::{SiegeCommand, SiegeCommandKind};

/// Exclusive system that drains all pending `SiegeCommand` messages and
/// applies them in write order.
///
/// Runs in `SimPhase::PostUpdate`. Each command is applied in isolation: a
/// command whose target has vanished is skipped without affecting the rest.
pub fn apply_siege_commands(world: &mut World) {
    let commands: Vec<SiegeCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<SiegeCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    for cmd in commands {
        match cmd.kind {
            SiegeCommandKind::DamageStructure { structure, amount } => {
                apply_structures::apply_damage_structure(world, structure, amount, cmd.issued_by);
            }
            SiegeCommandKind::DamageCombatant { combatant, amount } => {
                apply_combatants::apply_damage_combatant(world, combatant, amount);
            }
            SiegeCommandKind::SlayCombatant { combatant } => {
                apply_combatants::apply_slay_combatant(world, combatant);
            }
            SiegeCommandKind::BeginSiege {
                settlement,
                origin,
                forced,
            } => {
                apply_siege::apply_begin_siege(world, settlement, origin, forced);
            }
            SiegeCommandKind::EndSiege {
                settlement,
                outcome,
            } => {
                apply_siege::apply_end_siege(world, settlement, outcome);
            }
        }
    }
}
