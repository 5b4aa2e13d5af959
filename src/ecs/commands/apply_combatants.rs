use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::CombatantState;
use crate::ecs::events::{SiegeEvent, emit};
use crate::ecs::resources::{SessionRegistry, SiegePhase};
use crate::ecs::spawn;
use crate::ecs::systems::siege::orchestrator;

pub(crate) fn apply_damage_combatant(world: &mut World, combatant: Entity, amount: f64) {
    if amount <= 0.0 {
        return;
    }
    let Some(mut state) = world.get_mut::<CombatantState>(combatant) else {
        tracing::debug!("damage against unresolved combatant {combatant:?} skipped");
        return;
    };
    state.health = (state.health - amount).max(0.0);
    if state.health <= 0.0 {
        apply_slay_combatant(world, combatant);
    }
}

/// Death notification: despawn, count the death once, and clear the wave on zero.
pub(crate) fn apply_slay_combatant(world: &mut World, combatant: Entity) {
    let Some(state) = world.get::<CombatantState>(combatant).cloned() else {
        tracing::debug!("death of unresolved combatant {combatant:?} ignored");
        return;
    };
    let sim_id = spawn::despawn_combatant(world, combatant);

    let settlement = state.settlement;
    let (cleared, title, fraction) = {
        let mut registry = world.resource_mut::<SessionRegistry>();
        let Some(session) = registry.get_mut(settlement) else {
            tracing::debug!("combatant {combatant:?} died with no live session");
            return;
        };
        if !session.owns(combatant)
            || state.wave != session.wave
            || session.phase != SiegePhase::WaveActive
        {
            return;
        }
        let cleared = session.record_death();
        session.fallen.extend(sim_id);
        (
            cleared,
            session.indicator.title(),
            session.indicator.fraction(),
        )
    };

    emit(
        world,
        SiegeEvent::ProgressUpdated {
            settlement,
            title,
            fraction,
        },
    );
    if cleared {
        orchestrator::on_wave_cleared(world, settlement);
    }
}
