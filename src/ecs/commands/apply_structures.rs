use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{CombatantState, SimEntity, StructureState, WorldPos};
use crate::ecs::events::{SiegeEvent, SoundCue, emit};
use crate::ecs::resources::{log_effect, log_record};
use crate::model::{SiegeEventKind, StateChange};

/// Damage a structure: monotonic health decrement, ruined flag flips once.
pub(crate) fn apply_damage_structure(
    world: &mut World,
    structure: Entity,
    amount: f64,
    attacker: Option<Entity>,
) {
    let Some(mut state) = world.get_mut::<StructureState>(structure) else {
        tracing::debug!("damage against unresolved structure {structure:?} skipped");
        return;
    };
    let before = state.health;
    if !state.apply_damage(amount) {
        return;
    }

    let at = world
        .get::<WorldPos>(structure)
        .map(|p| p.0)
        .unwrap_or_default();
    let name = world
        .get::<SimEntity>(structure)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "structure".to_string());
    // Records are filed under the settlement whose siege did the damage.
    let settlement = attacker
        .and_then(|a| world.get::<CombatantState>(a))
        .map(|c| c.settlement)
        .unwrap_or(structure);

    let event_id = log_record(
        world,
        SiegeEventKind::StructureRuined,
        settlement,
        format!("{name} was ruined"),
        serde_json::json!({ "at": at }),
    );
    log_effect(
        world,
        event_id,
        structure,
        StateChange::property("health", before, 0.0),
    );
    log_effect(
        world,
        event_id,
        structure,
        StateChange::property("ruined", false, true),
    );

    emit(world, SiegeEvent::StructureRuined { structure, at });
    emit(
        world,
        SiegeEvent::Sound {
            cue: SoundCue::StructureCollapse,
            at,
        },
    );
}
