use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::systems::siege::orchestrator;
use crate::model::{Position, SiegeOutcome};

pub(crate) fn apply_begin_siege(
    world: &mut World,
    settlement: Entity,
    origin: Position,
    forced: bool,
) {
    if forced {
        orchestrator::force_start(world, settlement, origin);
    } else {
        orchestrator::start(world, settlement, origin);
    }
}

pub(crate) fn apply_end_siege(world: &mut World, settlement: Entity, outcome: SiegeOutcome) {
    if !orchestrator::resolve(world, settlement, outcome) {
        tracing::debug!("end-siege for {settlement:?} ignored: no live session");
    }
}
