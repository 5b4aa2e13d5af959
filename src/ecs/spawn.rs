use bevy_ecs::bundle::Bundle;
use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::clock::SimClock;
use crate::ecs::components::*;
use crate::ecs::relationships::MemberOf;
use crate::ecs::resources::{EcsIdGenerator, SimEntityMap};
use crate::model::Position;

/// Spawn `bundle` under a fresh sim id and register it in the entity map.
fn spawn_registered(world: &mut World, name: String, bundle: impl Bundle) -> Entity {
    let id = world.resource_mut::<EcsIdGenerator>().next_id();
    let origin = world.get_resource::<SimClock>().map(|c| c.time);
    let entity = world
        .spawn((SimEntity { id, name, origin }, bundle))
        .id();
    if let Some(mut map) = world.get_resource_mut::<SimEntityMap>() {
        map.insert(id, entity);
    }
    entity
}

pub fn spawn_settlement(
    world: &mut World,
    name: impl Into<String>,
    core: SettlementCore,
) -> Entity {
    spawn_registered(world, name.into(), (Settlement, core))
}

/// Spawn a player, optionally as a member of `settlement`.
pub fn spawn_player(
    world: &mut World,
    name: impl Into<String>,
    state: PlayerState,
    position: Position,
    settlement: Option<Entity>,
) -> Entity {
    let entity = spawn_registered(world, name.into(), (Player, state, WorldPos(position)));
    if let Some(settlement) = settlement {
        world.entity_mut(entity).insert(MemberOf(settlement));
    }
    entity
}

pub fn spawn_structure(
    world: &mut World,
    name: impl Into<String>,
    state: StructureState,
    position: Position,
) -> Entity {
    spawn_registered(world, name.into(), (Structure, state, WorldPos(position)))
}

pub fn spawn_combatant(world: &mut World, state: CombatantState, position: Position) -> Entity {
    let name = state.kind.display_name().to_string();
    spawn_registered(world, name, (Combatant, state, WorldPos(position)))
}

/// Despawn a combatant and forget its sim id. Returns the sim id, or `None`
/// if it was already gone.
pub fn despawn_combatant(world: &mut World, combatant: Entity) -> Option<u64> {
    world.get::<Combatant>(combatant)?;
    let id = world.get::<SimEntity>(combatant).map(|s| s.id);
    let _ = world.despawn(combatant);
    if let Some(mut map) = world.get_resource_mut::<SimEntityMap>() {
        map.remove_entity(combatant);
    }
    id
}
