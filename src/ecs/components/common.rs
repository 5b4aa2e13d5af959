use bevy_ecs::component::Component;

use crate::ecs::time::SimTime;
use crate::model::Position;

/// Core identity component present on every ECS entity that maps to a simulation entity.
#[derive(Component, Debug, Clone)]
pub struct SimEntity {
    pub id: u64,
    pub name: String,
    pub origin: Option<SimTime>,
}

/// World-space location of a player, structure, or combatant.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldPos(pub Position);

// ---------------------------------------------------------------------------
// Marker components
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Settlement;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Structure;

/// Hostile spawned by a siege wave.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Combatant;
