use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::model::{CombatantRole, HostileKind};

/// What a combatant is currently pursuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatTarget {
    Player(Entity),
    Structure(Entity),
}

/// Per-combatant siege record. The role is fixed at spawn.
#[derive(Component, Debug, Clone)]
pub struct CombatantState {
    pub role: CombatantRole,
    pub kind: HostileKind,
    /// Settlement whose session spawned this combatant.
    pub settlement: Entity,
    pub wave: u32,
    pub spawn_index: u32,
    pub health: f64,
    pub target: Option<CombatTarget>,
}

impl CombatantState {
    pub fn new(role: CombatantRole, settlement: Entity, wave: u32, spawn_index: u32) -> Self {
        let kind = role.hostile_kind();
        Self {
            role,
            kind,
            settlement,
            wave,
            spawn_index,
            health: kind.max_health(),
            target: None,
        }
    }

    /// Record for a combatant whose role arrives as a persisted or
    /// host-supplied tag. Unreadable tags yield a grunt.
    pub fn from_tag(tag: &str, settlement: Entity, wave: u32, spawn_index: u32) -> Self {
        Self::new(CombatantRole::from_tag(tag), settlement, wave, spawn_index)
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::world::World;

    use super::*;

    #[test]
    fn tagged_record_takes_role_kind_and_health() {
        let settlement = World::new().spawn_empty().id();
        let state = CombatantState::from_tag("breacher", settlement, 4, 3);
        assert_eq!(state.role, CombatantRole::Breacher);
        assert_eq!(state.kind, HostileKind::Ravager);
        assert_eq!(state.health, HostileKind::Ravager.max_health());
        assert_eq!((state.wave, state.spawn_index), (4, 3));
    }

    #[test]
    fn unreadable_tag_spawns_a_grunt() {
        let settlement = World::new().spawn_empty().id();
        let state = CombatantState::from_tag("siege-engineer", settlement, 1, 0);
        assert_eq!(state.role, CombatantRole::Grunt);
        assert_eq!(state.kind, HostileKind::Raider);
    }
}
