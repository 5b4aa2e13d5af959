use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res};

use crate::ecs::commands::{SiegeCommand, SiegeCommandKind};
use crate::ecs::components::{
    CombatTarget, Combatant, CombatantState, Player, PlayerState, Settlement, Structure,
    StructureState, WorldPos,
};
use crate::ecs::events::{SiegeEvent, SoundCue};
use crate::ecs::resources::SessionRegistry;
use crate::model::{CombatantRole, Position, StructureCategory};

/// Half extents of the box a grunt scans for players.
pub const PLAYER_SEARCH_HALF_EXTENTS: (f64, f64, f64) = (16.0, 8.0, 16.0);
/// 32 units, squared.
pub const STRUCTURE_SEARCH_RADIUS_SQ: f64 = 1_024.0;
/// 3 units, squared.
pub const ATTACK_RANGE_SQ: f64 = 9.0;
pub const STRUCTURE_DAMAGE: f64 = 5.0;
pub const COMBATANT_STEP: f64 = 1.0;

/// A combat-eligible player as seen by the targeting pass.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub entity: Entity,
    pub position: Position,
}

/// An intact structure as seen by the targeting pass.
#[derive(Debug, Clone, Copy)]
pub struct StructureView {
    pub entity: Entity,
    pub position: Position,
    pub category: StructureCategory,
}

/// Nearest structure within the search radius, optionally restricted to `categories`.
pub fn nearest_structure<'a>(
    from: &Position,
    structures: &'a [StructureView],
    categories: Option<&[StructureCategory]>,
) -> Option<&'a StructureView> {
    structures
        .iter()
        .filter(|s| categories.is_none_or(|c| c.contains(&s.category)))
        .map(|s| (s, from.distance_squared(&s.position)))
        .filter(|(_, d)| *d <= STRUCTURE_SEARCH_RADIUS_SQ)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}

/// Nearest player inside the grunt search box.
pub fn nearest_player<'a>(from: &Position, players: &'a [PlayerView]) -> Option<&'a PlayerView> {
    players
        .iter()
        .filter(|p| from.within_box(&p.position, PLAYER_SEARCH_HALF_EXTENTS))
        .min_by(|a, b| {
            from.distance_squared(&a.position)
                .total_cmp(&from.distance_squared(&b.position))
        })
}

fn grunt_target(
    current: Option<CombatTarget>,
    from: &Position,
    players: &[PlayerView],
    structures: &[StructureView],
) -> Option<CombatTarget> {
    if let Some(CombatTarget::Player(player)) = current
        && players.iter().any(|p| p.entity == player)
    {
        return current;
    }
    if let Some(player) = nearest_player(from, players) {
        return Some(CombatTarget::Player(player.entity));
    }
    nearest_structure(from, structures, None).map(|s| CombatTarget::Structure(s.entity))
}

/// Pick this tick's target for a combatant of `role` standing at `from`.
///
/// `players` holds only combat-eligible players and `structures` only intact
/// ones. Nothing is cached between ticks.
pub fn select_target(
    role: CombatantRole,
    current: Option<CombatTarget>,
    from: &Position,
    players: &[PlayerView],
    structures: &[StructureView],
) -> Option<CombatTarget> {
    match role {
        CombatantRole::Grunt => grunt_target(current, from, players, structures),
        CombatantRole::Breacher | CombatantRole::Saboteur => {
            nearest_structure(from, structures, Some(role.priority_categories()))
                .map(|s| CombatTarget::Structure(s.entity))
                .or_else(|| grunt_target(current, from, players, structures))
        }
    }
}

/// Per-tick combatant driver: retarget, then step or attack.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub(crate) fn drive_combatants(
    registry: Res<SessionRegistry>,
    settlements: Query<(), With<Settlement>>,
    mut combatants: Query<(&mut CombatantState, &mut WorldPos), With<Combatant>>,
    players: Query<(Entity, &PlayerState, &WorldPos), (With<Player>, Without<Combatant>)>,
    structures: Query<(Entity, &StructureState, &WorldPos), (With<Structure>, Without<Combatant>)>,
    mut commands: MessageWriter<SiegeCommand>,
    mut events: MessageWriter<SiegeEvent>,
) {
    let eligible: Vec<PlayerView> = players
        .iter()
        .filter(|(_, state, _)| state.is_combat_eligible())
        .map(|(entity, _, pos)| PlayerView {
            entity,
            position: pos.0,
        })
        .collect();
    let intact: Vec<StructureView> = structures
        .iter()
        .filter(|(_, state, _)| !state.ruined)
        .map(|(entity, state, pos)| StructureView {
            entity,
            position: pos.0,
            category: state.category,
        })
        .collect();

    for session in registry.iter() {
        if !settlements.contains(session.settlement) {
            tracing::debug!(
                "settlement {:?} unresolved; combatants idle this tick",
                session.settlement
            );
            continue;
        }
        for &entity in &session.combatants {
            let Ok((mut state, mut pos)) = combatants.get_mut(entity) else {
                continue;
            };
            let target = select_target(state.role, state.target, &pos.0, &eligible, &intact);
            state.target = target;

            match target {
                Some(CombatTarget::Player(player)) => {
                    if let Some(view) = eligible.iter().find(|p| p.entity == player) {
                        pos.0 = pos.0.step_toward(&view.position, COMBATANT_STEP);
                    }
                }
                Some(CombatTarget::Structure(structure)) => {
                    let Some(view) = intact.iter().find(|s| s.entity == structure) else {
                        continue;
                    };
                    if pos.0.distance_squared(&view.position) < ATTACK_RANGE_SQ {
                        commands.write(
                            SiegeCommand::new(SiegeCommandKind::DamageStructure {
                                structure,
                                amount: STRUCTURE_DAMAGE,
                            })
                            .issued_by(entity),
                        );
                        events.write(SiegeEvent::AttackFeedback {
                            attacker: entity,
                            structure,
                            at: view.position,
                        });
                        events.write(SiegeEvent::Sound {
                            cue: SoundCue::StructureHit,
                            at: view.position,
                        });
                    } else {
                        pos.0 = pos.0.step_toward(&view.position, COMBATANT_STEP);
                    }
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::world::World;

    use super::*;
    use crate::ecs::app::build_siege_app;
    use crate::ecs::components::{CombatantState, PlayerMode, StructureState};
    use crate::ecs::resources::SessionRegistry;
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::{spawn_besieged_settlement, tick};

    fn entity_pool(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    fn structure(entity: Entity, x: f64, category: StructureCategory) -> StructureView {
        StructureView {
            entity,
            position: Position::new(x, 0.0, 0.0),
            category,
        }
    }

    fn player(entity: Entity, x: f64, y: f64) -> PlayerView {
        PlayerView {
            entity,
            position: Position::new(x, y, 0.0),
        }
    }

    /// Target picked by a combatant standing at the origin.
    fn pick(
        role: CombatantRole,
        current: Option<CombatTarget>,
        players: &[PlayerView],
        structures: &[StructureView],
    ) -> Option<CombatTarget> {
        select_target(role, current, &Position::default(), players, structures)
    }

    fn first_combatant(app: &bevy_app::App, settlement: Entity) -> Entity {
        app.world()
            .resource::<SessionRegistry>()
            .get(settlement)
            .unwrap()
            .combatants[0]
    }

    #[test]
    fn grunt_prefers_nearest_player_in_box() {
        let e = entity_pool(3);
        let players = [player(e[0], 10.0, 0.0), player(e[1], 4.0, 0.0)];
        let structures = [structure(e[2], 1.0, StructureCategory::Other)];
        let target = pick(CombatantRole::Grunt, None, &players, &structures);
        assert_eq!(target, Some(CombatTarget::Player(e[1])));
    }

    #[test]
    fn grunt_keeps_eligible_current_target() {
        let e = entity_pool(2);
        let players = [player(e[0], 2.0, 0.0), player(e[1], 200.0, 0.0)];
        let current = Some(CombatTarget::Player(e[1]));
        let target = pick(CombatantRole::Grunt, current, &players, &[]);
        assert_eq!(target, current);
    }

    #[test]
    fn grunt_ignores_players_outside_box() {
        let e = entity_pool(2);
        let players = [player(e[0], 0.0, 9.0)];
        let structures = [structure(e[1], 20.0, StructureCategory::Generator)];
        let target = pick(CombatantRole::Grunt, None, &players, &structures);
        assert_eq!(target, Some(CombatTarget::Structure(e[1])));
    }

    #[test]
    fn breacher_hunts_defensive_structures() {
        let e = entity_pool(3);
        let players = [player(e[0], 1.0, 0.0)];
        let structures = [
            structure(e[1], 2.0, StructureCategory::Generator),
            structure(e[2], 30.0, StructureCategory::Defensive),
        ];
        let target = pick(CombatantRole::Breacher, None, &players, &structures);
        assert_eq!(target, Some(CombatTarget::Structure(e[2])));
    }

    #[test]
    fn saboteur_hunts_generators_and_nexus() {
        let e = entity_pool(3);
        let structures = [
            structure(e[0], 3.0, StructureCategory::Defensive),
            structure(e[1], 12.0, StructureCategory::CommandNexus),
            structure(e[2], 8.0, StructureCategory::Generator),
        ];
        let target = pick(CombatantRole::Saboteur, None, &[], &structures);
        assert_eq!(target, Some(CombatTarget::Structure(e[2])));
    }

    #[test]
    fn specialists_fall_back_to_grunt_behavior() {
        let e = entity_pool(2);
        let players = [player(e[0], 5.0, 0.0)];
        // Out of the 32-unit search radius.
        let structures = [structure(e[1], 40.0, StructureCategory::Defensive)];
        let target = pick(CombatantRole::Breacher, None, &players, &structures);
        assert_eq!(target, Some(CombatTarget::Player(e[0])));
    }

    #[test]
    fn no_candidates_means_no_target() {
        let target = pick(CombatantRole::Saboteur, None, &[], &[]);
        assert_eq!(target, None);
    }

    #[test]
    fn combatant_in_range_damages_structure() {
        let mut app = build_siege_app();
        let settlement = spawn_besieged_settlement(&mut app);
        let first = first_combatant(&app, settlement);
        let at = app.world().get::<WorldPos>(first).unwrap().0;
        let wall = spawn::spawn_structure(
            app.world_mut(),
            "Wall",
            StructureState::new(StructureCategory::Defensive, 100.0),
            Position::new(at.x + 1.0, at.y, at.z),
        );
        // Keep the player out of reach so every grunt goes for structures.
        let players: Vec<Entity> = app
            .world_mut()
            .query_filtered::<Entity, With<Player>>()
            .iter(app.world())
            .collect();
        for player in players {
            app.world_mut().get_mut::<PlayerState>(player).unwrap().mode = PlayerMode::Spectator;
        }

        tick(&mut app);
        let state = app.world().get::<StructureState>(wall).unwrap();
        assert!(state.health < 100.0);
        assert_eq!(
            app.world().get::<CombatantState>(first).unwrap().target,
            Some(CombatTarget::Structure(wall))
        );
    }

    #[test]
    fn combatant_steps_toward_player() {
        let mut app = build_siege_app();
        let settlement = spawn_besieged_settlement(&mut app);
        let first = first_combatant(&app, settlement);
        let before = app.world().get::<WorldPos>(first).unwrap().0;
        let player = spawn::spawn_player(
            app.world_mut(),
            "Scout",
            PlayerState::default(),
            Position::new(before.x + 5.0, before.y, before.z),
            None,
        );
        let player_pos = app.world().get::<WorldPos>(player).unwrap().0;

        tick(&mut app);
        let after = app.world().get::<WorldPos>(first).unwrap().0;
        assert!(after.distance_squared(&player_pos) < before.distance_squared(&player_pos));
        assert!((before.distance_squared(&after) - 1.0).abs() < 1e-6);
    }
}
