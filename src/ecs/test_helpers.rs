use bevy_app::App;
use bevy_ecs::entity::Entity;

use crate::ecs::clock::SimClock;
use crate::ecs::commands::{SiegeCommand, SiegeCommandKind, submit};
use crate::ecs::components::{Combatant, PlayerState, SettlementCore};
use crate::ecs::resources::{SessionRegistry, SurfaceMap, Terrain};
use crate::ecs::schedule::SimTick;
use crate::ecs::spawn;
use crate::ecs::systems::siege::orchestrator;
use crate::ecs::time::SimTime;
use crate::model::Position;

/// Terrain world used by the helpers, flat at this height.
pub const TEST_WORLD: &str = "overworld";
pub const TEST_GROUND: f64 = 64.0;

pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(SimTick);
}

/// Run `n` one-second ticks.
pub fn tick_secs(app: &mut App, n: u64) {
    for _ in 0..n {
        tick(app);
    }
}

/// Move the clock to `time` without running any systems.
pub fn jump_clock(app: &mut App, time: SimTime) {
    app.world_mut().resource_mut::<SimClock>().time = time;
}

/// Ensure the flat test world exists.
pub fn install_flat_terrain(app: &mut App) {
    let mut terrain = app.world_mut().resource_mut::<Terrain>();
    if terrain.world_mut(TEST_WORLD).is_none() {
        terrain.insert_world(TEST_WORLD, SurfaceMap::flat(TEST_GROUND));
    }
}

/// Spawn a settlement claiming chunk (0, 0) of the test world, with one
/// online member parked far from the spawn ring.
pub fn spawn_test_settlement(app: &mut App, name: &str) -> Entity {
    install_flat_terrain(app);
    let world = app.world_mut();
    let settlement = spawn::spawn_settlement(
        world,
        name,
        SettlementCore {
            claims: vec![format!("{TEST_WORLD}:0:0")],
            ..SettlementCore::default()
        },
    );
    spawn::spawn_player(
        world,
        format!("{name} defender"),
        PlayerState::default(),
        Position::new(500.0, TEST_GROUND + 1.0, 500.0),
        Some(settlement),
    );
    settlement
}

/// Spawn a test settlement and start a siege at its first claim.
pub fn spawn_besieged_settlement(app: &mut App) -> Entity {
    let count = app.world().resource::<SessionRegistry>().len();
    let settlement = spawn_test_settlement(app, &format!("Holdfast {count}"));
    let origin = Position::new(8.0, TEST_GROUND + 1.0, 8.0);
    assert!(orchestrator::start(app.world_mut(), settlement, origin));
    settlement
}

/// Alive combatants of the settlement's session.
pub fn alive_combatants(app: &App, settlement: Entity) -> Vec<Entity> {
    let registry = app.world().resource::<SessionRegistry>();
    registry
        .get(settlement)
        .map(|s| {
            s.combatants
                .iter()
                .copied()
                .filter(|c| app.world().get::<Combatant>(*c).is_some())
                .collect()
        })
        .unwrap_or_default()
}

/// Submit a death notification for every alive combatant of the session.
/// Applied on the next tick.
pub fn slay_wave(app: &mut App, settlement: Entity) {
    for combatant in alive_combatants(app, settlement) {
        submit(
            app.world_mut(),
            SiegeCommand::new(SiegeCommandKind::SlayCombatant { combatant }),
        );
    }
}
