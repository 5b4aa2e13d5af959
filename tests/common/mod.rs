#![allow(dead_code)]

use bevy_app::App;
use bevy_ecs::entity::Entity;
use siege_engine::ecs::test_helpers::{alive_combatants, slay_wave, tick_secs};
use siege_engine::ecs::{Combatant, SessionRegistry, SiegeSession};

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

pub fn session(app: &App, settlement: Entity) -> &SiegeSession {
    app.world()
        .resource::<SessionRegistry>()
        .get(settlement)
        .unwrap()
}

/// Kill the current wave and wait out the transition delay.
pub fn clear_wave(app: &mut App, settlement: Entity) {
    slay_wave(app, settlement);
    tick_secs(app, 11);
}

pub fn living_combatants(app: &mut App) -> usize {
    app.world_mut()
        .query::<&Combatant>()
        .iter(app.world())
        .count()
}

pub fn alive_in_session(app: &App, settlement: Entity) -> u32 {
    alive_combatants(app, settlement).len() as u32
}
