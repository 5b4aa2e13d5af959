use std::f64::consts::TAU;

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use rand::Rng;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{CombatantState, SimEntity};
use crate::ecs::events::{SiegeEvent, SoundCue, emit};
use crate::ecs::resources::{SessionRegistry, SiegePhase, SiegeRng, log_effect, log_record};
use crate::ecs::spawn;
use crate::model::{CombatantRole, Position, SiegeEventKind, StateChange};

pub const BASE_HOSTILES: u32 = 5;
pub const HOSTILES_PER_WAVE: u32 = 2;
pub const RING_RADIUS: f64 = 10.0;

/// Hostiles spawned for `wave` (1-based).
pub fn wave_size(wave: u32) -> u32 {
    BASE_HOSTILES + HOSTILES_PER_WAVE * wave
}

/// Role for spawn slot `index` of `wave`. Breacher wins over Saboteur when both apply.
pub fn role_for(wave: u32, index: u32) -> CombatantRole {
    if wave >= 4 && index % 3 == 0 {
        CombatantRole::Breacher
    } else if wave >= 3 && index % 4 == 0 {
        CombatantRole::Saboteur
    } else {
        CombatantRole::Grunt
    }
}

/// `count` evenly spaced points on the spawn ring around `center`, starting at `phase` radians.
pub fn ring_positions(center: Position, count: u32, phase: f64) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let angle = phase + TAU * f64::from(i) / f64::from(count);
            center.on_ring(RING_RADIUS, angle)
        })
        .collect()
}

/// Spawn the session's current wave around `center`.
///
/// Returns the number spawned. Nothing is spawned while hostiles of an
/// earlier wave are still counted, or when no session exists.
pub fn spawn_wave(world: &mut World, settlement: Entity, center: Position) -> u32 {
    let (wave, max_waves) = {
        let registry = world.resource::<SessionRegistry>();
        let Some(session) = registry.get(settlement) else {
            tracing::debug!("spawn for {settlement:?} skipped: no live session");
            return 0;
        };
        if session.remaining > 0 {
            tracing::warn!(
                "wave {} for {settlement:?} refused: {} hostiles still on the field",
                session.wave,
                session.remaining
            );
            return 0;
        }
        (session.wave, session.max_waves)
    };

    let count = wave_size(wave);
    let phase = world.resource_mut::<SiegeRng>().0.random_range(0.0..TAU);
    let now = world.resource::<SimClock>().time;

    let mut spawned = Vec::with_capacity(count as usize);
    let mut roles = [0u32; 3];
    for (index, position) in ring_positions(center, count, phase).into_iter().enumerate() {
        let index = index as u32;
        let role = role_for(wave, index);
        roles[role as usize] += 1;
        let state = CombatantState::new(role, settlement, wave, index);
        spawned.push(spawn::spawn_combatant(world, state, position));
    }

    let title = {
        let mut registry = world.resource_mut::<SessionRegistry>();
        let Some(session) = registry.get_mut(settlement) else {
            return 0;
        };
        session.combatants.extend(spawned.iter().copied());
        session.wave_size = count;
        session.remaining = count;
        session.wave_started = now;
        session.phase = SiegePhase::WaveActive;
        session.indicator.reset_wave(wave);
        session.indicator.title()
    };

    emit(
        world,
        SiegeEvent::ProgressUpdated {
            settlement,
            title,
            fraction: 1.0,
        },
    );
    emit(
        world,
        SiegeEvent::Sound {
            cue: SoundCue::WaveHorn,
            at: center,
        },
    );
    let recipients = super::orchestrator::online_members(world, settlement);
    emit(
        world,
        SiegeEvent::Announcement {
            settlement,
            recipients,
            text: format!("Wave {wave} of {max_waves} is upon you: {count} hostiles approach!"),
        },
    );
    let event_id = log_record(
        world,
        SiegeEventKind::WaveSpawned,
        settlement,
        format!("wave {wave} of {max_waves} spawned with {count} hostiles"),
        serde_json::json!({
            "wave": wave,
            "count": count,
            "center": center,
            "grunts": roles[CombatantRole::Grunt as usize],
            "breachers": roles[CombatantRole::Breacher as usize],
            "saboteurs": roles[CombatantRole::Saboteur as usize],
        }),
    );
    for combatant in spawned {
        let name = world
            .get::<SimEntity>(combatant)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        log_effect(
            world,
            event_id,
            combatant,
            StateChange::EntityCreated {
                kind: "combatant".to_string(),
                name,
            },
        );
    }
    count
}
