//! Siege session lifecycle: eligibility, start, wave completion, wave
//! transitions and final resolution.
//!
//! Every operation takes `&mut World` and is safe to call from exclusive
//! systems, the command applicator, or host code between ticks.

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use thiserror::Error;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{PlayerState, SettlementCore, SimEntity};
use crate::ecs::events::{SiegeEvent, SoundCue, emit};
use crate::ecs::relationships::MemberOfSources;
use crate::ecs::resources::{
    SessionRegistry, SiegeConfig, SiegePhase, SiegeSession, SiegeState, Terrain, log_effect,
    log_ended, log_record,
};
use crate::ecs::spawn;
use crate::ecs::time::SimTime;
use crate::model::{Position, SiegeEventKind, SiegeOutcome, StateChange};

use super::spawner;

/// Why a siege could not start. The `Display` text is shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartRefusal {
    #[error("that settlement does not exist")]
    UnknownSettlement,
    #[error("this settlement is already under siege")]
    AlreadyUnderSiege,
    #[error("this settlement is still recovering from its last siege ({remaining_secs}s left)")]
    CooldownActive { remaining_secs: u64 },
}

fn settlement_name(world: &World, settlement: Entity) -> String {
    world
        .get::<SimEntity>(settlement)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("{settlement:?}"))
}

/// Members of `settlement` who are currently online.
pub fn online_members(world: &World, settlement: Entity) -> Vec<Entity> {
    let Some(members) = world.get::<MemberOfSources>(settlement) else {
        return Vec::new();
    };
    members
        .iter()
        .copied()
        .filter(|p| world.get::<PlayerState>(*p).is_some_and(|s| s.online))
        .collect()
}

fn check_presence(world: &World, settlement: Entity) -> Result<(), StartRefusal> {
    if world.get::<SettlementCore>(settlement).is_none() {
        return Err(StartRefusal::UnknownSettlement);
    }
    if world.resource::<SessionRegistry>().contains(settlement) {
        return Err(StartRefusal::AlreadyUnderSiege);
    }
    Ok(())
}

/// Full eligibility check: settlement exists, no live session, cooldown elapsed.
pub fn check_start(world: &World, settlement: Entity) -> Result<(), StartRefusal> {
    check_presence(world, settlement)?;
    let cooldown = world.resource::<SiegeConfig>().cooldown_secs;
    let now = world.resource::<SimClock>().time;
    let last = world
        .get::<SettlementCore>(settlement)
        .and_then(|core| core.last_siege);
    if let Some(last) = last {
        let elapsed = now.secs_since(last);
        if elapsed < cooldown {
            return Err(StartRefusal::CooldownActive {
                remaining_secs: cooldown - elapsed,
            });
        }
    }
    Ok(())
}

pub fn can_start(world: &World, settlement: Entity) -> bool {
    check_start(world, settlement).is_ok()
}

/// Start a siege against `settlement` centred on `origin`.
///
/// Returns false with no state change if the settlement is not eligible; the
/// refusal reason goes out as a `StartRefused` event.
pub fn start(world: &mut World, settlement: Entity, origin: Position) -> bool {
    match check_start(world, settlement) {
        Ok(()) => begin(world, settlement, origin, false),
        Err(reason) => refuse(world, settlement, reason),
    }
}

/// Start a siege on behalf of the threat meter. Skips the cooldown, but never
/// replaces a live session.
pub fn force_start(world: &mut World, settlement: Entity, origin: Position) -> bool {
    match check_presence(world, settlement) {
        Ok(()) => begin(world, settlement, origin, true),
        Err(reason) => refuse(world, settlement, reason),
    }
}

fn refuse(world: &mut World, settlement: Entity, reason: StartRefusal) -> bool {
    tracing::warn!("siege start for {settlement:?} refused: {reason}");
    emit(world, SiegeEvent::StartRefused { settlement, reason });
    false
}

fn begin(world: &mut World, settlement: Entity, origin: Position, forced: bool) -> bool {
    let now = world.resource::<SimClock>().time;
    let max_waves = world.resource::<SiegeConfig>().max_waves;
    let viewers = online_members(world, settlement);

    let mut session = SiegeSession::new(settlement, now, max_waves);
    session.forced = forced;
    session.origin = origin;
    session.indicator.show_to(&viewers);
    let title = session.indicator.title();
    let fraction = session.indicator.fraction();
    if !world.resource_mut::<SessionRegistry>().insert(session) {
        return false;
    }

    let name = settlement_name(world, settlement);
    emit(
        world,
        SiegeEvent::ProgressShown {
            settlement,
            viewers: viewers.clone(),
            title,
            fraction,
        },
    );
    emit(
        world,
        SiegeEvent::Announcement {
            settlement,
            recipients: viewers,
            text: format!("{name} is under siege! Hold out for {max_waves} waves."),
        },
    );
    emit(
        world,
        SiegeEvent::Sound {
            cue: SoundCue::SiegeHorn,
            at: origin,
        },
    );
    log_record(
        world,
        SiegeEventKind::SiegeStarted,
        settlement,
        format!("siege against {name} began"),
        serde_json::json!({
            "origin": origin,
            "max_waves": max_waves,
            "forced": forced,
        }),
    );

    spawner::spawn_wave(world, settlement, origin);
    true
}

/// Handle the current wave reaching zero hostiles: victory after the final
/// wave, otherwise schedule the next wave after the configured delay.
pub fn on_wave_cleared(world: &mut World, settlement: Entity) {
    let now = world.resource::<SimClock>().time;
    let delay = world.resource::<SiegeConfig>().wave_delay_secs;

    let (cleared, title, fallen) = {
        let mut registry = world.resource_mut::<SessionRegistry>();
        let Some(session) = registry.get_mut(settlement) else {
            return;
        };
        if session.phase != SiegePhase::WaveActive || session.remaining > 0 {
            return;
        }
        if session.is_final_wave() {
            drop(registry);
            resolve(world, settlement, SiegeOutcome::Victory);
            return;
        }
        let cleared = session.wave;
        session.wave += 1;
        session.wave_size = 0;
        session.wave_started = now;
        session.phase = SiegePhase::WaveTransition {
            resume_at: now.plus_secs(delay),
        };
        let next = session.wave;
        session.indicator.reset_wave(next);
        let fallen = std::mem::take(&mut session.fallen);
        (cleared, session.indicator.title(), fallen)
    };

    let recipients = online_members(world, settlement);
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
        SiegeEvent::Announcement {
            settlement,
            recipients,
            text: format!("Wave {cleared} repelled! The next wave arrives in {delay} seconds."),
        },
    );
    let event_id = log_record(
        world,
        SiegeEventKind::WaveCleared,
        settlement,
        format!("wave {cleared} cleared"),
        serde_json::json!({
            "wave": cleared,
            "resume_at": now.plus_secs(delay),
        }),
    );
    log_ended(world, event_id, fallen);
}

/// Spawn the pending wave at the settlement's first claim, or stall the session.
fn resume_wave(world: &mut World, settlement: Entity, now: SimTime) {
    let Some(claims) = world
        .get::<SettlementCore>(settlement)
        .map(|core| core.claims.clone())
    else {
        tracing::debug!("wave resume for {settlement:?} deferred: settlement unresolved");
        return;
    };

    match world.resource::<Terrain>().resolve_first_claim(&claims) {
        Ok(position) => {
            spawner::spawn_wave(world, settlement, position);
        }
        Err(err) => {
            tracing::warn!("wave resume for {settlement:?} stalled: {err}");
            let wave = {
                let mut registry = world.resource_mut::<SessionRegistry>();
                let Some(session) = registry.get_mut(settlement) else {
                    return;
                };
                session.phase = SiegePhase::Stalled { since: now };
                session.wave
            };
            log_record(
                world,
                SiegeEventKind::WaveStalled,
                settlement,
                format!("wave {wave} could not be spawned: {err}"),
                serde_json::json!({ "wave": wave, "error": err.to_string() }),
            );
        }
    }
}

/// Exclusive system driving every live session's state machine one tick.
pub(crate) fn advance_sieges(world: &mut World) {
    let now = world.resource::<SimClock>().time;
    let timeout = world.resource::<SiegeConfig>().wave_timeout_secs;

    let settlements = world.resource::<SessionRegistry>().settlements();
    for settlement in settlements {
        let Some((phase, remaining, wave_started)) = world
            .resource::<SessionRegistry>()
            .get(settlement)
            .map(|s| (s.phase, s.remaining, s.wave_started))
        else {
            continue;
        };

        let waiting = matches!(phase, SiegePhase::WaveTransition { .. });
        if let Some(limit) = timeout
            && !waiting
            && now.secs_since(wave_started) >= limit
        {
            tracing::warn!("siege on {settlement:?} overran: wave unfinished after {limit}s");
            resolve(world, settlement, SiegeOutcome::Defeat);
            continue;
        }

        match phase {
            SiegePhase::WaveActive if remaining == 0 => on_wave_cleared(world, settlement),
            SiegePhase::WaveTransition { resume_at } if now >= resume_at => {
                resume_wave(world, settlement, now);
            }
            _ => {}
        }
    }
}

/// End the siege on `settlement` with `outcome`.
///
/// Removes the session, hides the indicator, clears every surviving
/// combatant, then applies the reward or penalty. Returns false if no session
/// was live.
pub fn resolve(world: &mut World, settlement: Entity, outcome: SiegeOutcome) -> bool {
    let Some(mut session) = world.resource_mut::<SessionRegistry>().remove(settlement) else {
        return false;
    };

    let viewers = session.indicator.hide_all();
    if !viewers.is_empty() {
        emit(
            world,
            SiegeEvent::ProgressHidden {
                settlement,
                viewers: viewers.clone(),
            },
        );
    }

    let survivors: Vec<u64> = session
        .combatants
        .iter()
        .filter_map(|c| spawn::despawn_combatant(world, *c))
        .collect();
    let cleared = survivors.len();

    let config = world.resource::<SiegeConfig>().clone();
    let now = world.resource::<SimClock>().time;
    let name = settlement_name(world, settlement);
    let waves_survived = match outcome {
        SiegeOutcome::Victory => session.wave,
        SiegeOutcome::Defeat => session.wave.saturating_sub(1),
    };

    let changes = match world.get_mut::<SettlementCore>(settlement) {
        Some(mut core) => {
            let mut changes = Vec::new();
            let treasury = core.treasury;
            match outcome {
                SiegeOutcome::Victory => {
                    core.treasury += config.victory_reward(session.max_waves);
                }
                SiegeOutcome::Defeat => {
                    core.treasury -= treasury.max(0.0) * config.defeat_treasury_fraction;
                    let integrity = core.integrity;
                    core.integrity = integrity.saturating_sub(config.defeat_integrity_penalty);
                    changes.push(StateChange::property("integrity", integrity, core.integrity));
                }
            }
            changes.push(StateChange::property("treasury", treasury, core.treasury));
            changes.push(StateChange::property("last_siege", core.last_siege, Some(now)));
            core.last_siege = Some(now);
            changes
        }
        None => {
            tracing::warn!("siege on {settlement:?} resolved after the settlement vanished");
            Vec::new()
        }
    };

    let description = match outcome {
        SiegeOutcome::Victory => format!("{name} withstood all {} waves", session.max_waves),
        SiegeOutcome::Defeat => format!("{name} fell during wave {}", session.wave),
    };
    let event_id = log_record(
        world,
        outcome.event_kind(),
        settlement,
        description.clone(),
        serde_json::json!({
            "waves_survived": waves_survived,
            "max_waves": session.max_waves,
            "combatants_cleared": cleared,
            "forced": session.forced,
        }),
    );
    for change in changes {
        log_effect(world, event_id, settlement, change);
    }
    log_ended(world, event_id, session.fallen.drain(..).chain(survivors));

    let cue = match outcome {
        SiegeOutcome::Victory => SoundCue::VictoryFanfare,
        SiegeOutcome::Defeat => SoundCue::DefeatToll,
    };
    emit(
        world,
        SiegeEvent::Sound {
            cue,
            at: session.origin,
        },
    );
    emit(
        world,
        SiegeEvent::Announcement {
            settlement,
            recipients: viewers,
            text: description,
        },
    );
    emit(world, SiegeEvent::SiegeEnded { settlement, outcome });
    true
}

/// Observable state of the siege on `settlement`.
pub fn siege_state(world: &World, settlement: Entity) -> SiegeState {
    world.resource::<SessionRegistry>().state_of(settlement)
}
