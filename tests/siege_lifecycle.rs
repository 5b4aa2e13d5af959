mod common;

use bevy_ecs::entity::Entity;
use siege_engine::ecs::test_helpers::{
    jump_clock, slay_wave, spawn_besieged_settlement, spawn_test_settlement, tick, tick_secs,
};
use siege_engine::ecs::{
    EventLog, PresentationFeed, SessionRegistry, SettlementCore, SiegeCommand, SiegeCommandKind,
    SiegeEvent, SiegeState, SimClock, build_siege_app, can_start, siege_state, start, submit,
};
use siege_engine::{Position, SiegeEventKind, SiegeOutcome, StateChange};

use common::{alive_in_session, clear_wave, living_combatants, session};

fn origin() -> Position {
    Position::new(8.0, 65.0, 8.0)
}

#[test]
fn cannot_restart_until_resolved_and_cooled_down() {
    let mut app = build_siege_app();
    let settlement = spawn_test_settlement(&mut app, "Greyharbor");
    assert!(can_start(app.world(), settlement));
    assert!(start(app.world_mut(), settlement, origin()));
    assert!(!can_start(app.world(), settlement));

    submit(
        app.world_mut(),
        SiegeCommand::new(SiegeCommandKind::EndSiege {
            settlement,
            outcome: SiegeOutcome::Victory,
        }),
    );
    tick(&mut app);
    assert_eq!(siege_state(app.world(), settlement), SiegeState::Inactive);
    assert!(!can_start(app.world(), settlement));

    let resolved_at = app
        .world()
        .get::<SettlementCore>(settlement)
        .unwrap()
        .last_siege
        .unwrap();
    jump_clock(&mut app, resolved_at.plus_secs(7_199));
    assert!(!can_start(app.world(), settlement));
    jump_clock(&mut app, resolved_at.plus_secs(7_200));
    assert!(can_start(app.world(), settlement));
}

#[test]
fn remaining_tracks_alive_combatants() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    let victims: Vec<Entity> = session(&app, settlement).combatants[..3].to_vec();
    for combatant in victims {
        submit(
            app.world_mut(),
            SiegeCommand::new(SiegeCommandKind::SlayCombatant { combatant }),
        );
    }
    tick(&mut app);

    let remaining = session(&app, settlement).remaining;
    assert_eq!(remaining, 4);
    assert_eq!(remaining, alive_in_session(&app, settlement));
    let fraction = session(&app, settlement).indicator.fraction();
    assert!((fraction - 4.0 / 7.0).abs() < 1e-9);
}

#[test]
fn clearing_wave_one_spawns_wave_two_after_delay() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    assert_eq!(session(&app, settlement).remaining, 7);

    slay_wave(&mut app, settlement);
    tick(&mut app);
    assert_eq!(siege_state(app.world(), settlement), SiegeState::WaveTransition(1));
    assert_eq!(living_combatants(&mut app), 0);

    tick_secs(&mut app, 10);
    assert_eq!(siege_state(app.world(), settlement), SiegeState::WaveActive(2));
    let session = session(&app, settlement);
    assert_eq!(session.remaining, 9);
    assert_eq!(session.wave_size, 9);
    assert_eq!(session.indicator.title(), "Siege: Wave 2 / 5");
    assert_eq!(session.indicator.fraction(), 1.0);
}

#[test]
fn clearing_every_wave_wins_the_siege() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    let treasury_before = app.world().get::<SettlementCore>(settlement).unwrap().treasury;

    for _ in 0..5 {
        clear_wave(&mut app, settlement);
    }

    assert_eq!(siege_state(app.world(), settlement), SiegeState::Inactive);
    assert!(app.world().resource::<SessionRegistry>().is_empty());
    assert_eq!(living_combatants(&mut app), 0);

    let core = app.world().get::<SettlementCore>(settlement).unwrap();
    assert_eq!(core.treasury, treasury_before + 2_500.0);
    let last = core.last_siege.expect("last siege recorded");
    assert!(last <= app.world().resource::<SimClock>().time);

    let log = app.world().resource::<EventLog>();
    assert_eq!(log.count_of(SiegeEventKind::WaveSpawned), 5);
    assert_eq!(log.count_of(SiegeEventKind::WaveCleared), 4);
    assert_eq!(log.count_of(SiegeEventKind::Victory), 1);
}

fn effect_counts(log: &EventLog) -> (usize, usize) {
    let created = log
        .effects
        .iter()
        .filter(|e| matches!(e.effect, StateChange::EntityCreated { .. }))
        .count();
    let ended = log
        .effects
        .iter()
        .filter(|e| e.effect == StateChange::EntityEnded)
        .count();
    (created, ended)
}

#[test]
fn every_combatant_is_created_and_ended_in_the_audit_trail() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    for _ in 0..5 {
        clear_wave(&mut app, settlement);
    }

    let log = app.world().resource::<EventLog>();
    // 7 + 9 + 11 + 13 + 15
    assert_eq!(effect_counts(log), (55, 55));

    let spawned_id = log.records_of(SiegeEventKind::WaveSpawned).next().unwrap().id;
    assert_eq!(
        log.effects.iter().filter(|e| e.event_id == spawned_id).count(),
        7
    );
    let cleared_id = log.records_of(SiegeEventKind::WaveCleared).next().unwrap().id;
    assert_eq!(
        log.effects
            .iter()
            .filter(|e| e.event_id == cleared_id && e.effect == StateChange::EntityEnded)
            .count(),
        7
    );
}

#[test]
fn defeat_ends_fallen_and_surviving_combatants() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    let victims: Vec<Entity> = session(&app, settlement).combatants[..3].to_vec();
    for combatant in victims {
        submit(
            app.world_mut(),
            SiegeCommand::new(SiegeCommandKind::SlayCombatant { combatant }),
        );
    }
    submit(
        app.world_mut(),
        SiegeCommand::new(SiegeCommandKind::EndSiege {
            settlement,
            outcome: SiegeOutcome::Defeat,
        }),
    );
    tick(&mut app);

    let log = app.world().resource::<EventLog>();
    assert_eq!(effect_counts(log), (7, 7));
    let defeat_id = log.records_of(SiegeEventKind::Defeat).next().unwrap().id;
    let ended_ids: Vec<u64> = log
        .effects
        .iter()
        .filter(|e| e.event_id == defeat_id && e.effect == StateChange::EntityEnded)
        .map(|e| e.entity_id)
        .collect();
    assert_eq!(ended_ids.len(), 7);
    assert!(ended_ids.iter().all(|id| *id != 0));
}

#[test]
fn indicator_hidden_exactly_once_at_resolution() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    for _ in 0..5 {
        clear_wave(&mut app, settlement);
    }
    let events = app.world_mut().resource_mut::<PresentationFeed>().drain();
    let hidden = events
        .iter()
        .filter(|e| matches!(e, SiegeEvent::ProgressHidden { .. }))
        .count();
    let ended = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SiegeEvent::SiegeEnded {
                    outcome: SiegeOutcome::Victory,
                    ..
                }
            )
        })
        .count();
    assert_eq!(hidden, 1);
    assert_eq!(ended, 1);
}

#[test]
fn rapid_double_start_creates_one_session() {
    let mut app = build_siege_app();
    let settlement = spawn_test_settlement(&mut app, "Greyharbor");
    assert!(start(app.world_mut(), settlement, origin()));
    assert!(!start(app.world_mut(), settlement, origin()));

    assert_eq!(app.world().resource::<SessionRegistry>().len(), 1);
    assert_eq!(session(&app, settlement).combatants.len(), 7);
    assert_eq!(living_combatants(&mut app), 7);
    let log = app.world().resource::<EventLog>();
    assert_eq!(log.count_of(SiegeEventKind::SiegeStarted), 1);
}

#[test]
fn command_started_sieges_are_also_idempotent() {
    let mut app = build_siege_app();
    let settlement = spawn_test_settlement(&mut app, "Greyharbor");
    for _ in 0..2 {
        submit(
            app.world_mut(),
            SiegeCommand::new(SiegeCommandKind::BeginSiege {
                settlement,
                origin: origin(),
                forced: false,
            }),
        );
    }
    tick(&mut app);
    assert_eq!(app.world().resource::<SessionRegistry>().len(), 1);
    assert_eq!(living_combatants(&mut app), 7);
}

#[test]
fn concurrent_sieges_stay_isolated() {
    let mut app = build_siege_app();
    let north = spawn_besieged_settlement(&mut app);
    let south = spawn_besieged_settlement(&mut app);
    assert_ne!(north, south);

    let north_ids = session(&app, north).combatants.clone();
    let south_ids = session(&app, south).combatants.clone();
    assert!(north_ids.iter().all(|c| !south_ids.contains(c)));

    clear_wave(&mut app, north);

    assert_eq!(siege_state(app.world(), north), SiegeState::WaveActive(2));
    assert_eq!(siege_state(app.world(), south), SiegeState::WaveActive(1));
    let south_session = session(&app, south);
    assert_eq!(south_session.remaining, 7);
    assert_eq!(south_session.combatants, south_ids);
    assert_eq!(south_session.indicator.fraction(), 1.0);
    assert_eq!(south_session.indicator.title(), "Siege: Wave 1 / 5");
    assert!(
        session(&app, north)
            .combatants
            .iter()
            .all(|c| !south_ids.contains(c))
    );
}

#[test]
fn defeat_through_end_siege_command() {
    let mut app = build_siege_app();
    let settlement = spawn_besieged_settlement(&mut app);
    app.world_mut()
        .get_mut::<SettlementCore>(settlement)
        .unwrap()
        .treasury = 400.0;
    submit(
        app.world_mut(),
        SiegeCommand::new(SiegeCommandKind::EndSiege {
            settlement,
            outcome: SiegeOutcome::Defeat,
        }),
    );
    tick(&mut app);

    let core = app.world().get::<SettlementCore>(settlement).unwrap();
    assert_eq!(core.treasury, 300.0);
    assert_eq!(core.integrity, 75);
    assert_eq!(living_combatants(&mut app), 0);
}

#[test]
fn vanished_settlement_does_not_halt_other_sieges() {
    let mut app = build_siege_app();
    let doomed = spawn_besieged_settlement(&mut app);
    let survivor = spawn_besieged_settlement(&mut app);
    app.world_mut().despawn(doomed);

    clear_wave(&mut app, survivor);
    assert_eq!(siege_state(app.world(), survivor), SiegeState::WaveActive(2));
    // The orphaned session is kept for retry, never torn down by a tick.
    assert!(app.world().resource::<SessionRegistry>().contains(doomed));
}
