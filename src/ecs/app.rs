use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::SimClock;
use super::commands::{SiegeCommand, apply_siege_commands};
use super::events::SiegeEvent;
use super::plugin::SiegeEnginePlugin;
use super::resources::{
    EcsIdGenerator, EventLog, SessionRegistry, SiegeConfig, SiegeRng, SimEntityMap, SimRng,
    Terrain, ThreatRng, distribute_rng,
};
use super::schedule::{SimPhase, configure_sim_schedule};
use super::systems::presentation::PresentationFeed;
use super::systems::threat::ThreatMeter;
use super::time::SimTime;

/// Build a headless siege app with default configuration and every siege
/// system installed.
///
/// Manual tick control:
/// ```no_run
/// # use siege_engine::ecs::{build_siege_app, SimTick};
/// let mut app = build_siege_app();
/// for _ in 0..3_600 {  // one hour of one-second ticks
///     app.world_mut().run_schedule(SimTick);
/// }
/// ```
pub fn build_siege_app() -> App {
    build_siege_app_with(SiegeConfig::default())
}

/// Build a siege app with `config` and the single-threaded executor, so RNG
/// consumption order is identical across runs.
pub fn build_siege_app_with(config: SiegeConfig) -> App {
    build_siege_app_with_executor(config, ExecutorKind::SingleThreaded)
}

pub fn build_siege_app_with_executor(config: SiegeConfig, executor: ExecutorKind) -> App {
    let mut app = build_core_app(config, executor);
    app.add_plugins(SiegeEnginePlugin);
    app
}

/// Build the bare app: clock, core resources, message types, RNG
/// redistribution and the command applicator, but no siege systems.
pub fn build_core_app(config: SiegeConfig, executor: ExecutorKind) -> App {
    if let Err(err) = config.validate() {
        tracing::warn!("siege config rejected by validation, using as given: {err}");
    }
    let seed = config.rng_seed;
    let mut app = App::empty();

    // Core resources
    app.insert_resource(SimClock::new(SimTime::default()));
    app.insert_resource(EventLog::new());
    app.insert_resource(EcsIdGenerator::default());
    app.insert_resource(SimEntityMap::new());
    app.insert_resource(SessionRegistry::new());
    app.insert_resource(Terrain::new());
    app.insert_resource(ThreatMeter::default());
    app.insert_resource(PresentationFeed::default());
    app.insert_resource(config);
    app.insert_resource(SimRng::seeded(seed));

    // Per-domain RNG resources (reseeded each tick by distribute_rng)
    app.init_resource::<SiegeRng>();
    app.init_resource::<ThreatRng>();
    distribute_rng(app.world_mut());

    MessageRegistry::register_message::<SiegeCommand>(app.world_mut());
    MessageRegistry::register_message::<SiegeEvent>(app.world_mut());

    let mut schedule = configure_sim_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(SimPhase::PreUpdate));
    schedule.add_systems(distribute_rng.in_set(SimPhase::PreUpdate));
    schedule.add_systems(apply_siege_commands.in_set(SimPhase::PostUpdate));
    app.add_schedule(schedule);
    app
}
