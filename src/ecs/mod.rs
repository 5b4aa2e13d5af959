pub mod app;
pub mod clock;
pub mod commands;
pub mod components;
pub mod conditions;
pub mod events;
pub mod plugin;
pub mod relationships;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod systems;
pub mod test_helpers;
pub mod time;

pub use app::{build_core_app, build_siege_app, build_siege_app_with, build_siege_app_with_executor};
pub use clock::SimClock;
pub use commands::{SiegeCommand, SiegeCommandKind, submit};
pub use components::{
    CombatTarget, Combatant, CombatantState, MAX_INTEGRITY, Player, PlayerMode, PlayerState,
    Settlement, SettlementCore, SimEntity, Structure, StructureState, WorldPos,
};
pub use conditions::{every_secs, sessions_active};
pub use events::{SiegeEvent, SoundCue};
pub use plugin::SiegeEnginePlugin;
pub use relationships::{MemberOf, MemberOfSources};
pub use resources::{
    ConfigError, EcsIdGenerator, EventLog, SessionRegistry, SiegeConfig, SiegePhase, SiegeRecord,
    SiegeSession, SiegeState, SimEntityMap, SimRng, SurfaceMap, Terrain,
};
pub use schedule::{SiegeSet, SimPhase, SimTick, configure_sim_schedule};
pub use systems::presentation::PresentationFeed;
pub use systems::siege::{
    ProgressIndicator, StartRefusal, can_start, check_start, force_start, on_wave_cleared,
    resolve, siege_state, start,
};
pub use systems::threat::ThreatMeter;
pub use time::SimTime;
