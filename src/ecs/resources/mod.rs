pub mod config;
pub mod entity_map;
pub mod event_log;
pub mod session_registry;
pub mod sim_resources;
pub mod terrain;

pub use config::{ConfigError, SiegeConfig};
pub use entity_map::SimEntityMap;
pub use event_log::{EventLog, SiegeRecord, log_effect, log_ended, log_record};
pub use session_registry::{SessionRegistry, SiegePhase, SiegeSession, SiegeState};
pub use sim_resources::{EcsIdGenerator, SiegeRng, SimRng, ThreatRng, distribute_rng};
pub use terrain::{SurfaceMap, Terrain};
