pub mod behavior;
pub mod orchestrator;
pub mod progress;
pub mod spawner;

use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;

use crate::ecs::conditions::{every_secs, sessions_active};
use crate::ecs::schedule::{SiegeSet, SimTick};

pub use orchestrator::{
    StartRefusal, can_start, check_start, force_start, on_wave_cleared, online_members, resolve,
    siege_state, start,
};
pub use progress::{ProgressIndicator, VIEWER_REFRESH_SECS};
pub use spawner::{role_for, spawn_wave, wave_size};

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub fn add_siege_systems(app: &mut App) {
    app.add_systems(
        SimTick,
        (progress::reconcile_remaining, orchestrator::advance_sieges)
            .chain()
            .run_if(sessions_active)
            .in_set(SiegeSet::Orchestration),
    );
    app.add_systems(
        SimTick,
        progress::refresh_viewers
            .run_if(sessions_active)
            .run_if(every_secs(VIEWER_REFRESH_SECS))
            .in_set(SiegeSet::Indicator),
    );
    app.add_systems(
        SimTick,
        behavior::drive_combatants
            .run_if(sessions_active)
            .in_set(SiegeSet::Behavior),
    );
}
