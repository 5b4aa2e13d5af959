use bevy_ecs::system::Res;

use super::clock::SimClock;
use super::resources::SessionRegistry;
use super::time::SimTime;

fn interval_check(time: SimTime, every_secs: u64) -> bool {
    every_secs != 0 && time.as_secs().is_multiple_of(every_secs)
}

// Bevy run condition functions (for use with `.run_if()`).

/// True while at least one siege session is registered.
pub fn sessions_active(registry: Res<SessionRegistry>) -> bool {
    !registry.is_empty()
}

/// Run condition firing once every `every_secs` simulated seconds.
pub fn every_secs(every_secs: u64) -> impl FnMut(Res<SimClock>) -> bool + Clone {
    move |clock: Res<SimClock>| interval_check(clock.time, every_secs)
}
