use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use super::time::{SimTime, TICK_SECONDS};

/// Simulation clock resource tracking the current time and tick count.
///
/// Advances by `TICK_SECONDS` per tick. The `advance_clock` system moves the
/// clock forward at the end of each tick (in `SimPhase::Last`), so systems see
/// the current time before it advances.
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub time: SimTime,
    pub tick_count: u64,
}

impl SimClock {
    pub fn new(start: SimTime) -> Self {
        Self {
            time: start,
            tick_count: 0,
        }
    }

    pub fn advance(&mut self) {
        self.time = self.time.plus_secs(TICK_SECONDS);
        self.tick_count += 1;
    }
}

/// Bevy system that advances the simulation clock by one tick.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::time::SECONDS_PER_HOUR;

    #[test]
    fn new_clock_starts_at_given_time() {
        let clock = SimClock::new(SimTime::from_hours(5));
        assert_eq!(clock.time.hour(), 5);
        assert_eq!(clock.tick_count, 0);
    }

    #[test]
    fn advance_increments_one_second() {
        let mut clock = SimClock::new(SimTime::default());
        clock.advance();
        assert_eq!(clock.time.as_secs(), 1);
        assert_eq!(clock.tick_count, 1);
    }

    #[test]
    fn advance_rolls_over_hour() {
        let mut clock = SimClock::new(SimTime::default());
        for _ in 0..SECONDS_PER_HOUR {
            clock.advance();
        }
        assert_eq!(clock.time.hour(), 1);
        assert_eq!(clock.time.minute(), 0);
        assert_eq!(clock.tick_count, SECONDS_PER_HOUR);
    }
}
