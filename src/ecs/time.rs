use std::fmt;

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const MINUTES_PER_HOUR: u64 = 60;
pub const HOURS_PER_DAY: u64 = 24;

pub const SECONDS_PER_HOUR: u64 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR; // 3,600
pub const SECONDS_PER_DAY: u64 = SECONDS_PER_HOUR * HOURS_PER_DAY; // 86,400

/// Simulated seconds advanced by one `SimTick`.
pub const TICK_SECONDS: u64 = 1;

/// Simulation time as total elapsed seconds since the server epoch.
///
/// Natural `u64` ordering equals chronological ordering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * SECONDS_PER_HOUR)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// `self` shifted forward by `secs`.
    pub fn plus_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Whole seconds elapsed between `earlier` and `self` (saturating).
    pub fn secs_since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn day(self) -> u64 {
        self.0 / SECONDS_PER_DAY
    }

    pub fn hour(self) -> u64 {
        (self.0 % SECONDS_PER_DAY) / SECONDS_PER_HOUR
    }

    pub fn minute(self) -> u64 {
        (self.0 % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    pub fn second(self) -> u64 {
        self.0 % SECONDS_PER_MINUTE
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "D{} {:02}:{:02}:{:02}",
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}
