use serde::{Deserialize, Serialize};

/// A point in world space. `y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// True if `other` lies inside the axis-aligned box centred on `self`.
    pub fn within_box(&self, other: &Position, half_extents: (f64, f64, f64)) -> bool {
        (self.x - other.x).abs() <= half_extents.0
            && (self.y - other.y).abs() <= half_extents.1
            && (self.z - other.z).abs() <= half_extents.2
    }

    /// Move up to `max_step` units toward `target`, stopping on it.
    pub fn step_toward(&self, target: &Position, max_step: f64) -> Position {
        let dist = self.distance_squared(target).sqrt();
        if dist <= max_step || dist == 0.0 {
            return *target;
        }
        let t = max_step / dist;
        Position {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }

    /// Point on a horizontal ring of `radius` around `self` at `angle` radians.
    pub fn on_ring(&self, radius: f64, angle: f64) -> Position {
        Position {
            x: self.x + radius * angle.cos(),
            y: self.y,
            z: self.z + radius * angle.sin(),
        }
    }
}
