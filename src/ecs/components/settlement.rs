use bevy_ecs::component::Component;

use crate::ecs::time::SimTime;

/// Starting structural integrity for a settlement.
pub const MAX_INTEGRITY: u32 = 100;

/// The slice of settlement state the siege engine reads and mutates.
#[derive(Component, Debug, Clone)]
pub struct SettlementCore {
    pub treasury: f64,
    /// When the last siege against this settlement resolved.
    pub last_siege: Option<SimTime>,
    pub integrity: u32,
    /// Claimed areas in registration order, as `"<world>:<chunk_x>:<chunk_z>"`.
    pub claims: Vec<String>,
}

impl Default for SettlementCore {
    fn default() -> Self {
        Self {
            treasury: 0.0,
            last_siege: None,
            integrity: MAX_INTEGRITY,
            claims: Vec::new(),
        }
    }
}
