use bevy_ecs::component::Component;

use crate::model::StructureCategory;

/// Structure registry entry: health and category of a defensible structure.
#[derive(Component, Debug, Clone)]
pub struct StructureState {
    pub category: StructureCategory,
    pub health: f64,
    pub max_health: f64,
    pub ruined: bool,
}

impl StructureState {
    pub fn new(category: StructureCategory, max_health: f64) -> Self {
        Self {
            category,
            health: max_health,
            max_health,
            ruined: false,
        }
    }

    /// Apply `amount` damage. Returns true if this call ruined the structure.
    ///
    /// Health only ever decreases; damage against a ruined structure is a no-op.
    pub fn apply_damage(&mut self, amount: f64) -> bool {
        if self.ruined || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health == 0.0 {
            self.ruined = true;
            return true;
        }
        false
    }
}
