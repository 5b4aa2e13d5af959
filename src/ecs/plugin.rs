use bevy_app::{App, Plugin};

use super::systems::presentation::add_presentation_systems;
use super::systems::siege::add_siege_systems;
use super::systems::threat::add_threat_systems;

/// Aggregate plugin that installs the threat, siege and presentation systems.
pub struct SiegeEnginePlugin;

impl Plugin for SiegeEnginePlugin {
    fn build(&self, app: &mut App) {
        add_threat_systems(app);
        add_siege_systems(app);
        add_presentation_systems(app);
    }
}
