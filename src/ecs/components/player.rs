use bevy_ecs::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerMode {
    #[default]
    Survival,
    Adventure,
    Creative,
    Spectator,
}

/// Presence and combat state of a player, as reported by the host.
#[derive(Component, Debug, Clone)]
pub struct PlayerState {
    pub online: bool,
    pub health: f64,
    pub mode: PlayerMode,
}

impl PlayerState {
    /// Online, alive, and in a mode hostiles may attack.
    pub fn is_combat_eligible(&self) -> bool {
        self.online
            && self.health > 0.0
            && matches!(self.mode, PlayerMode::Survival | PlayerMode::Adventure)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            online: true,
            health: 20.0,
            mode: PlayerMode::Survival,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creative_and_spectator_are_ineligible() {
        for mode in [PlayerMode::Creative, PlayerMode::Spectator] {
            let p = PlayerState {
                mode,
                ..PlayerState::default()
            };
            assert!(!p.is_combat_eligible());
        }
    }

    #[test]
    fn offline_or_dead_is_ineligible() {
        let offline = PlayerState {
            online: false,
            ..PlayerState::default()
        };
        let dead = PlayerState {
            health: 0.0,
            ..PlayerState::default()
        };
        assert!(!offline.is_combat_eligible());
        assert!(!dead.is_combat_eligible());
        assert!(PlayerState::default().is_combat_eligible());
    }
}
