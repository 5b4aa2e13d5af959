use bevy_ecs::resource::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::ecs::time::SECONDS_PER_HOUR;

pub const DEFAULT_MAX_WAVES: u32 = 5;
pub const DEFAULT_COOLDOWN_SECS: u64 = 2 * SECONDS_PER_HOUR;
pub const DEFAULT_WAVE_DELAY_SECS: u64 = 10;
pub const DEFAULT_REWARD_PER_WAVE: f64 = 500.0;
pub const DEFAULT_DEFEAT_TREASURY_FRACTION: f64 = 0.25;
pub const DEFAULT_DEFEAT_INTEGRITY_PENALTY: u32 = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid siege config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("max_waves must be at least 1")]
    NoWaves,
    #[error("defeat_treasury_fraction must be within [0, 1], got {0}")]
    FractionOutOfRange(f64),
    #[error("reward_per_wave must be non-negative, got {0}")]
    NegativeReward(f64),
}

/// Tunables for siege lifecycle and economy.
///
/// Loadable from a partial JSON document; omitted keys keep their defaults.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiegeConfig {
    pub max_waves: u32,
    pub cooldown_secs: u64,
    pub wave_delay_secs: u64,
    pub reward_per_wave: f64,
    pub defeat_treasury_fraction: f64,
    pub defeat_integrity_penalty: u32,
    /// Resolve a wave as defeat after this long without clearing. `None` disables.
    pub wave_timeout_secs: Option<u64>,
    pub rng_seed: u64,
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            max_waves: DEFAULT_MAX_WAVES,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            wave_delay_secs: DEFAULT_WAVE_DELAY_SECS,
            reward_per_wave: DEFAULT_REWARD_PER_WAVE,
            defeat_treasury_fraction: DEFAULT_DEFEAT_TREASURY_FRACTION,
            defeat_integrity_penalty: DEFAULT_DEFEAT_INTEGRITY_PENALTY,
            wave_timeout_secs: None,
            rng_seed: 42,
        }
    }
}

impl SiegeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SiegeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_waves == 0 {
            return Err(ConfigError::NoWaves);
        }
        if !(0.0..=1.0).contains(&self.defeat_treasury_fraction) {
            return Err(ConfigError::FractionOutOfRange(self.defeat_treasury_fraction));
        }
        if self.reward_per_wave < 0.0 {
            return Err(ConfigError::NegativeReward(self.reward_per_wave));
        }
        Ok(())
    }

    /// Treasury credit for withstanding a siege of `waves` waves.
    pub fn victory_reward(&self, waves: u32) -> f64 {
        self.reward_per_wave * f64::from(waves)
    }
}
