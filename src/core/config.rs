//! Engine configuration with documented constants
//!
//! All tunable values for the combat state machine are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

use crate::core::error::{HiveError, Result};

/// Configuration for the combat engine and session registry
///
/// These values have been tuned against the reference scenarios. Changing
/// them affects pacing and the ceiling of reward payouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on rounds per session
    ///
    /// Damage per round can be arbitrarily small (high defense, low
    /// attack), so the loop must not rely on health reaching zero. At the
    /// cap the higher remaining-health side wins.
    pub round_cap: u32,

    /// Health each participant starts an encounter with
    pub starting_health: f32,

    /// Bounded attempt count for compare-and-swap writes to shared records
    ///
    /// Conflicts past this budget surface as a retryable failure instead
    /// of spinning.
    pub cas_retry_limit: u32,

    /// Lower clamp for the advisory duration estimate (seconds)
    pub min_estimated_duration: f32,

    /// Upper clamp for the advisory duration estimate (seconds)
    ///
    /// The estimate is presentation metadata only; the state machine never
    /// schedules against it.
    pub max_estimated_duration: f32,

    /// Scale factor for the duration estimate
    ///
    /// At 40.0, an evenly-matched pair at base speed lands mid-range
    /// (~27s) before clamping.
    pub duration_scale: f32,

    /// Accumulated influence at which a faction takes control of a
    /// contested territory
    pub control_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_cap: 100,
            starting_health: 100.0,
            cas_retry_limit: 4,
            min_estimated_duration: 10.0,
            max_estimated_duration: 60.0,
            duration_scale: 40.0,
            control_threshold: 100.0,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text (missing fields keep defaults)
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.round_cap == 0 {
            return Err(HiveError::InvalidConfig("round_cap must be positive".into()));
        }

        if self.starting_health <= 0.0 {
            return Err(HiveError::InvalidConfig(
                "starting_health must be positive".into(),
            ));
        }

        if self.min_estimated_duration > self.max_estimated_duration {
            return Err(HiveError::InvalidConfig(format!(
                "min_estimated_duration ({}) must be <= max_estimated_duration ({})",
                self.min_estimated_duration, self.max_estimated_duration
            )));
        }

        if self.cas_retry_limit == 0 {
            return Err(HiveError::InvalidConfig(
                "cas_retry_limit must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_round_cap_rejected() {
        let config = EngineConfig {
            round_cap: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("round_cap = 50\n").unwrap();
        assert_eq!(config.round_cap, 50);
        assert_eq!(config.cas_retry_limit, EngineConfig::default().cas_retry_limit);
    }

    #[test]
    fn test_inverted_duration_bounds_rejected() {
        let config = EngineConfig {
            min_estimated_duration: 90.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
