//! Engine configuration module.
//!
//! Provides the defaults the engine falls back to when a competition does not
//! specify something itself.

use crate::errors::{EngineError, EngineResult};
use crate::tournament::config::ScoringWeights;
use std::env;

/// Group count used when a group stage does not declare one
pub const DEFAULT_GROUP_COUNT: usize = 4;

/// Round count used when a Swiss draw does not declare one
pub const DEFAULT_SWISS_ROUNDS: u32 = 5;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scoring weights for competitions that do not bring their own
    pub default_scoring: ScoringWeights,

    /// Number of groups for `group_stage` without an explicit count
    pub default_group_count: usize,

    /// Number of rounds for `swiss` without an explicit count
    pub default_swiss_rounds: u32,

    /// Field name used when the venue supplies no fields
    pub default_field: String,

    /// Hour (UTC) of the first synthesized time slot
    pub day_start_hour: u32,

    /// Number of hourly slots synthesized for a competition day
    pub day_slots: u32,

    /// Match length used for referee conflict checks, in minutes
    pub match_duration_minutes: i64,
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `FX_POINTS_WIN` / `FX_POINTS_DRAW` / `FX_POINTS_LOSS`: scoring weights (default: 3/1/0)
    /// - `FX_DEFAULT_GROUPS`: group count for group stages (default: 4)
    /// - `FX_SWISS_ROUNDS`: Swiss round count (default: 5)
    /// - `FX_DEFAULT_FIELD`: fallback field name (default: "Field 1")
    /// - `FX_DAY_START_HOUR`: first synthesized slot hour (default: 9)
    /// - `FX_DAY_SLOTS`: synthesized slots per day (default: 9)
    /// - `FX_MATCH_DURATION_MINUTES`: match length (default: 90)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_scoring: ScoringWeights {
                win: parse_env_or("FX_POINTS_WIN", defaults.default_scoring.win),
                draw: parse_env_or("FX_POINTS_DRAW", defaults.default_scoring.draw),
                loss: parse_env_or("FX_POINTS_LOSS", defaults.default_scoring.loss),
            },
            default_group_count: parse_env_or("FX_DEFAULT_GROUPS", defaults.default_group_count),
            default_swiss_rounds: parse_env_or("FX_SWISS_ROUNDS", defaults.default_swiss_rounds),
            default_field: env::var("FX_DEFAULT_FIELD").unwrap_or(defaults.default_field),
            day_start_hour: parse_env_or("FX_DAY_START_HOUR", defaults.day_start_hour),
            day_slots: parse_env_or("FX_DAY_SLOTS", defaults.day_slots),
            match_duration_minutes: parse_env_or(
                "FX_MATCH_DURATION_MINUTES",
                defaults.match_duration_minutes,
            ),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> EngineResult<()> {
        if self.default_group_count == 0 {
            return Err(EngineError::InvalidConfig(
                "FX_DEFAULT_GROUPS must be at least 1".to_string(),
            ));
        }

        if self.default_swiss_rounds == 0 {
            return Err(EngineError::InvalidConfig(
                "FX_SWISS_ROUNDS must be at least 1".to_string(),
            ));
        }

        if self.day_slots == 0 || self.day_start_hour + self.day_slots > 24 {
            return Err(EngineError::InvalidConfig(format!(
                "{} hourly slots starting at {}:00 do not fit in a day",
                self.day_slots, self.day_start_hour
            )));
        }

        if self.match_duration_minutes <= 0 {
            return Err(EngineError::InvalidConfig(
                "FX_MATCH_DURATION_MINUTES must be positive".to_string(),
            ));
        }

        if self.default_field.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "FX_DEFAULT_FIELD must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_scoring: ScoringWeights::default(),
            default_group_count: DEFAULT_GROUP_COUNT,
            default_swiss_rounds: DEFAULT_SWISS_ROUNDS,
            default_field: "Field 1".to_string(),
            day_start_hour: 9,
            day_slots: 9,
            match_duration_minutes: 90,
        }
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.day_slots, 9);
        assert_eq!(config.default_scoring.win, 3);
    }

    #[test]
    fn test_validation_rejects_overflowing_day() {
        let config = EngineConfig {
            day_start_hour: 20,
            day_slots: 9,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_groups() {
        let config = EngineConfig {
            default_group_count: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_or_falls_back() {
        let value: u32 = parse_env_or("FX_TEST_VARIABLE_THAT_IS_NEVER_SET", 7);
        assert_eq!(value, 7);
    }
}
