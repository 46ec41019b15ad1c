//! Tunable rule constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a rules configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("starting_moves must be positive (got {0})")]
    NoStartingMoves(i32),

    #[error("lazy_wake_attempts must be at least 1")]
    NoWakeAttempts,

    #[error("oven_turns must be at least 1")]
    NoOvenTurns,
}

/// Rule constants for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Moves available at the start of a game
    pub starting_moves: i32,
    /// Clicks a tracked lazy card absorbs before it wakes
    pub lazy_wake_attempts: u32,
    /// Turns a card spends in the oven
    pub oven_turns: u32,
    pub death_bonus_moves: i32,
    pub maneki_bonus_moves: i32,
    /// Delay between the second reveal and its resolution
    pub resolution_delay_ms: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_moves: 35,
            lazy_wake_attempts: 2,
            oven_turns: 2,
            death_bonus_moves: 7,
            maneki_bonus_moves: 1,
            resolution_delay_ms: 1200,
        }
    }
}

impl RulesConfig {
    /// Parse and validate a JSON rules document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: RulesConfig = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_moves <= 0 {
            return Err(ConfigError::NoStartingMoves(self.starting_moves));
        }
        if self.lazy_wake_attempts == 0 {
            return Err(ConfigError::NoWakeAttempts);
        }
        if self.oven_turns == 0 {
            return Err(ConfigError::NoOvenTurns);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RulesConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rules = RulesConfig::from_json(r#"{"starting_moves": 20}"#).unwrap();
        assert_eq!(rules.starting_moves, 20);
        assert_eq!(rules.oven_turns, 2);
        assert_eq!(rules.resolution_delay_ms, 1200);
    }

    #[test]
    fn test_rejects_invalid_rules() {
        assert!(matches!(
            RulesConfig::from_json(r#"{"starting_moves": 0}"#),
            Err(ConfigError::NoStartingMoves(0))
        ));
        assert!(matches!(
            RulesConfig::from_json(r#"{"oven_turns": 0}"#),
            Err(ConfigError::NoOvenTurns)
        ));
        assert!(matches!(
            RulesConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
