//! Host configuration from the environment.

use anyhow::Context;
use catmatch_core::RulesConfig;

/// Seed for the deal shuffle
pub const SEED_VAR: &str = "CATMATCH_SEED";
/// Path to a rules JSON file
pub const RULES_VAR: &str = "CATMATCH_RULES";

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub seed: u64,
    pub rules: RulesConfig,
}

impl HostConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::var(SEED_VAR).ok(), std::env::var(RULES_VAR).ok())
    }

    fn from_vars(seed: Option<String>, rules_path: Option<String>) -> anyhow::Result<Self> {
        let seed = match seed {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("{} must be an unsigned integer, got {:?}", SEED_VAR, raw)
            })?,
            None => rand::random(),
        };

        let rules = match rules_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading rules file {}", path))?;
                RulesConfig::from_json(&json)
                    .with_context(|| format!("loading rules from {}", path))?
            }
            None => RulesConfig::default(),
        };

        Ok(Self { seed, rules })
    }
}
