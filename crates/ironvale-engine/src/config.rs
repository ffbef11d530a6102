//! Engine configuration
//!
//! Every tunable has a default matching the live game, so an empty RON
//! document `()` is a valid configuration.

use crate::error::{Error, Result};
use ironvale_core::{EncounterWeights, RewardRange};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for [`Engine`](crate::Engine)
///
/// # Example
///
/// ```
/// use ironvale_engine::EngineConfig;
///
/// let config = EngineConfig::from_ron_str("(max_attempts: 5, buyback_percent: 60)").unwrap();
/// assert_eq!(config.max_attempts, 5);
/// assert_eq!(config.gather_energy_cost, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Times an operation is run before a version conflict is reported as
    /// `Transient`
    pub max_attempts: u32,
    pub gather_energy_cost: u32,
    pub adventure_energy_cost: u32,
    pub rest_energy: u32,
    pub rest_health: u32,
    pub encounter_weights: EncounterWeights,
    /// Gold found on an adventure, in whole pieces
    pub adventure_gold: RewardRange,
    pub adventure_exp: RewardRange,
    /// Share of the catalog base price paid when selling to the system
    pub buyback_percent: u32,
    /// Upper bound on listings per page
    pub max_page_size: u32,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            gather_energy_cost: 5,
            adventure_energy_cost: 10,
            rest_energy: 20,
            rest_health: 10,
            encounter_weights: EncounterWeights::default(),
            adventure_gold: RewardRange::new(10, 20),
            adventure_exp: RewardRange::new(15, 35),
            buyback_percent: 100,
            max_page_size: 50,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse from a RON string and validate
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            ron::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_ron_str(&content)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        if !self.encounter_weights.is_valid() {
            return Err(Error::Config("at least one encounter weight must be positive".into()));
        }
        if self.max_page_size == 0 {
            return Err(Error::Config("max_page_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.adventure_energy_cost, 10);
        assert_eq!(config.encounter_weights.resource, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_ron_str("()").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_ron_str(
            "(rest_energy: 30, encounter_weights: (enemy: 50), seed: Some(9))",
        )
        .unwrap();
        assert_eq!(config.rest_energy, 30);
        assert_eq!(config.encounter_weights.enemy, 50);
        assert_eq!(config.encounter_weights.gold, 25);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let err = EngineConfig::from_ron_str("(max_attempts: 0)").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            EngineConfig::from_ron_str("(max_attempts: \"many\")"),
            Err(Error::Config(_))
        ));
    }
}
