//! Adventure encounter table

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What an adventure step turned up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterKind {
    Enemy,
    Resource,
    Gold,
    Exp,
}

/// Relative encounter weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterWeights {
    pub enemy: u32,
    pub resource: u32,
    pub gold: u32,
    pub exp: u32,
}

impl Default for EncounterWeights {
    fn default() -> Self {
        Self {
            enemy: 20,
            resource: 40,
            gold: 25,
            exp: 15,
        }
    }
}

impl EncounterWeights {
    const KINDS: [EncounterKind; 4] = [
        EncounterKind::Enemy,
        EncounterKind::Resource,
        EncounterKind::Gold,
        EncounterKind::Exp,
    ];

    fn as_array(&self) -> [u32; 4] {
        [self.enemy, self.resource, self.gold, self.exp]
    }

    /// At least one weight is non-zero
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().any(|w| *w > 0)
    }

    /// Weighted draw; `None` if every weight is zero
    pub fn roll(&self, rng: &mut impl Rng) -> Option<EncounterKind> {
        let index = WeightedIndex::new(self.as_array()).ok()?;
        Some(Self::KINDS[index.sample(rng)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_distribution_follows_weights() {
        let weights = EncounterWeights::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts: HashMap<EncounterKind, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(weights.roll(&mut rng).unwrap()).or_default() += 1;
        }
        // expected 2000 / 4000 / 2500 / 1500
        let within = |kind, expected: i64| {
            let got = i64::from(counts[&kind]);
            (got - expected).abs() < 300
        };
        assert!(within(EncounterKind::Enemy, 2000));
        assert!(within(EncounterKind::Resource, 4000));
        assert!(within(EncounterKind::Gold, 2500));
        assert!(within(EncounterKind::Exp, 1500));
    }

    #[test]
    fn test_single_weight_always_wins() {
        let weights = EncounterWeights {
            enemy: 0,
            resource: 0,
            gold: 1,
            exp: 0,
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert!((0..100).all(|_| weights.roll(&mut rng) == Some(EncounterKind::Gold)));
    }

    #[test]
    fn test_all_zero_is_invalid() {
        let weights = EncounterWeights {
            enemy: 0,
            resource: 0,
            gold: 0,
            exp: 0,
        };
        assert!(!weights.is_valid());
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(weights.roll(&mut rng), None);
    }
}
