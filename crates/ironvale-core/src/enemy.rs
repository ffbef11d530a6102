//! Enemy catalog definitions and reward draws

use crate::{EnemyId, Gold};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive reward range
///
/// The bounds are authored independently, so `min > max` is possible in
/// catalog data. Such a range collapses to `[min, min]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRange {
    pub min: u64,
    pub max: u64,
}

impl RewardRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Upper bound after clamping an inverted range
    pub fn effective_max(&self) -> u64 {
        self.max.max(self.min)
    }

    /// Uniform draw over `min..=effective_max`
    pub fn roll(&self, rng: &mut impl Rng) -> u64 {
        rng.gen_range(self.min..=self.effective_max())
    }
}

/// A catalog enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub reward_exp: RewardRange,
    /// Gold reward in whole pieces
    pub reward_gold: RewardRange,
}

/// Spoils of a won battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub exp: u64,
    pub gold: Gold,
}

impl Enemy {
    /// Draw EXP and gold independently from the reward ranges
    pub fn roll_rewards(&self, rng: &mut impl Rng) -> Rewards {
        let exp = self.reward_exp.roll(rng);
        let gold = Gold::from_whole(self.reward_gold.roll(rng));
        Rewards { exp, gold }
    }
}
