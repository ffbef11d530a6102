//! Player character record and its self-contained state transitions

use crate::error::{Error, Result};
use crate::progression::{self, LevelProgress, StatType, CHARACTER_CURVE};
use crate::{AccountId, CharacterId};
use serde::{Deserialize, Serialize};

/// Starting values for a freshly provisioned character
pub mod defaults {
    pub const LEVEL: u32 = 1;
    pub const MAX_HEALTH: u32 = 100;
    pub const ATK: u32 = 10;
    pub const DEF: u32 = 5;
    pub const MAX_ENERGY: u32 = 50;
}

/// A player character
///
/// `health` stays within `0..=max_health` and `energy` within
/// `0..=max_energy`; every mutator here preserves that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub owner: AccountId,
    pub name: String,
    pub level: u32,
    /// EXP accumulated toward the next level
    pub experience: u64,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub atk: u32,
    pub def: u32,
    pub upgrade_points: u32,
    /// Optimistic concurrency version, bumped on every committed update
    pub version: u64,
}

/// What a single EXP gain did to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub levels_gained: u32,
    pub level: u32,
}

impl Character {
    /// A level-1 character with default stats
    pub fn new(id: CharacterId, owner: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            level: defaults::LEVEL,
            experience: 0,
            health: defaults::MAX_HEALTH,
            max_health: defaults::MAX_HEALTH,
            energy: defaults::MAX_ENERGY,
            max_energy: defaults::MAX_ENERGY,
            atk: defaults::ATK,
            def: defaults::DEF,
            upgrade_points: 0,
            version: 0,
        }
    }

    /// EXP needed to reach the next level from the current one
    pub fn exp_to_next_level(&self) -> u64 {
        CHARACTER_CURVE.exp_for_next_level(self.level)
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= self.max_health
    }

    pub fn is_rested(&self) -> bool {
        self.is_full_health() && self.energy >= self.max_energy
    }

    /// Route EXP through the character curve, applying per-level growth
    ///
    /// Each level crossed grants max-HP, attack, defense, and upgrade points,
    /// and refills health and energy to the new maximums.
    pub fn gain_exp(&mut self, gained: u64) -> Option<LevelUp> {
        let LevelProgress {
            levels_gained,
            level,
            exp,
        } = CHARACTER_CURVE.apply_exp(self.level, self.experience, gained);

        self.level = level;
        self.experience = exp;
        if levels_gained == 0 {
            return None;
        }

        self.max_health += progression::HP_PER_LEVEL * levels_gained;
        self.atk += progression::ATK_PER_LEVEL * levels_gained;
        self.def += progression::DEF_PER_LEVEL * levels_gained;
        self.upgrade_points += progression::POINTS_PER_LEVEL * levels_gained;
        self.health = self.max_health;
        self.energy = self.max_energy;

        Some(LevelUp {
            levels_gained,
            level,
        })
    }

    /// Spend one upgrade point on a stat
    pub fn allocate_point(&mut self, stat: StatType) -> Result<()> {
        if self.upgrade_points == 0 {
            return Err(Error::InsufficientPoints);
        }
        match stat {
            StatType::MaxHp => {
                self.max_health += progression::HP_PER_POINT;
                self.health = (self.health + progression::HP_PER_POINT).min(self.max_health);
            }
            StatType::Atk => self.atk += progression::ATK_PER_POINT,
            StatType::Def => self.def += progression::DEF_PER_POINT,
        }
        self.upgrade_points -= 1;
        Ok(())
    }

    /// Deduct energy, failing without mutation if there is not enough
    pub fn spend_energy(&mut self, cost: u32) -> Result<()> {
        if self.energy < cost {
            return Err(Error::InsufficientEnergy {
                required: cost,
                available: self.energy,
            });
        }
        self.energy -= cost;
        Ok(())
    }

    /// Heal up to `amount`, capped at max health; returns the HP restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health.saturating_sub(self.health));
        self.health += healed;
        healed
    }

    /// Recover up to `amount` energy, capped; returns the energy restored
    pub fn recover_energy(&mut self, amount: u32) -> u32 {
        let recovered = amount.min(self.max_energy.saturating_sub(self.energy));
        self.energy += recovered;
        recovered
    }

    /// Take damage, flooring at zero; returns true if the character dropped
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }
}
