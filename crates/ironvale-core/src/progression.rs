//! Leveling math shared by combat, adventure, and gathering
//!
//! Both tracks use the same exponential curve shape with different
//! constants. The EXP required to advance from level `L` to `L + 1` is
//! `floor(base * rate^(L - 1))`; experience is spent down on each level-up
//! so a record only ever holds the EXP accumulated toward its next level.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exponential EXP threshold curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpCurve {
    pub base: f64,
    pub rate: f64,
}

/// Character level curve
pub const CHARACTER_CURVE: ExpCurve = ExpCurve {
    base: 100.0,
    rate: 1.3,
};

/// Gathering skill curve
pub const GATHERING_CURVE: ExpCurve = ExpCurve {
    base: 50.0,
    rate: 1.2,
};

/// Upgrade points granted per character level
pub const POINTS_PER_LEVEL: u32 = 3;
/// Base max-HP growth per character level
pub const HP_PER_LEVEL: u32 = 10;
/// Base attack growth per character level
pub const ATK_PER_LEVEL: u32 = 1;
/// Base defense growth per character level
pub const DEF_PER_LEVEL: u32 = 1;
/// Max-HP granted by one allocated point
pub const HP_PER_POINT: u32 = 5;
/// Attack granted by one allocated point
pub const ATK_PER_POINT: u32 = 1;
/// Defense granted by one allocated point
pub const DEF_PER_POINT: u32 = 1;

impl ExpCurve {
    /// EXP needed to go from `level` to `level + 1`
    ///
    /// Levels below 1 are treated as level 1.
    pub fn exp_for_next_level(&self, level: u32) -> u64 {
        let exponent = level.max(1) - 1;
        let exponent = i32::try_from(exponent).unwrap_or(i32::MAX);
        // `as` saturates for values beyond u64::MAX
        (self.base * self.rate.powi(exponent)).floor() as u64
    }

    /// Add `gained` EXP to a track at `level` holding `exp`, cascading
    /// through as many level-ups as the total covers
    pub fn apply_exp(&self, level: u32, exp: u64, gained: u64) -> LevelProgress {
        let mut level = level.max(1);
        let mut exp = exp.saturating_add(gained);
        let mut levels_gained = 0;

        let mut needed = self.exp_for_next_level(level);
        while exp >= needed {
            exp -= needed;
            level += 1;
            levels_gained += 1;
            needed = self.exp_for_next_level(level);
        }

        LevelProgress {
            levels_gained,
            level,
            exp,
        }
    }

    /// Progress toward the next level as a percentage in `0.0..=100.0`
    pub fn percent_to_next(&self, level: u32, exp: u64) -> f64 {
        let needed = self.exp_for_next_level(level);
        if needed == 0 {
            return 0.0;
        }
        (exp as f64 / needed as f64 * 100.0).min(100.0)
    }
}

/// Outcome of routing EXP through a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    /// Number of levels crossed
    pub levels_gained: u32,
    /// Level after the gain
    pub level: u32,
    /// EXP carried toward the next level
    pub exp: u64,
}

impl LevelProgress {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Stat that an upgrade point can be spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    MaxHp,
    Atk,
    Def,
}

impl StatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatType::MaxHp => "maxhp",
            StatType::Atk => "atk",
            StatType::Def => "def",
        }
    }
}

impl FromStr for StatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maxhp" => Ok(StatType::MaxHp),
            "atk" => Ok(StatType::Atk),
            "def" => Ok(StatType::Def),
            _ => Err(Error::InvalidStat(s.to_string())),
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_thresholds() {
        assert_eq!(CHARACTER_CURVE.exp_for_next_level(1), 100);
        assert_eq!(CHARACTER_CURVE.exp_for_next_level(2), 130);
        assert_eq!(CHARACTER_CURVE.exp_for_next_level(3), 169);
        assert_eq!(CHARACTER_CURVE.exp_for_next_level(0), 100);
    }

    #[test]
    fn test_gathering_thresholds() {
        assert_eq!(GATHERING_CURVE.exp_for_next_level(1), 50);
        assert_eq!(GATHERING_CURVE.exp_for_next_level(2), 60);
        assert_eq!(GATHERING_CURVE.exp_for_next_level(3), 72);
    }

    #[test]
    fn test_thresholds_strictly_increase() {
        for curve in [CHARACTER_CURVE, GATHERING_CURVE] {
            let mut previous = curve.exp_for_next_level(1);
            for level in 2..60 {
                let next = curve.exp_for_next_level(level);
                assert!(next > previous, "level {} threshold did not grow", level);
                previous = next;
            }
        }
    }

    #[test]
    fn test_exact_boundary_levels_up_with_zero_left() {
        let progress = CHARACTER_CURVE.apply_exp(1, 99, 1);
        assert!(progress.leveled_up());
        assert_eq!(progress.level, 2);
        assert_eq!(progress.exp, 0);
    }

    #[test]
    fn test_below_threshold_keeps_level() {
        let progress = CHARACTER_CURVE.apply_exp(1, 0, 99);
        assert!(!progress.leveled_up());
        assert_eq!(progress.level, 1);
        assert_eq!(progress.exp, 99);
    }

    #[test]
    fn test_multi_level_cascade() {
        // 100 + 130 + 169 = 399 crosses three levels with 1 left over
        let progress = CHARACTER_CURVE.apply_exp(1, 0, 400);
        assert_eq!(progress.levels_gained, 3);
        assert_eq!(progress.level, 4);
        assert_eq!(progress.exp, 1);
    }

    #[test]
    fn test_percent_to_next() {
        assert_eq!(GATHERING_CURVE.percent_to_next(1, 25), 50.0);
        assert_eq!(GATHERING_CURVE.percent_to_next(1, 500), 100.0);
    }

    #[test]
    fn test_stat_type_parse() {
        assert_eq!("MaxHP".parse::<StatType>(), Ok(StatType::MaxHp));
        assert_eq!("atk".parse::<StatType>(), Ok(StatType::Atk));
        assert_eq!(
            "luck".parse::<StatType>(),
            Err(Error::InvalidStat("luck".to_string()))
        );
    }
}
