//! Fixed-point currency
//!
//! Balances and prices are stored as whole hundredths ("cents") in an
//! unsigned integer, matching a `DECIMAL(18,2)` column. There is no floating
//! point anywhere on the money path, and a negative amount cannot be
//! represented at all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal places carried by [`Gold`].
const DECIMAL_PLACES: u32 = 2;

/// The multiplier for two decimal places.
const MULTIPLIER: u64 = 10u64.pow(DECIMAL_PLACES);

/// An amount of in-game currency with two exact decimal places
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gold(u64);

impl Gold {
    /// Zero gold
    pub const ZERO: Self = Self(0);

    /// Create from a whole number of gold pieces, saturating at the
    /// largest representable amount
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole.saturating_mul(MULTIPLIER))
    }

    /// Create from hundredths
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Raw value in hundredths
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Whole-number part
    pub const fn whole(self) -> u64 {
        self.0 / MULTIPLIER
    }

    /// Fractional part in hundredths (0..=99)
    pub const fn fraction(self) -> u64 {
        self.0 % MULTIPLIER
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Checked subtraction; `None` if the result would be negative
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Checked multiplication by a quantity
    pub fn checked_mul(self, quantity: u64) -> Option<Self> {
        self.0.checked_mul(quantity).map(Self)
    }

    /// Apply a percentage rate, truncating to whole hundredths
    pub fn checked_percent(self, percent: u32) -> Option<Self> {
        self.0
            .checked_mul(u64::from(percent))
            .map(|scaled| Self(scaled / 100))
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.whole(), self.fraction())
    }
}
