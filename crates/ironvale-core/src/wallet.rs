//! Per-account currency wallet

use crate::error::{Error, Result};
use crate::{AccountId, Gold};
use serde::{Deserialize, Serialize};

/// An account's wallet; the balance can never go below zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub owner: AccountId,
    pub balance: Gold,
    pub version: u64,
}

impl Wallet {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            balance: Gold::ZERO,
            version: 0,
        }
    }

    /// Withdraw `amount`, failing without mutation if funds are short
    pub fn debit(&mut self, amount: Gold) -> Result<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientFunds {
                required: amount,
                available: self.balance,
            })?;
        Ok(())
    }

    /// Deposit `amount`
    pub fn credit(&mut self, amount: Gold) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(Error::Overflow("wallet credit"))?;
        Ok(())
    }
}
