//! Inventory entries: one stack per (account, item)

use crate::error::{Error, Result};
use crate::{AccountId, EntryId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stack of one item type held by one account
///
/// A stack that reaches zero is deleted rather than kept around empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: EntryId,
    pub owner: AccountId,
    pub item_id: ItemId,
    pub quantity: u32,
    pub equipped: bool,
    pub acquired_at: DateTime<Utc>,
    pub version: u64,
}

impl InventoryEntry {
    /// Check that `account` owns this stack
    pub fn ensure_owner(&self, account: AccountId) -> Result<()> {
        if self.owner != account {
            return Err(Error::NotOwned(self.id.to_string()));
        }
        Ok(())
    }

    /// Fail with `NoStock` if the stack holds nothing
    ///
    /// Commits delete emptied stacks, so this only trips on rows written
    /// outside the engine.
    pub fn ensure_stock(&self, item_name: &str) -> Result<()> {
        if self.quantity == 0 {
            return Err(Error::NoStock(item_name.to_string()));
        }
        Ok(())
    }

    /// Remove `quantity` units, failing without mutation if short
    ///
    /// Returns true if the stack is now empty and should be deleted.
    pub fn take(&mut self, quantity: u32) -> Result<bool> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }
        if self.quantity < quantity {
            return Err(Error::InsufficientItems {
                required: quantity,
                available: self.quantity,
            });
        }
        self.quantity -= quantity;
        Ok(self.quantity == 0)
    }
}
