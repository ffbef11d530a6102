//! Deferred writes for optimistic transactions
//!
//! An engine operation reads a snapshot, validates, and records the changes
//! it wants as `PendingWrite`s in a `WriteSet`. The store applies the whole
//! set in one write transaction, or none of it.
//!
//! Updates and removals carry the version the operation read. The store
//! rejects the set if any such row changed in the meantime. Additive writes
//! (`GrantItem`, `CreditWallet`) only ever increase a quantity or balance,
//! so they are applied to whatever the row currently holds.

use crate::battle::Battle;
use crate::character::Character;
use crate::gathering::GatheringSkill;
use crate::inventory::InventoryEntry;
use crate::listing::MarketListing;
use crate::wallet::Wallet;
use crate::{AccountId, BattleId, EntryId, Gold, ItemId, ListingId};
use serde::{Deserialize, Serialize};

/// A single change to be applied at commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PendingWrite {
    /// Replace a character; `version` is the one read
    UpdateCharacter(Character),

    /// Replace a wallet; `version` is the one read
    UpdateWallet(Wallet),

    /// Add to a wallet balance without a version check
    CreditWallet { owner: AccountId, amount: Gold },

    UpdateSkill(GatheringSkill),

    /// Replace an inventory entry; `version` is the one read
    UpdateEntry(InventoryEntry),

    /// Delete an emptied inventory entry
    RemoveEntry { id: EntryId, version: u64 },

    /// Add units to the owner's stack of `item_id`, creating it if absent
    GrantItem {
        owner: AccountId,
        item_id: ItemId,
        quantity: u32,
    },

    /// Create a listing; its id is allocated at commit
    InsertListing(MarketListing),

    UpdateListing(MarketListing),

    /// Open a battle session; its id is allocated at commit
    StartBattle(Battle),

    UpdateBattle(Battle),

    /// Close a battle session
    EndBattle { id: BattleId, version: u64 },
}

impl PendingWrite {
    /// The version this write expects to find, if it is version-checked
    pub fn expected_version(&self) -> Option<u64> {
        match self {
            PendingWrite::UpdateCharacter(c) => Some(c.version),
            PendingWrite::UpdateWallet(w) => Some(w.version),
            PendingWrite::UpdateSkill(s) => Some(s.version),
            PendingWrite::UpdateEntry(e) => Some(e.version),
            PendingWrite::RemoveEntry { version, .. } => Some(*version),
            PendingWrite::UpdateListing(l) => Some(l.version),
            PendingWrite::UpdateBattle(b) => Some(b.version),
            PendingWrite::EndBattle { version, .. } => Some(*version),
            PendingWrite::CreditWallet { .. }
            | PendingWrite::GrantItem { .. }
            | PendingWrite::InsertListing(_)
            | PendingWrite::StartBattle(_) => None,
        }
    }

    /// Human-readable name of the record this write touches
    pub fn target(&self) -> String {
        match self {
            PendingWrite::UpdateCharacter(c) => c.id.to_string(),
            PendingWrite::UpdateWallet(w) => format!("wallet of {}", w.owner),
            PendingWrite::CreditWallet { owner, .. } => format!("wallet of {}", owner),
            PendingWrite::UpdateSkill(s) => format!("{} {} skill", s.character, s.resource),
            PendingWrite::UpdateEntry(e) => e.id.to_string(),
            PendingWrite::RemoveEntry { id, .. } => id.to_string(),
            PendingWrite::GrantItem { owner, item_id, .. } => format!("{} stack of {}", owner, item_id),
            PendingWrite::InsertListing(_) => "new listing".to_string(),
            PendingWrite::UpdateListing(l) => l.id.to_string(),
            PendingWrite::StartBattle(b) => format!("new battle for {}", b.character),
            PendingWrite::UpdateBattle(b) => b.id.to_string(),
            PendingWrite::EndBattle { id, .. } => id.to_string(),
        }
    }
}

/// Ids allocated while applying a WriteSet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSetResult {
    pub listings: Vec<ListingId>,
    pub battles: Vec<BattleId>,
    /// Entries created by `GrantItem` on an account that lacked the item
    pub entries: Vec<EntryId>,
}

impl WriteSetResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: WriteSetResult) {
        self.listings.extend(other.listings);
        self.battles.extend(other.battles);
        self.entries.extend(other.entries);
    }
}

/// Ordered collection of pending writes committed as one unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteSet {
    writes: Vec<PendingWrite>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: PendingWrite) {
        self.writes.push(write);
    }

    pub fn extend(&mut self, other: WriteSet) {
        self.writes.extend(other.writes);
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.writes.iter()
    }

    pub fn into_writes(self) -> Vec<PendingWrite> {
        self.writes
    }

    /// Number of writes that carry a version check
    pub fn checked_len(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| w.expected_version().is_some())
            .count()
    }

    /// Concatenate several sets in order
    pub fn merge(write_sets: Vec<WriteSet>) -> WriteSet {
        let mut merged = WriteSet::new();
        for ws in write_sets {
            merged.extend(ws);
        }
        merged
    }
}
