//! Player-owned models: everything an engine operation mutates.

use ironvale_core::{
    AccountId, Battle, Character, CharacterId, GatheringSkill, InventoryEntry, ItemId,
    ListingStatus, MarketListing, ResourceType, Wallet,
};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Primary key of a gathering skill row.
pub fn skill_key(character: CharacterId, resource: ResourceType) -> String {
    format!("{}:{}", character.raw(), resource.as_str())
}

/// Unique key of an inventory stack: one per (owner, item).
pub fn stack_key(owner: AccountId, item: ItemId) -> String {
    format!("{}:{}", owner.raw(), item.raw())
}

/// Stored character. One per owning account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredCharacter {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub owner: u64,
    pub record: Character,
}

impl From<Character> for StoredCharacter {
    fn from(record: Character) -> Self {
        Self {
            id: record.id.raw(),
            owner: record.owner.raw(),
            record,
        }
    }
}

/// Stored wallet, keyed by its owning account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredWallet {
    #[primary_key]
    pub owner: u64,
    pub record: Wallet,
}

impl From<Wallet> for StoredWallet {
    fn from(record: Wallet) -> Self {
        Self {
            owner: record.owner.raw(),
            record,
        }
    }
}

/// Stored gathering skill. One per (character, resource type).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredSkill {
    #[primary_key]
    pub key: String,
    #[secondary_key]
    pub character: u64,
    pub record: GatheringSkill,
}

impl From<GatheringSkill> for StoredSkill {
    fn from(record: GatheringSkill) -> Self {
        Self {
            key: skill_key(record.character, record.resource),
            character: record.character.raw(),
            record,
        }
    }
}

/// Stored inventory stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredInventoryEntry {
    #[primary_key]
    pub id: u64,
    #[secondary_key]
    pub owner: u64,
    #[secondary_key(unique)]
    pub stack: String,
    pub record: InventoryEntry,
}

impl From<InventoryEntry> for StoredInventoryEntry {
    fn from(record: InventoryEntry) -> Self {
        Self {
            id: record.id.raw(),
            owner: record.owner.raw(),
            stack: stack_key(record.owner, record.item_id),
            record,
        }
    }
}

/// Stored marketplace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredListing {
    #[primary_key]
    pub id: u64,
    #[secondary_key]
    pub status: String,
    #[secondary_key]
    pub seller: u64,
    pub record: MarketListing,
}

impl StoredListing {
    pub fn status_key(status: ListingStatus) -> String {
        status.as_str().to_string()
    }
}

impl From<MarketListing> for StoredListing {
    fn from(record: MarketListing) -> Self {
        Self {
            id: record.id.raw(),
            status: Self::status_key(record.status),
            seller: record.seller.raw(),
            record,
        }
    }
}

/// Stored battle session. At most one per character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredBattle {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub character: u64,
    pub record: Battle,
}

impl From<Battle> for StoredBattle {
    fn from(record: Battle) -> Self {
        Self {
            id: record.id.raw(),
            character: record.character.raw(),
            record,
        }
    }
}

/// Named id sequence; `next` is the next id to hand out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 7, version = 1)]
#[native_db]
pub struct StoredSequence {
    #[primary_key]
    pub name: String,
    pub next: u64,
}
