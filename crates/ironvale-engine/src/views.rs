//! Success payloads returned by engine operations
//!
//! Each operation returns its own shape; together with
//! [`Failure`](crate::Failure) they form the result envelope consumed by the
//! web layer.

use chrono::{DateTime, Utc};
use ironvale_core::{
    AccountId, BattleId, BattleStatus, Character, CharacterId, EffectiveStats, Enemy, EnemyId,
    EntryId, EquipSlot, Gold, InventoryEntry, Item, ItemCategory, ItemId, LevelUp, ListingId,
    ListingStatus, ListingType, MarketListing, PriceType, Rarity, ResourceType, Rewards, StatType,
    TurnReport,
};
use serde::{Deserialize, Serialize};

/// Everything the character page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    pub exp_to_next_level: u64,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub atk: u32,
    pub def: u32,
    pub upgrade_points: u32,
    pub gold: Gold,
}

impl CharacterSheet {
    pub(crate) fn new(character: &Character, gold: Gold) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            level: character.level,
            experience: character.experience,
            exp_to_next_level: character.exp_to_next_level(),
            health: character.health,
            max_health: character.max_health,
            energy: character.energy,
            max_energy: character.max_energy,
            atk: character.atk,
            def: character.def,
            upgrade_points: character.upgrade_points,
            gold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatAllocation {
    pub stat: StatType,
    pub sheet: CharacterSheet,
}

/// One inventory stack joined with its catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryView {
    pub entry: EntryId,
    pub item: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub quantity: u32,
    pub equipped: bool,
    pub slot: Option<EquipSlot>,
    pub atk_bonus: u32,
    pub def_bonus: u32,
    pub heal: u32,
    pub tradeable: bool,
    pub acquired_at: DateTime<Utc>,
}

impl InventoryView {
    pub(crate) fn new(entry: &InventoryEntry, item: &Item) -> Self {
        Self {
            entry: entry.id,
            item: item.id,
            name: item.name.clone(),
            category: item.category,
            rarity: item.rarity,
            quantity: entry.quantity,
            equipped: entry.equipped,
            slot: item.slot,
            atk_bonus: item.atk_bonus,
            def_bonus: item.def_bonus,
            heal: item.heal,
            tradeable: item.tradeable,
            acquired_at: entry.acquired_at,
        }
    }
}

/// Result of an equip or unequip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentChange {
    pub entry: EntryId,
    pub equipped: bool,
    /// Entry taken out of the slot to make room, if any
    pub displaced: Option<EntryId>,
    pub stats: EffectiveStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOutcome {
    pub healed: u32,
    pub recovered: u32,
    pub health: u32,
    pub energy: u32,
}

/// What an adventure step found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encounter {
    /// An enemy to fight; the caller opens the battle
    Enemy { enemy: EnemyId, name: String },
    /// A resource node to gather from
    Resource { resource: ResourceType },
    Gold { amount: Gold },
    Exp {
        gained: u64,
        level_up: Option<LevelUp>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureOutcome {
    pub encounter: Encounter,
    pub energy: u32,
}

// ============================================================================
// Combat
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub name: String,
    pub icon: String,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
}

impl EnemyView {
    pub(crate) fn new(enemy: &Enemy, hp: u32) -> Self {
        Self {
            id: enemy.id,
            name: enemy.name.clone(),
            icon: enemy.icon.clone(),
            hp,
            max_hp: enemy.max_hp,
            atk: enemy.atk,
            def: enemy.def,
        }
    }
}

/// A potion stack usable in battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionView {
    pub entry: EntryId,
    pub name: String,
    pub heal: u32,
    pub quantity: u32,
}

/// The battle page: session, both combatants, and usable potions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleView {
    pub battle: BattleId,
    pub turn: u32,
    pub enemy: EnemyView,
    pub health: u32,
    pub max_health: u32,
    pub stats: EffectiveStats,
    pub potions: Vec<PotionView>,
}

/// Result of one attack or potion turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub report: TurnReport,
    /// Present when the battle was won
    pub rewards: Option<Rewards>,
    pub level_up: Option<LevelUp>,
}

impl TurnOutcome {
    pub fn status(&self) -> BattleStatus {
        self.report.status
    }
}

// ============================================================================
// Gathering
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherOutcome {
    pub resource: ResourceType,
    pub item: ItemId,
    pub item_name: String,
    pub quantity: u32,
    pub exp_gained: u64,
    pub skill_level: u32,
    pub levels_gained: u32,
    pub energy: u32,
}

/// The gathering page for one resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatheringPage {
    pub resource: ResourceType,
    pub skill_name: String,
    pub item: Option<ItemId>,
    pub item_name: Option<String>,
    pub level: u32,
    pub exp: u64,
    pub exp_to_next_level: u64,
    /// Progress toward the next level, 0 to 100
    pub progress_percent: f64,
    pub energy_cost: u32,
    pub gold: Gold,
    pub energy: u32,
    pub max_energy: u32,
    pub health: u32,
    pub max_health: u32,
}

// ============================================================================
// Marketplace
// ============================================================================

/// A listing joined with its catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingView {
    pub id: ListingId,
    pub seller: AccountId,
    pub item: ItemId,
    pub item_name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub quantity: u32,
    pub price: Gold,
    pub status: ListingStatus,
    pub listing_type: ListingType,
    pub price_type: PriceType,
    pub created_at: DateTime<Utc>,
}

impl ListingView {
    pub(crate) fn new(listing: &MarketListing, item: &Item) -> Self {
        Self {
            id: listing.id,
            seller: listing.seller,
            item: listing.item_id,
            item_name: item.name.clone(),
            category: item.category,
            rarity: item.rarity,
            quantity: listing.quantity,
            price: listing.price,
            status: listing.status,
            listing_type: listing.listing_type,
            price_type: listing.price_type,
            created_at: listing.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub listing: ListingId,
    pub item: ItemId,
    pub quantity: u32,
    pub price: Gold,
    pub balance: Gold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSale {
    pub item: ItemId,
    pub quantity: u32,
    pub payout: Gold,
    pub balance: Gold,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index
    pub page: u32,
    pub per_page: u32,
    /// Matches across all pages
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as usize)
    }
}
