//! Ironvale Core - domain model and rules for the ironvale game engine
//!
//! This crate holds everything about the game that does not touch storage:
//! - Record identifiers and fixed-point `Gold`
//! - Character, wallet, inventory, gathering skill, listing, and battle records
//! - Item and enemy catalog definitions
//! - Progression curves and level-up growth
//! - Effective stats and the combat turn state machine
//! - The adventure encounter table
//! - `WriteSet`/`PendingWrite`, the deferred-write format committed by `ironvale-db`
//!
//! Every mutator here either applies fully or returns an [`Error`] and leaves
//! its receiver untouched.

mod actor;
pub mod adventure;
mod battle;
mod character;
pub mod combat;
mod enemy;
mod error;
pub mod gathering;
mod identity;
mod inventory;
mod item;
mod listing;
mod money;
pub mod progression;
mod stats;
mod wallet;
mod write_set;

pub use actor::{Principal, Role};
pub use adventure::{EncounterKind, EncounterWeights};
pub use battle::Battle;
pub use character::{defaults as character_defaults, Character, LevelUp};
pub use combat::{BattleStatus, TurnReport};
pub use enemy::{Enemy, RewardRange, Rewards};
pub use error::{Error, ErrorCode, Result};
pub use gathering::{GatheringSkill, ResourceType};
pub use identity::{AccountId, BattleId, CharacterId, EnemyId, EntryId, ItemId, ListingId};
pub use inventory::InventoryEntry;
pub use item::{EquipSlot, Item, ItemCategory, Rarity};
pub use listing::{ListingKind, ListingStatus, ListingType, MarketListing, PriceType};
pub use money::Gold;
pub use progression::{ExpCurve, LevelProgress, StatType};
pub use stats::EffectiveStats;
pub use wallet::Wallet;
pub use write_set::{PendingWrite, WriteSet, WriteSetResult};
