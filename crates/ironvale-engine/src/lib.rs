//! Ironvale Engine - transactional game-state operations
//!
//! Every operation here runs as one optimistic transaction over the
//! `ironvale-db` store: read a snapshot, validate against it, commit a
//! `WriteSet`. A commit that races another write is re-run from a fresh
//! snapshot, so two requests touching the same wallet, stack, or listing
//! never both succeed on stale data.
//!
//! Operations by area:
//! - Characters: `create_character`, `character_sheet`,
//!   `allocate_stat_point`, `effective_stats`, `inventory`, `equip`,
//!   `unequip`, `rest`, `adventure`
//! - Combat: `battle_state`, `attack`, `use_item`, `flee`
//! - Gathering: `gather`, `gathering_page`
//! - Marketplace: `create_listing`, `cancel_listing`, `buy_item`,
//!   `sell_to_system`, `list_active_listings`, `list_my_listings`
//!
//! The web layer turns results into the serializable [`Outcome`] envelope
//! with `result.map_err(Failure::from)`.

mod character;
mod combat;
mod config;
mod engine;
mod error;
mod gathering;
mod market;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Failure, Outcome, Result};
pub use market::{ListingFilter, NewListing, PageRequest};
