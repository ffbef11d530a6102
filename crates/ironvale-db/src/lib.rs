//! Ironvale DB - entity store using native_db
//!
//! Provides persistent storage for:
//! - Characters, wallets, gathering skills, and inventory stacks
//! - Marketplace listings and open battle sessions
//! - The item and enemy catalog
//!
//! Reads happen through a [`Snapshot`]. Writes happen through
//! [`Store::commit`], which applies an `ironvale_core::WriteSet` atomically
//! and rejects it with [`Error::Conflict`] if anything it overwrites changed
//! since the snapshot was taken.

mod commit;
mod conflict;
mod error;
mod models;
mod snapshot;
mod store;

pub use commit::CommitResult;
pub use conflict::{Conflict, ConflictKind};
pub use error::{Error, Result};
pub use snapshot::Snapshot;
pub use store::Store;
