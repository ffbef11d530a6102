//! Database models for persistent storage.
//!
//! Each stored model embeds the domain record and lifts the fields that are
//! looked up by into native_db keys.

mod catalog;
mod player;

pub use catalog::*;
pub use player::*;
