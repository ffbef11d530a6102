//! Ironvale Script - RON catalog loader
//!
//! Loads reference data from RON documents of the form
//! `(items: [...], enemies: [...])`:
//! - Item definitions (category, rarity, price, combat bonuses, slot, resource source)
//! - Enemy definitions (stats and reward ranges)
//!
//! A built-in catalog ships with the crate; [`Catalog::install`] writes a
//! catalog into an `ironvale_db::Store`.

mod error;
mod loader;

pub use error::{Error, Result};
pub use loader::{Catalog, Loader};
