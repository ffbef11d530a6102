//! Catalog models: reference data written by the loader, read by the engine.

use ironvale_core::{Enemy, Item};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 10, version = 1)]
#[native_db]
pub struct StoredItem {
    #[primary_key]
    pub id: u64,
    pub record: Item,
}

impl From<Item> for StoredItem {
    fn from(record: Item) -> Self {
        Self {
            id: record.id.raw(),
            record,
        }
    }
}

/// Stored catalog enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 11, version = 1)]
#[native_db]
pub struct StoredEnemy {
    #[primary_key]
    pub id: u64,
    pub record: Enemy,
}

impl From<Enemy> for StoredEnemy {
    fn from(record: Enemy) -> Self {
        Self {
            id: record.id.raw(),
            record,
        }
    }
}
