//! Item catalog definitions
//!
//! Items are reference data: they are seeded by the catalog loader and are
//! never modified by a game action.

use crate::{Gold, ItemId, ResourceType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of thing an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Accessory,
    Potion,
    Resource,
    Misc,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Accessory => "accessory",
            ItemCategory::Potion => "potion",
            ItemCategory::Resource => "resource",
            ItemCategory::Misc => "misc",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Equipment slot; at most one equipped item per slot per account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

/// A catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub rarity: Rarity,
    /// Reference price in hundredths
    #[serde(default)]
    pub base_price: Gold,
    #[serde(default = "default_tradeable")]
    pub tradeable: bool,
    #[serde(default)]
    pub atk_bonus: u32,
    #[serde(default)]
    pub def_bonus: u32,
    /// HP restored when consumed (potions)
    #[serde(default)]
    pub heal: u32,
    /// Slot this item occupies when equipped; `None` if not equippable
    #[serde(default)]
    pub slot: Option<EquipSlot>,
    /// Resource node that yields this item when gathered
    #[serde(default)]
    pub gathered_from: Option<ResourceType>,
}

fn default_tradeable() -> bool {
    true
}

impl Item {
    pub fn is_potion(&self) -> bool {
        self.category == ItemCategory::Potion
    }

    pub fn is_equippable(&self) -> bool {
        self.slot.is_some()
    }

    /// Case-insensitive match on name or category
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.category.as_str().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> Item {
        Item {
            id: ItemId::new(10),
            name: "Iron Sword".to_string(),
            description: String::new(),
            category: ItemCategory::Weapon,
            rarity: Rarity::Common,
            base_price: Gold::from_whole(50),
            tradeable: true,
            atk_bonus: 5,
            def_bonus: 0,
            heal: 0,
            slot: Some(EquipSlot::Weapon),
            gathered_from: None,
        }
    }

    #[test]
    fn test_search_matches_name_and_category() {
        let item = sword();
        assert!(item.matches_search("iron"));
        assert!(item.matches_search("WEAP"));
        assert!(item.matches_search("  "));
        assert!(!item.matches_search("potion"));
    }

    #[test]
    fn test_ron_defaults() {
        let item: Item = ron::from_str(
            r#"(id: 1, name: "Healing Draught", category: Potion, heal: 30, base_price: 1500)"#,
        )
        .expect("parse");
        assert!(item.is_potion());
        assert!(item.tradeable);
        assert!(!item.is_equippable());
        assert_eq!(item.base_price, Gold::from_whole(15));
    }
}
