//! Effective-stats calculator
//!
//! A character's combat-ready numbers are its base stats plus the bonuses of
//! every item it currently has equipped. Nothing here touches storage.

use crate::character::Character;
use crate::item::Item;
use serde::{Deserialize, Serialize};

/// Base stats with equipment bonuses folded in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub atk: u32,
    pub def: u32,
    pub max_health: u32,
    pub atk_bonus: u32,
    pub def_bonus: u32,
}

impl EffectiveStats {
    /// Sum base stats with the bonuses of `equipped`
    pub fn compute<'a>(character: &Character, equipped: impl IntoIterator<Item = &'a Item>) -> Self {
        let (atk_bonus, def_bonus) = equipped.into_iter().fold((0u32, 0u32), |(atk, def), item| {
            (
                atk.saturating_add(item.atk_bonus),
                def.saturating_add(item.def_bonus),
            )
        });

        Self {
            atk: character.atk.saturating_add(atk_bonus),
            def: character.def.saturating_add(def_bonus),
            max_health: character.max_health,
            atk_bonus,
            def_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{EquipSlot, ItemCategory, Rarity};
    use crate::{AccountId, CharacterId, Gold, ItemId};

    fn gear(id: u64, atk: u32, def: u32, slot: EquipSlot) -> Item {
        Item {
            id: ItemId::new(id),
            name: format!("gear {}", id),
            description: String::new(),
            category: ItemCategory::Weapon,
            rarity: Rarity::Common,
            base_price: Gold::ZERO,
            tradeable: true,
            atk_bonus: atk,
            def_bonus: def,
            heal: 0,
            slot: Some(slot),
            gathered_from: None,
        }
    }

    #[test]
    fn test_no_equipment_is_base() {
        let c = Character::new(CharacterId::new(1), AccountId::new(1), "Hero");
        let stats = EffectiveStats::compute(&c, std::iter::empty());
        assert_eq!(stats.atk, 10);
        assert_eq!(stats.def, 5);
        assert_eq!(stats.max_health, 100);
    }

    #[test]
    fn test_bonuses_sum() {
        let c = Character::new(CharacterId::new(1), AccountId::new(1), "Hero");
        let items = [
            gear(1, 7, 0, EquipSlot::Weapon),
            gear(2, 0, 4, EquipSlot::Armor),
            gear(3, 1, 1, EquipSlot::Accessory),
        ];
        let stats = EffectiveStats::compute(&c, &items);
        assert_eq!(stats.atk, 18);
        assert_eq!(stats.def, 10);
        assert_eq!(stats.atk_bonus, 8);
        assert_eq!(stats.def_bonus, 5);
    }
}
