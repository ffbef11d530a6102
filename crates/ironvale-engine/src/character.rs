//! Character operations: provisioning, stats, equipment, rest, adventure

use crate::combat::loadout;
use crate::engine::{Engine, Require};
use crate::error::{Error, Result};
use crate::views::{
    AdventureOutcome, CharacterSheet, Encounter, EquipmentChange, InventoryView, RestOutcome,
    StatAllocation,
};
use ironvale_core::{
    CharacterId, EffectiveStats, EncounterKind, EntryId, Error as RuleError, Gold, Item,
    PendingWrite, Principal, ResourceType, StatType, WriteSet,
};
use rand::Rng;
use tracing::info;

impl Engine {
    /// Provision the caller's character, wallet, and gathering skills
    pub fn create_character(&self, principal: &Principal, name: &str) -> Result<CharacterSheet> {
        let character = self
            .store()
            .create_character(principal.account, name.trim())?;
        let wallet = self.snapshot()?.require_wallet(principal.account)?;
        Ok(CharacterSheet::new(&character, wallet.balance))
    }

    pub fn character_sheet(&self, principal: &Principal) -> Result<CharacterSheet> {
        let snap = self.snapshot()?;
        let character = snap.require_character(principal.account)?;
        let wallet = snap.require_wallet(principal.account)?;
        Ok(CharacterSheet::new(&character, wallet.balance))
    }

    /// Spend one upgrade point on `stat` ("maxhp", "atk", or "def")
    pub fn allocate_stat_point(&self, principal: &Principal, stat: &str) -> Result<StatAllocation> {
        let (allocation, _) = self.transact("allocate_stat_point", principal, |snap| {
            let stat: StatType = stat.parse()?;
            let mut character = snap.require_character(principal.account)?;
            let wallet = snap.require_wallet(principal.account)?;
            character.allocate_point(stat)?;

            let sheet = CharacterSheet::new(&character, wallet.balance);
            let mut ws = WriteSet::new();
            ws.push(PendingWrite::UpdateCharacter(character));
            Ok((ws, StatAllocation { stat, sheet }))
        })?;

        info!(account = %principal.account, stat = %allocation.stat, "stat point allocated");
        Ok(allocation)
    }

    /// Base stats plus the bonuses of everything the character has equipped
    pub fn effective_stats(&self, character: CharacterId) -> Result<EffectiveStats> {
        let snap = self.snapshot()?;
        let character = snap.require_character_by_id(character)?;
        loadout(&snap, &character)
    }

    /// The caller's stacks with their catalog details, oldest entry first
    pub fn inventory(&self, principal: &Principal) -> Result<Vec<InventoryView>> {
        let snap = self.snapshot()?;
        snap.require_character(principal.account)?;
        let mut entries = snap.inventory(principal.account)?;
        entries.sort_by_key(|entry| entry.id);

        let mut stacks = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = snap.require_item(entry.item_id)?;
            stacks.push(InventoryView::new(&entry, &item));
        }
        Ok(stacks)
    }

    /// Equip an inventory entry, displacing whatever occupies its slot
    ///
    /// Equipping an entry that is already equipped changes nothing.
    pub fn equip(&self, principal: &Principal, entry_id: EntryId) -> Result<EquipmentChange> {
        let (change, _) = self.transact("equip", principal, |snap| {
            let character = snap.require_character(principal.account)?;
            let mut entry = snap.require_entry(entry_id)?;
            entry.ensure_owner(principal.account)?;
            let item = snap.require_item(entry.item_id)?;
            let slot = item
                .slot
                .ok_or_else(|| RuleError::NotEquippable(item.name.clone()))?;

            let mut ws = WriteSet::new();
            let mut displaced = None;
            let mut worn = Vec::new();
            for (mut other, other_item) in snap.equipped(principal.account)? {
                if other.id == entry.id {
                    continue;
                }
                if !entry.equipped && other_item.slot == Some(slot) {
                    other.equipped = false;
                    displaced = Some(other.id);
                    ws.push(PendingWrite::UpdateEntry(other));
                } else {
                    worn.push(other_item);
                }
            }
            if !entry.equipped {
                entry.equipped = true;
                ws.push(PendingWrite::UpdateEntry(entry.clone()));
            }
            worn.push(item);

            let change = EquipmentChange {
                entry: entry.id,
                equipped: true,
                displaced,
                stats: EffectiveStats::compute(&character, &worn),
            };
            if !ws.is_empty() {
                // Slot occupancy spans several entries; the character row
                // serializes equipment changes per owner
                ws.push(PendingWrite::UpdateCharacter(character));
            }
            Ok((ws, change))
        })?;

        info!(account = %principal.account, entry = %change.entry, "equipped");
        Ok(change)
    }

    pub fn unequip(&self, principal: &Principal, entry_id: EntryId) -> Result<EquipmentChange> {
        let (change, _) = self.transact("unequip", principal, |snap| {
            let character = snap.require_character(principal.account)?;
            let mut entry = snap.require_entry(entry_id)?;
            entry.ensure_owner(principal.account)?;
            if !entry.equipped {
                let item = snap.require_item(entry.item_id)?;
                return Err(RuleError::NotEquipped(item.name).into());
            }

            let worn: Vec<Item> = snap
                .equipped(principal.account)?
                .into_iter()
                .filter(|(other, _)| other.id != entry.id)
                .map(|(_, item)| item)
                .collect();

            entry.equipped = false;
            let change = EquipmentChange {
                entry: entry.id,
                equipped: false,
                displaced: None,
                stats: EffectiveStats::compute(&character, &worn),
            };
            let mut ws = WriteSet::new();
            ws.push(PendingWrite::UpdateEntry(entry));
            ws.push(PendingWrite::UpdateCharacter(character));
            Ok((ws, change))
        })?;

        info!(account = %principal.account, entry = %change.entry, "unequipped");
        Ok(change)
    }

    /// Recover a fixed amount of energy and health, capped at the maximums
    pub fn rest(&self, principal: &Principal) -> Result<RestOutcome> {
        let (outcome, _) = self.transact("rest", principal, |snap| {
            let mut character = snap.require_character(principal.account)?;
            let mut ws = WriteSet::new();

            let (healed, recovered) = if character.is_rested() {
                (0, 0)
            } else {
                let healed = character.heal(self.config().rest_health);
                let recovered = character.recover_energy(self.config().rest_energy);
                (healed, recovered)
            };
            let outcome = RestOutcome {
                healed,
                recovered,
                health: character.health,
                energy: character.energy,
            };
            if healed > 0 || recovered > 0 {
                ws.push(PendingWrite::UpdateCharacter(character));
            }
            Ok((ws, outcome))
        })?;

        info!(
            account = %principal.account,
            healed = outcome.healed,
            recovered = outcome.recovered,
            "rested"
        );
        Ok(outcome)
    }

    /// Spend energy exploring and roll a weighted random encounter
    pub fn adventure(&self, principal: &Principal) -> Result<AdventureOutcome> {
        let config = self.config();
        let (outcome, _) = self.transact("adventure", principal, |snap| {
            let mut character = snap.require_character(principal.account)?;
            character.spend_energy(config.adventure_energy_cost)?;

            let kind = self
                .roll(|rng| config.encounter_weights.roll(rng))
                .ok_or_else(|| Error::Config("encounter weights are all zero".into()))?;

            let mut ws = WriteSet::new();
            let encounter = match kind {
                EncounterKind::Enemy => {
                    let enemies = snap.enemies()?;
                    if enemies.is_empty() {
                        return Err(RuleError::not_found("enemy", "any").into());
                    }
                    let enemy = &enemies[self.roll(|rng| rng.gen_range(0..enemies.len()))];
                    Encounter::Enemy {
                        enemy: enemy.id,
                        name: enemy.name.clone(),
                    }
                }
                EncounterKind::Resource => {
                    let index = self.roll(|rng| rng.gen_range(0..ResourceType::ALL.len()));
                    Encounter::Resource {
                        resource: ResourceType::ALL[index],
                    }
                }
                EncounterKind::Gold => {
                    let amount = Gold::from_whole(self.roll(|rng| config.adventure_gold.roll(rng)));
                    ws.push(PendingWrite::CreditWallet {
                        owner: principal.account,
                        amount,
                    });
                    Encounter::Gold { amount }
                }
                EncounterKind::Exp => {
                    let gained = self.roll(|rng| config.adventure_exp.roll(rng));
                    let level_up = character.gain_exp(gained);
                    Encounter::Exp { gained, level_up }
                }
            };

            let outcome = AdventureOutcome {
                encounter,
                energy: character.energy,
            };
            ws.push(PendingWrite::UpdateCharacter(character));
            Ok((ws, outcome))
        })?;

        info!(account = %principal.account, encounter = ?outcome.encounter, "adventured");
        Ok(outcome)
    }
}
