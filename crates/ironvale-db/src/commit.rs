//! WriteSet commit with optimistic version checks
//!
//! [`Store::commit`] applies a [`WriteSet`] inside one write transaction.
//! Writes are applied in order, so a later write sees the effect of an
//! earlier one (an ended battle frees the slot for a new one).
//!
//! Each version-checked write compares the version it was computed from
//! with the stored row. On mismatch the transaction is dropped without
//! committing and the caller gets [`Error::Conflict`]; nothing from the set
//! becomes visible. Write transactions are serialized by the database, so a
//! check that passes cannot be invalidated before the commit lands.

use crate::conflict::Conflict;
use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{next_id, sequence, Store};
use chrono::{DateTime, Utc};
use ironvale_core::{
    BattleId, EntryId, InventoryEntry, ListingId, PendingWrite, WriteSet, WriteSetResult,
};
use native_db::transaction::RwTransaction;
use tracing::debug;

/// Result of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitResult {
    /// Number of writes applied
    pub applied: usize,
    /// Ids allocated for inserted records
    pub created: WriteSetResult,
}

impl CommitResult {
    /// Id of the first listing created by this commit
    pub fn listing(&self) -> Option<ListingId> {
        self.created.listings.first().copied()
    }

    /// Id of the first battle opened by this commit
    pub fn battle(&self) -> Option<BattleId> {
        self.created.battles.first().copied()
    }
}

impl Store {
    /// Apply a WriteSet atomically
    ///
    /// Returns `Error::Conflict` if any versioned row changed since it was
    /// read; the store is left exactly as it was.
    pub fn commit(&self, write_set: &WriteSet) -> Result<CommitResult> {
        if write_set.is_empty() {
            return Ok(CommitResult::default());
        }

        let rw = self.db.rw_transaction()?;
        let now = Utc::now();
        let mut created = WriteSetResult::new();

        for write in write_set.iter() {
            if let Err(err) = apply(&rw, write, now, &mut created) {
                if let Error::Conflict(conflict) = &err {
                    debug!(%conflict, "commit aborted");
                }
                return Err(err);
            }
        }

        rw.commit()?;
        Ok(CommitResult {
            applied: write_set.len(),
            created,
        })
    }
}

fn ensure_version(write: &PendingWrite, found: Option<u64>) -> Result<()> {
    match Conflict::check(write, found) {
        Some(conflict) => Err(Error::Conflict(conflict)),
        None => Ok(()),
    }
}

fn apply(
    rw: &RwTransaction<'_>,
    write: &PendingWrite,
    now: DateTime<Utc>,
    created: &mut WriteSetResult,
) -> Result<()> {
    match write {
        PendingWrite::UpdateCharacter(character) => {
            let current: Option<StoredCharacter> = rw.get().primary(character.id.raw())?;
            ensure_version(write, current.map(|s| s.record.version))?;
            let mut next = character.clone();
            next.version += 1;
            rw.upsert(StoredCharacter::from(next))?;
        }

        PendingWrite::UpdateWallet(wallet) => {
            let current: Option<StoredWallet> = rw.get().primary(wallet.owner.raw())?;
            ensure_version(write, current.map(|s| s.record.version))?;
            let mut next = wallet.clone();
            next.version += 1;
            rw.upsert(StoredWallet::from(next))?;
        }

        PendingWrite::CreditWallet { owner, amount } => {
            let current: Option<StoredWallet> = rw.get().primary(owner.raw())?;
            let mut wallet = current
                .map(|s| s.record)
                .ok_or_else(|| Error::NotFound(format!("wallet of {}", owner)))?;
            wallet.credit(*amount)?;
            // Bump so a concurrent absolute balance write cannot overwrite it
            wallet.version += 1;
            rw.upsert(StoredWallet::from(wallet))?;
        }

        PendingWrite::UpdateSkill(skill) => {
            let current: Option<StoredSkill> =
                rw.get().primary(skill_key(skill.character, skill.resource))?;
            ensure_version(write, current.map(|s| s.record.version))?;
            let mut next = skill.clone();
            next.version += 1;
            rw.upsert(StoredSkill::from(next))?;
        }

        PendingWrite::UpdateEntry(entry) => {
            let current: Option<StoredInventoryEntry> = rw.get().primary(entry.id.raw())?;
            let found = current.as_ref().map(|s| s.record.version);
            ensure_version(write, found)?;
            match current {
                // Empty stacks are never kept
                Some(stored) if entry.quantity == 0 => {
                    rw.remove(stored)?;
                }
                _ => {
                    let mut next = entry.clone();
                    next.version += 1;
                    rw.upsert(StoredInventoryEntry::from(next))?;
                }
            }
        }

        PendingWrite::RemoveEntry { id, .. } => {
            let current: Option<StoredInventoryEntry> = rw.get().primary(id.raw())?;
            ensure_version(write, current.as_ref().map(|s| s.record.version))?;
            if let Some(stored) = current {
                rw.remove(stored)?;
            }
        }

        PendingWrite::GrantItem {
            owner,
            item_id,
            quantity,
        } => {
            if *quantity == 0 {
                return Ok(());
            }
            let current: Option<StoredInventoryEntry> = rw
                .get()
                .secondary(StoredInventoryEntryKey::stack, stack_key(*owner, *item_id))?;
            match current {
                Some(stored) => {
                    let mut entry = stored.record;
                    entry.quantity = entry
                        .quantity
                        .checked_add(*quantity)
                        .ok_or(ironvale_core::Error::Overflow("inventory quantity"))?;
                    entry.version += 1;
                    rw.upsert(StoredInventoryEntry::from(entry))?;
                }
                None => {
                    let id = EntryId::new(next_id(rw, sequence::ENTRY)?);
                    rw.insert(StoredInventoryEntry::from(InventoryEntry {
                        id,
                        owner: *owner,
                        item_id: *item_id,
                        quantity: *quantity,
                        equipped: false,
                        acquired_at: now,
                        version: 0,
                    }))?;
                    created.entries.push(id);
                }
            }
        }

        PendingWrite::InsertListing(listing) => {
            let id = ListingId::new(next_id(rw, sequence::LISTING)?);
            let mut next = listing.clone();
            next.id = id;
            next.version = 0;
            rw.insert(StoredListing::from(next))?;
            created.listings.push(id);
        }

        PendingWrite::UpdateListing(listing) => {
            let current: Option<StoredListing> = rw.get().primary(listing.id.raw())?;
            ensure_version(write, current.map(|s| s.record.version))?;
            let mut next = listing.clone();
            next.version += 1;
            rw.upsert(StoredListing::from(next))?;
        }

        PendingWrite::StartBattle(battle) => {
            let occupied: Option<StoredBattle> = rw
                .get()
                .secondary(StoredBattleKey::character, battle.character.raw())?;
            if let Some(stored) = occupied {
                return Err(Error::Conflict(Conflict::occupied(
                    write.target(),
                    stored.record.version,
                )));
            }
            let id = BattleId::new(next_id(rw, sequence::BATTLE)?);
            let mut next = battle.clone();
            next.id = id;
            next.version = 0;
            rw.insert(StoredBattle::from(next))?;
            created.battles.push(id);
        }

        PendingWrite::UpdateBattle(battle) => {
            let current: Option<StoredBattle> = rw.get().primary(battle.id.raw())?;
            ensure_version(write, current.map(|s| s.record.version))?;
            let mut next = battle.clone();
            next.version += 1;
            rw.upsert(StoredBattle::from(next))?;
        }

        PendingWrite::EndBattle { id, .. } => {
            let current: Option<StoredBattle> = rw.get().primary(id.raw())?;
            ensure_version(write, current.as_ref().map(|s| s.record.version))?;
            if let Some(stored) = current {
                rw.remove(stored)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictKind;
    use ironvale_core::{
        AccountId, Battle, Enemy, EnemyId, Gold, ItemId, ListingKind, MarketListing,
        RewardRange,
    };

    fn store_with_hero() -> (Store, AccountId) {
        let store = Store::in_memory().unwrap();
        let owner = AccountId::new(1);
        store.create_character(owner, "Hero").unwrap();
        (store, owner)
    }

    fn grant(owner: AccountId, item: u64, quantity: u32) -> WriteSet {
        let mut ws = WriteSet::new();
        ws.push(PendingWrite::GrantItem {
            owner,
            item_id: ItemId::new(item),
            quantity,
        });
        ws
    }

    #[test]
    fn test_update_bumps_version() {
        let (store, owner) = store_with_hero();
        let mut character = store.snapshot().unwrap().character_of(owner).unwrap().unwrap();
        character.energy -= 5;

        let mut ws = WriteSet::new();
        ws.push(PendingWrite::UpdateCharacter(character));
        let result = store.commit(&ws).unwrap();
        assert_eq!(result.applied, 1);

        let stored = store.snapshot().unwrap().character_of(owner).unwrap().unwrap();
        assert_eq!(stored.energy, 45);
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn test_stale_write_aborts_whole_set() {
        let (store, owner) = store_with_hero();
        let snap_character = store.snapshot().unwrap().character_of(owner).unwrap().unwrap();

        // Someone else commits first
        let mut first = snap_character.clone();
        first.energy = 10;
        let mut ws = WriteSet::new();
        ws.push(PendingWrite::UpdateCharacter(first));
        store.commit(&ws).unwrap();

        // Our set credits gold and then updates the stale character
        let mut ours = snap_character;
        ours.energy = 0;
        let mut ws = WriteSet::new();
        ws.push(PendingWrite::CreditWallet {
            owner,
            amount: Gold::from_whole(50),
        });
        ws.push(PendingWrite::UpdateCharacter(ours));

        let err = store.commit(&ws).unwrap_err();
        match err {
            Error::Conflict(conflict) => assert_eq!(
                conflict.kind,
                ConflictKind::Stale {
                    expected: 0,
                    found: 1
                }
            ),
            other => panic!("expected conflict, got {:?}", other),
        }

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.character_of(owner).unwrap().unwrap().energy, 10);
        assert!(snap.wallet(owner).unwrap().unwrap().balance.is_zero());
    }

    #[test]
    fn test_grant_creates_then_stacks() {
        let (store, owner) = store_with_hero();

        let result = store.commit(&grant(owner, 3, 2)).unwrap();
        assert_eq!(result.created.entries.len(), 1);
        let result = store.commit(&grant(owner, 3, 5)).unwrap();
        assert!(result.created.entries.is_empty());

        let stack = store
            .snapshot()
            .unwrap()
            .stack(owner, ItemId::new(3))
            .unwrap()
            .unwrap();
        assert_eq!(stack.quantity, 7);
        assert_eq!(stack.version, 1);
    }

    #[test]
    fn test_zero_quantity_update_removes_entry() {
        let (store, owner) = store_with_hero();
        store.commit(&grant(owner, 3, 2)).unwrap();

        let mut entry = store
            .snapshot()
            .unwrap()
            .stack(owner, ItemId::new(3))
            .unwrap()
            .unwrap();
        assert_eq!(entry.take(2), Ok(true));

        let mut ws = WriteSet::new();
        ws.push(PendingWrite::UpdateEntry(entry));
        store.commit(&ws).unwrap();

        let snap = store.snapshot().unwrap();
        assert!(snap.stack(owner, ItemId::new(3)).unwrap().is_none());
        assert!(snap.inventory(owner).unwrap().is_empty());
    }

    #[test]
    fn test_listing_ids_and_status_index() {
        let (store, owner) = store_with_hero();
        let listing = MarketListing::new(
            owner,
            ItemId::new(3),
            1,
            Gold::from_whole(10),
            ListingKind::Player,
            Utc::now(),
        )
        .unwrap();

        let mut ws = WriteSet::new();
        ws.push(PendingWrite::InsertListing(listing.clone()));
        ws.push(PendingWrite::InsertListing(listing));
        let result = store.commit(&ws).unwrap();
        assert_eq!(
            result.created.listings,
            vec![ListingId::new(1), ListingId::new(2)]
        );

        let snap = store.snapshot().unwrap();
        let active = snap
            .listings_with_status(ironvale_core::ListingStatus::Active)
            .unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, ListingId::new(2));
        assert_eq!(snap.listings_by_seller(owner).unwrap().len(), 2);
    }

    #[test]
    fn test_one_battle_per_character() {
        let (store, owner) = store_with_hero();
        let character = store.snapshot().unwrap().character_of(owner).unwrap().unwrap();
        let enemy = Enemy {
            id: EnemyId::new(1),
            name: "Slime".to_string(),
            icon: String::new(),
            max_hp: 20,
            atk: 3,
            def: 0,
            reward_exp: RewardRange::new(5, 5),
            reward_gold: RewardRange::new(1, 1),
        };
        let battle = Battle::open(character.id, owner, &enemy, Utc::now());

        let mut ws = WriteSet::new();
        ws.push(PendingWrite::StartBattle(battle.clone()));
        let opened = store.commit(&ws).unwrap().battle().unwrap();

        let mut ws = WriteSet::new();
        ws.push(PendingWrite::StartBattle(battle.clone()));
        assert!(store.commit(&ws).unwrap_err().is_conflict());

        // Ending and reopening in one set is fine
        let mut ws = WriteSet::new();
        ws.push(PendingWrite::EndBattle {
            id: opened,
            version: 0,
        });
        ws.push(PendingWrite::StartBattle(battle));
        let reopened = store.commit(&ws).unwrap().battle().unwrap();
        assert_ne!(opened, reopened);

        let open = store.snapshot().unwrap().battle_of(character.id).unwrap().unwrap();
        assert_eq!(open.id, reopened);
        assert_eq!(open.enemy_hp, 20);
    }
}
