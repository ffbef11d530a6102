//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use crate::snapshot::Snapshot;
use ironvale_core::{
    AccountId, Character, CharacterId, Enemy, GatheringSkill, Item, ResourceType, Wallet,
};
use native_db::transaction::RwTransaction;
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

/// Sequence names used for id allocation.
pub(crate) mod sequence {
    pub const CHARACTER: &str = "character";
    pub const ENTRY: &str = "entry";
    pub const LISTING: &str = "listing";
    pub const BATTLE: &str = "battle";
}

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredCharacter>().unwrap();
    models.define::<StoredWallet>().unwrap();
    models.define::<StoredSkill>().unwrap();
    models.define::<StoredInventoryEntry>().unwrap();
    models.define::<StoredListing>().unwrap();
    models.define::<StoredBattle>().unwrap();
    models.define::<StoredSequence>().unwrap();
    models.define::<StoredItem>().unwrap();
    models.define::<StoredEnemy>().unwrap();
    models
});

/// Durable entity store.
///
/// Reads go through a [`Snapshot`]; every mutation of player state goes
/// through [`Store::commit`](crate::commit) so that it is version-checked
/// and atomic.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Open a consistent read view.
    pub fn snapshot(&self) -> Result<Snapshot<'_>> {
        Ok(Snapshot::new(self.db.r_transaction()?))
    }

    /// Provision a character with its wallet and all four gathering skills.
    ///
    /// Fails with `DuplicateKey` if the account already has a character.
    pub fn create_character(&self, owner: AccountId, name: &str) -> Result<Character> {
        let rw = self.db.rw_transaction()?;

        let existing: Option<StoredCharacter> = rw
            .get()
            .secondary(StoredCharacterKey::owner, owner.raw())?;
        if existing.is_some() {
            return Err(Error::DuplicateKey(format!("character for {}", owner)));
        }

        let id = CharacterId::new(next_id(&rw, sequence::CHARACTER)?);
        let character = Character::new(id, owner, name);
        rw.insert(StoredCharacter::from(character.clone()))?;

        if rw.get().primary::<StoredWallet>(owner.raw())?.is_none() {
            rw.insert(StoredWallet::from(Wallet::new(owner)))?;
        }
        for resource in ResourceType::ALL {
            rw.insert(StoredSkill::from(GatheringSkill::new(id, resource)))?;
        }

        rw.commit()?;
        info!(%owner, character = %id, name, "character provisioned");
        Ok(character)
    }

    /// Insert or replace catalog items and enemies in one transaction.
    pub fn install_catalog<'a>(
        &self,
        items: impl IntoIterator<Item = &'a Item>,
        enemies: impl IntoIterator<Item = &'a Enemy>,
    ) -> Result<(usize, usize)> {
        let rw = self.db.rw_transaction()?;

        let mut item_count = 0;
        for item in items {
            rw.upsert(StoredItem::from(item.clone()))?;
            item_count += 1;
        }
        let mut enemy_count = 0;
        for enemy in enemies {
            rw.upsert(StoredEnemy::from(enemy.clone()))?;
            enemy_count += 1;
        }

        rw.commit()?;
        info!(items = item_count, enemies = enemy_count, "catalog installed");
        Ok((item_count, enemy_count))
    }
}

/// Hand out the next id of a named sequence, starting at 1.
pub(crate) fn next_id(rw: &RwTransaction<'_>, name: &str) -> Result<u64> {
    let current: Option<StoredSequence> = rw.get().primary(name.to_string())?;
    let id = current.map(|s| s.next).unwrap_or(1);
    rw.upsert(StoredSequence {
        name: name.to_string(),
        next: id + 1,
    })?;
    Ok(id)
}
