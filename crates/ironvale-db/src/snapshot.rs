//! Snapshot - consistent read view of the store
//!
//! A snapshot wraps one read transaction, so everything read through it
//! reflects the same committed state even while writers keep committing.
//! Engine operations compute their `WriteSet` from a snapshot; the commit
//! later re-checks the versions of everything it overwrites.

use crate::error::Result;
use crate::models::*;
use ironvale_core::{
    AccountId, Battle, Character, CharacterId, Enemy, EnemyId, EntryId, GatheringSkill,
    InventoryEntry, Item, ItemId, ListingId, ListingStatus, MarketListing, ResourceType, Wallet,
};
use native_db::transaction::RTransaction;

/// Read-only view of the store at a point in time
pub struct Snapshot<'db> {
    txn: RTransaction<'db>,
}

impl<'db> Snapshot<'db> {
    pub(crate) fn new(txn: RTransaction<'db>) -> Self {
        Self { txn }
    }

    // ========================================================================
    // Characters and wallets
    // ========================================================================

    pub fn character(&self, id: CharacterId) -> Result<Option<Character>> {
        let stored: Option<StoredCharacter> = self.txn.get().primary(id.raw())?;
        Ok(stored.map(|s| s.record))
    }

    /// The character owned by `owner`, if one was provisioned
    pub fn character_of(&self, owner: AccountId) -> Result<Option<Character>> {
        let stored: Option<StoredCharacter> = self
            .txn
            .get()
            .secondary(StoredCharacterKey::owner, owner.raw())?;
        Ok(stored.map(|s| s.record))
    }

    pub fn wallet(&self, owner: AccountId) -> Result<Option<Wallet>> {
        let stored: Option<StoredWallet> = self.txn.get().primary(owner.raw())?;
        Ok(stored.map(|s| s.record))
    }

    // ========================================================================
    // Gathering skills
    // ========================================================================

    pub fn skill(
        &self,
        character: CharacterId,
        resource: ResourceType,
    ) -> Result<Option<GatheringSkill>> {
        let stored: Option<StoredSkill> =
            self.txn.get().primary(skill_key(character, resource))?;
        Ok(stored.map(|s| s.record))
    }

    /// All skills of a character, in resource order
    pub fn skills(&self, character: CharacterId) -> Result<Vec<GatheringSkill>> {
        let scan = self
            .txn
            .scan()
            .secondary::<StoredSkill>(StoredSkillKey::character)?;
        let iter = scan.start_with(character.raw())?;
        let stored: std::result::Result<Vec<StoredSkill>, _> = iter.collect();
        let mut skills: Vec<GatheringSkill> = stored?.into_iter().map(|s| s.record).collect();
        skills.sort_by_key(|s| s.resource);
        Ok(skills)
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub fn entry(&self, id: EntryId) -> Result<Option<InventoryEntry>> {
        let stored: Option<StoredInventoryEntry> = self.txn.get().primary(id.raw())?;
        Ok(stored.map(|s| s.record))
    }

    /// The owner's stack of `item`, if any
    pub fn stack(&self, owner: AccountId, item: ItemId) -> Result<Option<InventoryEntry>> {
        let stored: Option<StoredInventoryEntry> = self
            .txn
            .get()
            .secondary(StoredInventoryEntryKey::stack, stack_key(owner, item))?;
        Ok(stored.map(|s| s.record))
    }

    /// Every stack the owner holds
    pub fn inventory(&self, owner: AccountId) -> Result<Vec<InventoryEntry>> {
        let scan = self
            .txn
            .scan()
            .secondary::<StoredInventoryEntry>(StoredInventoryEntryKey::owner)?;
        let iter = scan.start_with(owner.raw())?;
        let stored: std::result::Result<Vec<StoredInventoryEntry>, _> = iter.collect();
        Ok(stored?.into_iter().map(|s| s.record).collect())
    }

    /// Equipped stacks of the owner joined with their catalog items
    pub fn equipped(&self, owner: AccountId) -> Result<Vec<(InventoryEntry, Item)>> {
        let mut equipped = Vec::new();
        for entry in self.inventory(owner)?.into_iter().filter(|e| e.equipped) {
            if let Some(item) = self.item(entry.item_id)? {
                equipped.push((entry, item));
            }
        }
        Ok(equipped)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub fn item(&self, id: ItemId) -> Result<Option<Item>> {
        let stored: Option<StoredItem> = self.txn.get().primary(id.raw())?;
        Ok(stored.map(|s| s.record))
    }

    pub fn items(&self) -> Result<Vec<Item>> {
        let scan = self.txn.scan().primary::<StoredItem>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredItem>, _> = iter.collect();
        Ok(stored?.into_iter().map(|s| s.record).collect())
    }

    /// The catalog item a resource node yields
    pub fn item_for_resource(&self, resource: ResourceType) -> Result<Option<Item>> {
        Ok(self
            .items()?
            .into_iter()
            .find(|item| item.gathered_from == Some(resource)))
    }

    pub fn enemy(&self, id: EnemyId) -> Result<Option<Enemy>> {
        let stored: Option<StoredEnemy> = self.txn.get().primary(id.raw())?;
        Ok(stored.map(|s| s.record))
    }

    pub fn enemies(&self) -> Result<Vec<Enemy>> {
        let scan = self.txn.scan().primary::<StoredEnemy>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredEnemy>, _> = iter.collect();
        Ok(stored?.into_iter().map(|s| s.record).collect())
    }

    // ========================================================================
    // Marketplace
    // ========================================================================

    pub fn listing(&self, id: ListingId) -> Result<Option<MarketListing>> {
        let stored: Option<StoredListing> = self.txn.get().primary(id.raw())?;
        Ok(stored.map(|s| s.record))
    }

    /// Listings in the given status, newest first
    pub fn listings_with_status(&self, status: ListingStatus) -> Result<Vec<MarketListing>> {
        let scan = self
            .txn
            .scan()
            .secondary::<StoredListing>(StoredListingKey::status)?;
        let iter = scan.start_with(StoredListing::status_key(status))?;
        let stored: std::result::Result<Vec<StoredListing>, _> = iter.collect();
        let mut listings: Vec<MarketListing> = stored?
            .into_iter()
            .map(|s| s.record)
            .filter(|l| l.status == status)
            .collect();
        sort_newest_first(&mut listings);
        Ok(listings)
    }

    /// Every listing posted by `seller`, newest first
    pub fn listings_by_seller(&self, seller: AccountId) -> Result<Vec<MarketListing>> {
        let scan = self
            .txn
            .scan()
            .secondary::<StoredListing>(StoredListingKey::seller)?;
        let iter = scan.start_with(seller.raw())?;
        let stored: std::result::Result<Vec<StoredListing>, _> = iter.collect();
        let mut listings: Vec<MarketListing> = stored?.into_iter().map(|s| s.record).collect();
        sort_newest_first(&mut listings);
        Ok(listings)
    }

    // ========================================================================
    // Battles
    // ========================================================================

    /// The character's open battle session, if any
    pub fn battle_of(&self, character: CharacterId) -> Result<Option<Battle>> {
        let stored: Option<StoredBattle> = self
            .txn
            .get()
            .secondary(StoredBattleKey::character, character.raw())?;
        Ok(stored.map(|s| s.record))
    }
}

/// Ids grow monotonically, so they break ties between equal timestamps
fn sort_newest_first(listings: &mut [MarketListing]) {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
