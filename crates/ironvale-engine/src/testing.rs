//! Shared fixtures for engine tests

use crate::{Engine, EngineConfig};
use ironvale_core::{
    AccountId, Character, Gold, InventoryEntry, ItemId, PendingWrite, Principal, WriteSet,
};
use ironvale_db::Store;
use ironvale_script::Catalog;

pub(crate) mod ids {
    use ironvale_core::{EnemyId, ItemId};

    pub const STONE: ItemId = ItemId(1);
    pub const WOODEN_SWORD: ItemId = ItemId(10);
    pub const IRON_SWORD: ItemId = ItemId(11);
    pub const LEATHER_ARMOR: ItemId = ItemId(20);
    pub const MINOR_POTION: ItemId = ItemId(40);
    pub const GUILD_TOKEN: ItemId = ItemId(50);

    pub const SLIME: EnemyId = EnemyId(1);
    pub const WOLF: EnemyId = EnemyId(2);
    pub const GOLEM: EnemyId = EnemyId(4);
}

/// An in-memory store with the built-in catalog and a seeded engine
pub(crate) struct TestWorld {
    pub engine: Engine,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_config(EngineConfig {
            seed: Some(7),
            ..EngineConfig::default()
        })
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let store = Store::in_memory().unwrap();
        Catalog::builtin().unwrap().install(&store).unwrap();
        Self {
            engine: Engine::new(store, config).unwrap(),
        }
    }

    pub fn player(&self, account: u64, name: &str) -> Principal {
        let principal = Principal::player(account);
        self.engine.create_character(&principal, name).unwrap();
        principal
    }

    pub fn admin(&self, account: u64, name: &str) -> Principal {
        let principal = Principal::admin(account);
        self.engine.create_character(&principal, name).unwrap();
        principal
    }

    fn commit(&self, write: PendingWrite) {
        let mut ws = WriteSet::new();
        ws.push(write);
        self.engine.store().commit(&ws).unwrap();
    }

    pub fn give(&self, principal: &Principal, item: ItemId, quantity: u32) -> InventoryEntry {
        self.commit(PendingWrite::GrantItem {
            owner: principal.account,
            item_id: item,
            quantity,
        });
        self.stack(principal, item).unwrap()
    }

    pub fn fund(&self, principal: &Principal, whole: u64) {
        self.commit(PendingWrite::CreditWallet {
            owner: principal.account,
            amount: Gold::from_whole(whole),
        });
    }

    pub fn character(&self, principal: &Principal) -> Character {
        self.engine
            .store()
            .snapshot()
            .unwrap()
            .character_of(principal.account)
            .unwrap()
            .unwrap()
    }

    /// Overwrite character fields directly
    pub fn edit_character(&self, principal: &Principal, edit: impl FnOnce(&mut Character)) {
        let mut character = self.character(principal);
        edit(&mut character);
        self.commit(PendingWrite::UpdateCharacter(character));
    }

    pub fn balance(&self, account: AccountId) -> Gold {
        self.engine
            .store()
            .snapshot()
            .unwrap()
            .wallet(account)
            .unwrap()
            .unwrap()
            .balance
    }

    pub fn stack(&self, principal: &Principal, item: ItemId) -> Option<InventoryEntry> {
        self.engine
            .store()
            .snapshot()
            .unwrap()
            .stack(principal.account, item)
            .unwrap()
    }
}

pub(crate) fn hero(world: &TestWorld) -> Principal {
    world.player(1, "Hero")
}
