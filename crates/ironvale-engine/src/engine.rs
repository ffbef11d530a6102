//! Engine - optimistic transaction runner
//!
//! Every mutating operation is written as a closure that reads a
//! [`Snapshot`], validates, and returns the `WriteSet` it wants applied plus
//! its success payload. [`Engine::transact`] runs the closure, commits the
//! set, and on a version conflict re-runs the closure against a fresh
//! snapshot, up to `max_attempts` times. Validation therefore always
//! happens against the state the commit is checked against.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use ironvale_core::{
    AccountId, Character, CharacterId, Enemy, EnemyId, EntryId, InventoryEntry, Item, ItemId,
    ListingId, MarketListing, Principal, Wallet, WriteSet,
};
use ironvale_db::{CommitResult, Snapshot, Store};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// The game-state transaction engine
///
/// `Engine` is `Sync`; share it across request workers by reference or
/// `Arc`.
pub struct Engine {
    store: Store,
    config: EngineConfig,
    rng: Mutex<StdRng>,
}

impl Engine {
    /// Create an engine over an opened store
    pub fn new(store: Store, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            store,
            config,
            rng: Mutex::new(rng),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Draw from the process-wide RNG
    pub(crate) fn roll<R>(&self, draw: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.rng.lock();
        draw(&mut rng)
    }

    /// Open a read-only view for query operations
    pub(crate) fn snapshot(&self) -> Result<Snapshot<'_>> {
        Ok(self.store.snapshot()?)
    }

    /// Run `body` as one atomic, retried transaction
    ///
    /// Business-rule errors from `body` end the operation immediately; only
    /// version conflicts at commit are retried.
    pub(crate) fn transact<T, F>(
        &self,
        op: &'static str,
        principal: &Principal,
        mut body: F,
    ) -> Result<(T, CommitResult)>
    where
        F: FnMut(&Snapshot<'_>) -> Result<(WriteSet, T)>,
    {
        let attempts = self.config.max_attempts;
        for attempt in 1..=attempts {
            let planned = {
                let snapshot = self.store.snapshot()?;
                body(&snapshot)
            };
            let (writes, output) = match planned {
                Ok(planned) => planned,
                Err(Error::Rule(rule)) => {
                    warn!(op, account = %principal.account, reason = rule.reason(), "{}", rule);
                    return Err(Error::Rule(rule));
                }
                Err(err) => return Err(err),
            };

            match self.store.commit(&writes) {
                Ok(result) => return Ok((output, result)),
                Err(err) if err.is_conflict() => {
                    debug!(op, account = %principal.account, attempt, %err, "retrying after conflict");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(op, account = %principal.account, attempts, "giving up after repeated conflicts");
        Err(Error::Transient { attempts })
    }
}

// ============================================================================
// Required reads
// ============================================================================

/// Reads that turn a missing record into `NotFound`
pub(crate) trait Require {
    fn require_character(&self, owner: AccountId) -> Result<Character>;
    fn require_character_by_id(&self, id: CharacterId) -> Result<Character>;
    fn require_wallet(&self, owner: AccountId) -> Result<Wallet>;
    fn require_item(&self, id: ItemId) -> Result<Item>;
    fn require_enemy(&self, id: EnemyId) -> Result<Enemy>;
    fn require_entry(&self, id: EntryId) -> Result<InventoryEntry>;
    fn require_listing(&self, id: ListingId) -> Result<MarketListing>;
}

fn missing(kind: &'static str, id: impl std::fmt::Display) -> Error {
    Error::Rule(ironvale_core::Error::not_found(kind, id))
}

impl Require for Snapshot<'_> {
    fn require_character(&self, owner: AccountId) -> Result<Character> {
        self.character_of(owner)?
            .ok_or_else(|| missing("character", owner))
    }

    fn require_character_by_id(&self, id: CharacterId) -> Result<Character> {
        self.character(id)?.ok_or_else(|| missing("character", id))
    }

    fn require_wallet(&self, owner: AccountId) -> Result<Wallet> {
        self.wallet(owner)?
            .ok_or_else(|| missing("wallet", owner))
    }

    fn require_item(&self, id: ItemId) -> Result<Item> {
        self.item(id)?.ok_or_else(|| missing("item", id))
    }

    fn require_enemy(&self, id: EnemyId) -> Result<Enemy> {
        self.enemy(id)?.ok_or_else(|| missing("enemy", id))
    }

    fn require_entry(&self, id: EntryId) -> Result<InventoryEntry> {
        self.entry(id)?.ok_or_else(|| missing("inventory entry", id))
    }

    fn require_listing(&self, id: ListingId) -> Result<MarketListing> {
        self.listing(id)?.ok_or_else(|| missing("listing", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hero, TestWorld};
    use ironvale_core::{ErrorCode, PendingWrite};
    use std::cell::Cell;

    #[test]
    fn test_rule_errors_are_not_retried() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let runs = Cell::new(0);

        let result: Result<((), CommitResult)> = world.engine.transact("noop", &principal, |_| {
            runs.set(runs.get() + 1);
            Err(ironvale_core::Error::InsufficientPoints.into())
        });
        assert_eq!(result.unwrap_err().code(), ErrorCode::InsufficientResource);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_conflicts_retry_then_go_transient() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let runs = Cell::new(0);

        // Write a stale character every time so the commit always conflicts
        let stale = world
            .engine
            .snapshot()
            .unwrap()
            .require_character(principal.account)
            .unwrap();
        let mut bump = WriteSet::new();
        bump.push(PendingWrite::UpdateCharacter(stale.clone()));
        world.engine.store().commit(&bump).unwrap();

        let result: Result<((), CommitResult)> = world.engine.transact("noop", &principal, |_| {
            runs.set(runs.get() + 1);
            let mut ws = WriteSet::new();
            ws.push(PendingWrite::UpdateCharacter(stale.clone()));
            Ok((ws, ()))
        });

        assert!(matches!(result, Err(Error::Transient { attempts: 3 })));
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_fresh_read_succeeds_after_conflict() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let runs = Cell::new(0);

        let ((), _) = world
            .engine
            .transact("noop", &principal, |snap| {
                runs.set(runs.get() + 1);
                let mut character = snap.require_character(principal.account)?;
                if runs.get() == 1 {
                    // A competing write lands between our read and commit
                    let mut other = WriteSet::new();
                    other.push(PendingWrite::UpdateCharacter(character.clone()));
                    world.engine.store().commit(&other)?;
                }
                character.energy -= 1;
                let mut ws = WriteSet::new();
                ws.push(PendingWrite::UpdateCharacter(character));
                Ok((ws, ()))
            })
            .unwrap();

        assert_eq!(runs.get(), 2);
        let character = world
            .engine
            .snapshot()
            .unwrap()
            .require_character(principal.account)
            .unwrap();
        assert_eq!(character.energy, 49);
        assert_eq!(character.version, 2);
    }
}
