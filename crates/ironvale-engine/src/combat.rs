//! Battle operations over server-owned sessions
//!
//! The open session holds the enemy's HP. Clients name the enemy they are
//! fighting; they never report its HP.

use crate::engine::{Engine, Require};
use crate::error::Result;
use crate::views::{BattleView, EnemyView, PotionView, TurnOutcome};
use chrono::Utc;
use ironvale_core::combat::{self, BattleStatus};
use ironvale_core::{
    AccountId, Battle, Character, EffectiveStats, EnemyId, EntryId, Error as RuleError, Item,
    ItemCategory, PendingWrite, Principal, WriteSet,
};
use ironvale_db::Snapshot;
use tracing::info;

/// Effective stats from the character and everything its owner has equipped
pub(crate) fn loadout(snap: &Snapshot<'_>, character: &Character) -> Result<EffectiveStats> {
    let items: Vec<Item> = snap
        .equipped(character.owner)?
        .into_iter()
        .map(|(_, item)| item)
        .collect();
    Ok(EffectiveStats::compute(character, &items))
}

fn potions(snap: &Snapshot<'_>, owner: AccountId) -> Result<Vec<PotionView>> {
    let mut potions = Vec::new();
    for entry in snap.inventory(owner)? {
        if entry.quantity == 0 {
            continue;
        }
        if let Some(item) = snap.item(entry.item_id)? {
            if item.category == ItemCategory::Potion {
                potions.push(PotionView {
                    entry: entry.id,
                    name: item.name,
                    heal: item.heal,
                    quantity: entry.quantity,
                });
            }
        }
    }
    Ok(potions)
}

/// The open session against `enemy`
fn session(snap: &Snapshot<'_>, character: &Character, enemy: EnemyId) -> Result<Battle> {
    match snap.battle_of(character.id)? {
        Some(battle) if battle.is_against(enemy) => Ok(battle),
        _ => Err(RuleError::not_found("battle", enemy).into()),
    }
}

impl Engine {
    /// The battle page against `enemy_id`, opening a session if needed
    ///
    /// A session against a different enemy is abandoned.
    pub fn battle_state(&self, principal: &Principal, enemy_id: EnemyId) -> Result<BattleView> {
        let (mut view, committed) = self.transact("battle_state", principal, |snap| {
            let character = snap.require_character(principal.account)?;
            let enemy = snap.require_enemy(enemy_id)?;

            let mut ws = WriteSet::new();
            let battle = match snap.battle_of(character.id)? {
                Some(open) if open.is_against(enemy_id) => open,
                abandoned => {
                    if let Some(old) = abandoned {
                        ws.push(PendingWrite::EndBattle {
                            id: old.id,
                            version: old.version,
                        });
                    }
                    let fresh = Battle::open(character.id, character.owner, &enemy, Utc::now());
                    ws.push(PendingWrite::StartBattle(fresh.clone()));
                    fresh
                }
            };

            let view = BattleView {
                battle: battle.id,
                turn: battle.turn,
                enemy: EnemyView::new(&enemy, battle.enemy_hp),
                health: character.health,
                max_health: character.max_health,
                stats: loadout(snap, &character)?,
                potions: potions(snap, principal.account)?,
            };
            Ok((ws, view))
        })?;

        if let Some(opened) = committed.battle() {
            info!(account = %principal.account, battle = %opened, enemy = %enemy_id, "battle opened");
            view.battle = opened;
        }
        Ok(view)
    }

    /// Strike the enemy of the open session
    pub fn attack(&self, principal: &Principal, enemy_id: EnemyId) -> Result<TurnOutcome> {
        let (outcome, _) = self.transact("attack", principal, |snap| {
            let mut character = snap.require_character(principal.account)?;
            let mut battle = session(snap, &character, enemy_id)?;
            let enemy = snap.require_enemy(enemy_id)?;
            let stats = loadout(snap, &character)?;

            let mut enemy_hp = battle.enemy_hp;
            let report = combat::attack(&mut character, &stats, &enemy, &mut enemy_hp);

            let mut ws = WriteSet::new();
            let mut rewards = None;
            let mut level_up = None;
            match report.status {
                BattleStatus::Won => {
                    let spoils = self.roll(|rng| enemy.roll_rewards(rng));
                    level_up = character.gain_exp(spoils.exp);
                    if !spoils.gold.is_zero() {
                        ws.push(PendingWrite::CreditWallet {
                            owner: principal.account,
                            amount: spoils.gold,
                        });
                    }
                    ws.push(PendingWrite::EndBattle {
                        id: battle.id,
                        version: battle.version,
                    });
                    rewards = Some(spoils);
                }
                BattleStatus::Lost | BattleStatus::Fled => {
                    ws.push(PendingWrite::EndBattle {
                        id: battle.id,
                        version: battle.version,
                    });
                }
                BattleStatus::Ongoing => {
                    battle.enemy_hp = enemy_hp;
                    battle.turn += 1;
                    ws.push(PendingWrite::UpdateBattle(battle));
                }
            }
            ws.push(PendingWrite::UpdateCharacter(character));

            Ok((
                ws,
                TurnOutcome {
                    report,
                    rewards,
                    level_up,
                },
            ))
        })?;

        if outcome.status().is_terminal() {
            info!(
                account = %principal.account,
                enemy = %enemy_id,
                status = ?outcome.status(),
                rewards = ?outcome.rewards,
                "battle ended"
            );
        }
        Ok(outcome)
    }

    /// Drink one unit of a potion stack, then take the enemy's counter-attack
    pub fn use_item(
        &self,
        principal: &Principal,
        entry_id: EntryId,
        enemy_id: EnemyId,
    ) -> Result<TurnOutcome> {
        let (outcome, _) = self.transact("use_item", principal, |snap| {
            let mut character = snap.require_character(principal.account)?;
            let mut battle = session(snap, &character, enemy_id)?;

            let mut entry = snap.require_entry(entry_id)?;
            entry.ensure_owner(principal.account)?;
            let item = snap.require_item(entry.item_id)?;
            if item.category != ItemCategory::Potion {
                return Err(RuleError::NotPotion(item.name).into());
            }
            entry.ensure_stock(&item.name)?;
            if character.is_full_health() {
                return Err(RuleError::FullHealth.into());
            }

            let enemy = snap.require_enemy(enemy_id)?;
            let stats = loadout(snap, &character)?;
            let report = combat::drink(
                &mut character,
                &stats,
                &enemy,
                battle.enemy_hp,
                &item.name,
                item.heal,
            );

            let mut ws = WriteSet::new();
            let version = entry.version;
            if entry.take(1)? {
                ws.push(PendingWrite::RemoveEntry {
                    id: entry.id,
                    version,
                });
            } else {
                ws.push(PendingWrite::UpdateEntry(entry));
            }
            if report.status.is_terminal() {
                ws.push(PendingWrite::EndBattle {
                    id: battle.id,
                    version: battle.version,
                });
            } else {
                battle.turn += 1;
                ws.push(PendingWrite::UpdateBattle(battle));
            }
            ws.push(PendingWrite::UpdateCharacter(character));

            Ok((
                ws,
                TurnOutcome {
                    report,
                    rewards: None,
                    level_up: None,
                },
            ))
        })?;

        Ok(outcome)
    }

    /// Leave the current battle; succeeds even without an open session
    pub fn flee(&self, principal: &Principal) -> Result<BattleStatus> {
        let (fled, _) = self.transact("flee", principal, |snap| {
            let character = snap.require_character(principal.account)?;
            let mut ws = WriteSet::new();
            let open = snap.battle_of(character.id)?;
            if let Some(battle) = &open {
                ws.push(PendingWrite::EndBattle {
                    id: battle.id,
                    version: battle.version,
                });
            }
            Ok((ws, open.map(|b| b.enemy_id)))
        })?;

        if let Some(enemy) = fled {
            info!(account = %principal.account, %enemy, "fled from battle");
        }
        Ok(BattleStatus::Fled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{hero, ids, TestWorld};
    use ironvale_core::{ErrorCode, Gold};

    fn open_battle(world: &TestWorld, principal: &Principal) -> Option<Battle> {
        let character = world.character(principal);
        world.engine.snapshot().unwrap().battle_of(character.id).unwrap()
    }

    #[test]
    fn test_battle_state_opens_and_reuses_session() {
        let world = TestWorld::new();
        let principal = hero(&world);
        world.give(&principal, ids::MINOR_POTION, 2);

        let first = world.engine.battle_state(&principal, ids::SLIME).unwrap();
        assert_ne!(first.battle.raw(), 0);
        assert_eq!(first.enemy.hp, 30);
        assert_eq!(first.enemy.max_hp, 30);
        assert_eq!(first.potions.len(), 1);
        assert_eq!(first.potions[0].heal, 30);
        assert_eq!(first.potions[0].quantity, 2);

        world.engine.attack(&principal, ids::SLIME).unwrap();
        let again = world.engine.battle_state(&principal, ids::SLIME).unwrap();
        assert_eq!(again.battle, first.battle);
        assert_eq!(again.turn, 1);
        assert_eq!(again.enemy.hp, 21);
    }

    #[test]
    fn test_battle_state_abandons_other_enemy() {
        let world = TestWorld::new();
        let principal = hero(&world);

        let slime = world.engine.battle_state(&principal, ids::SLIME).unwrap();
        let wolf = world.engine.battle_state(&principal, ids::WOLF).unwrap();
        assert_ne!(slime.battle, wolf.battle);
        assert_eq!(wolf.enemy.hp, 50);

        let err = world.engine.attack(&principal, ids::SLIME).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(open_battle(&world, &principal).unwrap().enemy_id, ids::WOLF);
    }

    #[test]
    fn test_attack_exchanges_blows() {
        let world = TestWorld::new();
        let principal = hero(&world);
        world.engine.battle_state(&principal, ids::SLIME).unwrap();

        // atk 10 vs def 1, then slime atk 6 vs def 5
        let outcome = world.engine.attack(&principal, ids::SLIME).unwrap();
        assert_eq!(outcome.status(), BattleStatus::Ongoing);
        assert_eq!(outcome.report.dealt, 9);
        assert_eq!(outcome.report.enemy_hp, 21);
        assert_eq!(outcome.report.taken, Some(1));
        assert_eq!(world.character(&principal).health, 99);
        assert_eq!(open_battle(&world, &principal).unwrap().enemy_hp, 21);
    }

    #[test]
    fn test_attack_flat_damage() {
        let world = TestWorld::new();
        let principal = hero(&world);
        world.edit_character(&principal, |c| c.atk = 52);
        world.engine.battle_state(&principal, ids::GOLEM).unwrap();

        // atk 52 vs def 12
        let outcome = world.engine.attack(&principal, ids::GOLEM).unwrap();
        assert_eq!(outcome.report.dealt, 40);
        assert_eq!(outcome.report.enemy_hp, 110);
    }

    #[test]
    fn test_victory_pays_out_and_closes_session() {
        let world = TestWorld::new();
        let principal = hero(&world);
        world.edit_character(&principal, |c| c.atk = 100);
        world.engine.battle_state(&principal, ids::SLIME).unwrap();

        let outcome = world.engine.attack(&principal, ids::SLIME).unwrap();
        assert_eq!(outcome.status(), BattleStatus::Won);
        assert_eq!(outcome.report.taken, None);

        let rewards = outcome.rewards.unwrap();
        assert!((15..=25).contains(&rewards.exp));
        assert!(rewards.gold >= Gold::from_whole(3) && rewards.gold <= Gold::from_whole(8));
        assert_eq!(world.balance(principal.account), rewards.gold);
        assert_eq!(world.character(&principal).experience, rewards.exp);
        assert!(open_battle(&world, &principal).is_none());
    }

    #[test]
    fn test_defeat_respawns_at_one_hp() {
        let world = TestWorld::new();
        let principal = hero(&world);
        world.edit_character(&principal, |c| c.health = 10);
        world.engine.battle_state(&principal, ids::GOLEM).unwrap();

        let outcome = world.engine.attack(&principal, ids::GOLEM).unwrap();
        assert_eq!(outcome.status(), BattleStatus::Lost);
        assert_eq!(outcome.report.character_hp, 1);
        assert!(outcome.rewards.is_none());

        let character = world.character(&principal);
        assert_eq!(character.health, 1);
        assert_eq!(character.experience, 0);
        assert!(open_battle(&world, &principal).is_none());
    }

    #[test]
    fn test_attack_requires_session() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let err = world.engine.attack(&principal, ids::SLIME).unwrap_err();
        assert!(matches!(
            err,
            Error::Rule(RuleError::NotFound { kind: "battle", .. })
        ));
    }

    #[test]
    fn test_potion_heal_is_capped() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let potion = world.give(&principal, ids::MINOR_POTION, 2);
        world.edit_character(&principal, |c| c.health = 80);
        world.engine.battle_state(&principal, ids::SLIME).unwrap();

        let outcome = world.engine.use_item(&principal, potion.id, ids::SLIME).unwrap();
        assert_eq!(outcome.report.healed, 20);
        // healed to 100, then the slime lands 1
        assert_eq!(outcome.report.character_hp, 99);
        assert_eq!(world.stack(&principal, ids::MINOR_POTION).unwrap().quantity, 1);
        assert_eq!(open_battle(&world, &principal).unwrap().turn, 1);
    }

    #[test]
    fn test_last_potion_removes_entry() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let potion = world.give(&principal, ids::MINOR_POTION, 1);
        world.edit_character(&principal, |c| c.health = 50);
        world.engine.battle_state(&principal, ids::SLIME).unwrap();

        world.engine.use_item(&principal, potion.id, ids::SLIME).unwrap();
        assert!(world.stack(&principal, ids::MINOR_POTION).is_none());

        let err = world
            .engine
            .use_item(&principal, potion.id, ids::SLIME)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_use_item_rules() {
        let world = TestWorld::new();
        let principal = hero(&world);
        let other = world.player(2, "Other");
        let sword = world.give(&principal, ids::WOODEN_SWORD, 1);
        let potion = world.give(&principal, ids::MINOR_POTION, 1);
        let foreign = world.give(&other, ids::MINOR_POTION, 1);
        world.engine.battle_state(&principal, ids::SLIME).unwrap();

        let err = world.engine.use_item(&principal, foreign.id, ids::SLIME).unwrap_err();
        assert!(matches!(err.rule(), Some(RuleError::NotOwned(_))));

        let err = world.engine.use_item(&principal, sword.id, ids::SLIME).unwrap_err();
        assert!(matches!(err.rule(), Some(RuleError::NotPotion(_))));

        let err = world.engine.use_item(&principal, potion.id, ids::SLIME).unwrap_err();
        assert_eq!(err.rule(), Some(&RuleError::FullHealth));
        assert_eq!(world.stack(&principal, ids::MINOR_POTION).unwrap().quantity, 1);
    }

    #[test]
    fn test_flee_closes_session() {
        let world = TestWorld::new();
        let principal = hero(&world);

        assert_eq!(world.engine.flee(&principal).unwrap(), BattleStatus::Fled);

        world.engine.battle_state(&principal, ids::WOLF).unwrap();
        let before = world.character(&principal);
        assert_eq!(world.engine.flee(&principal).unwrap(), BattleStatus::Fled);
        assert!(open_battle(&world, &principal).is_none());
        assert_eq!(world.character(&principal), before);
    }
}
