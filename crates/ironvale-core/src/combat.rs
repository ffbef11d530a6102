//! Turn-based combat resolution
//!
//! A battle moves `Ongoing -> {Won, Lost, Fled}`. Each player turn (attack
//! or potion) is followed by an enemy counter-attack unless the enemy fell.
//! A character knocked to zero is respawned at 1 HP and the battle is lost.
//!
//! These functions only mutate the values handed to them; rewards and
//! persistence are the caller's job.

use crate::character::Character;
use crate::enemy::Enemy;
use crate::stats::EffectiveStats;
use serde::{Deserialize, Serialize};

/// HP a defeated character is left with
pub const RESPAWN_HEALTH: u32 = 1;

/// Damage dealt by `atk` against `def`; never less than 1
pub fn damage(atk: u32, def: u32) -> u32 {
    atk.saturating_sub(def).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleStatus {
    Ongoing,
    Won,
    Lost,
    Fled,
}

impl BattleStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BattleStatus::Ongoing)
    }
}

/// What happened during one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub status: BattleStatus,
    /// Damage the character dealt this turn
    pub dealt: u32,
    /// HP restored by a potion this turn
    pub healed: u32,
    /// Damage taken from the counter-attack, if the enemy struck back
    pub taken: Option<u32>,
    pub enemy_hp: u32,
    pub character_hp: u32,
    pub log: Vec<String>,
}

impl TurnReport {
    fn new(character: &Character, enemy_hp: u32) -> Self {
        Self {
            status: BattleStatus::Ongoing,
            dealt: 0,
            healed: 0,
            taken: None,
            enemy_hp,
            character_hp: character.health,
            log: Vec::new(),
        }
    }
}

/// Character strikes, then the enemy counters if still standing
pub fn attack(
    character: &mut Character,
    stats: &EffectiveStats,
    enemy: &Enemy,
    enemy_hp: &mut u32,
) -> TurnReport {
    let mut report = TurnReport::new(character, *enemy_hp);

    let dealt = damage(stats.atk, enemy.def);
    *enemy_hp = enemy_hp.saturating_sub(dealt);
    report.dealt = dealt;
    report.enemy_hp = *enemy_hp;
    report
        .log
        .push(format!("{} hits {} for {}", character.name, enemy.name, dealt));

    if *enemy_hp == 0 {
        report.status = BattleStatus::Won;
        report.log.push(format!("{} is defeated", enemy.name));
        return report;
    }

    counter_attack(character, stats, enemy, &mut report);
    report
}

/// Character drinks a potion healing up to `heal`, then the enemy counters
///
/// The caller checks the potion and full-health preconditions first.
pub fn drink(
    character: &mut Character,
    stats: &EffectiveStats,
    enemy: &Enemy,
    enemy_hp: u32,
    item_name: &str,
    heal: u32,
) -> TurnReport {
    let mut report = TurnReport::new(character, enemy_hp);

    let healed = character.heal(heal);
    report.healed = healed;
    report
        .log
        .push(format!("{} drinks {} and recovers {} HP", character.name, item_name, healed));

    counter_attack(character, stats, enemy, &mut report);
    report
}

fn counter_attack(
    character: &mut Character,
    stats: &EffectiveStats,
    enemy: &Enemy,
    report: &mut TurnReport,
) {
    let taken = damage(enemy.atk, stats.def);
    report.taken = Some(taken);
    report
        .log
        .push(format!("{} hits {} for {}", enemy.name, character.name, taken));

    if character.take_damage(taken) {
        character.health = RESPAWN_HEALTH;
        report.status = BattleStatus::Lost;
        report
            .log
            .push(format!("{} falls and wakes up with {} HP", character.name, RESPAWN_HEALTH));
    }
    report.character_hp = character.health;
}
