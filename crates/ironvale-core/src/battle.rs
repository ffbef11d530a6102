//! Server-owned battle sessions
//!
//! The enemy's remaining HP lives here, never in the request. A character
//! has at most one open battle; terminal turns delete it.

use crate::enemy::Enemy;
use crate::{AccountId, BattleId, CharacterId, EnemyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    pub character: CharacterId,
    pub owner: AccountId,
    pub enemy_id: EnemyId,
    pub enemy_hp: u32,
    /// Turns resolved so far
    pub turn: u32,
    pub started_at: DateTime<Utc>,
    pub version: u64,
}

impl Battle {
    /// A fresh session against `enemy` at full HP
    ///
    /// The id is a placeholder until the store allocates one on commit.
    pub fn open(character: CharacterId, owner: AccountId, enemy: &Enemy, now: DateTime<Utc>) -> Self {
        Self {
            id: BattleId::new(0),
            character,
            owner,
            enemy_id: enemy.id,
            enemy_hp: enemy.max_hp,
            turn: 0,
            started_at: now,
            version: 0,
        }
    }

    pub fn is_against(&self, enemy: EnemyId) -> bool {
        self.enemy_id == enemy
    }
}
