use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::constants::*;
use crate::core::error::CombatError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl Enemy {
    pub fn new(
        name: &str,
        max_health: u32,
        strength: u32,
        magic: u32,
        xp_reward: u32,
        gold_reward: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            health: max_health,
            max_health,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// The fixed enemy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

impl EnemyKind {
    pub fn all() -> [EnemyKind; 3] {
        [EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon]
    }

    pub fn key(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "goblin",
            EnemyKind::Orc => "orc",
            EnemyKind::Dragon => "dragon",
        }
    }

    /// A fresh, full-health enemy of this kind.
    pub fn spawn(&self) -> Enemy {
        match self {
            EnemyKind::Goblin => Enemy::new("Goblin", 50, 8, 2, 25, 10),
            EnemyKind::Orc => Enemy::new("Orc", 80, 12, 5, 50, 25),
            EnemyKind::Dragon => Enemy::new("Dragon", 200, 25, 15, 200, 100),
        }
    }

    /// Level 1-2 goblins, 3-5 orcs, 6+ dragons.
    pub fn for_level(level: u32) -> EnemyKind {
        match level {
            0..=GOBLIN_MAX_LEVEL => EnemyKind::Goblin,
            _ if level <= ORC_MAX_LEVEL => EnemyKind::Orc,
            _ => EnemyKind::Dragon,
        }
    }
}

impl FromStr for EnemyKind {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::all()
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CombatError::InvalidTarget(s.to_string()))
    }
}

/// Creates an enemy by catalog name (case-insensitive).
pub fn create_enemy(enemy_type: &str) -> Result<Enemy, CombatError> {
    Ok(enemy_type.parse::<EnemyKind>()?.spawn())
}

/// Picks the catalog enemy for a character level.
pub fn enemy_for_level(level: u32) -> Enemy {
    EnemyKind::for_level(level).spawn()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    Active,
    PlayerWon,
    EnemyWon,
    Escaped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Enemy,
}

/// XP and gold granted for a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
}

pub fn get_victory_rewards(enemy: &Enemy) -> Rewards {
    Rewards {
        xp: enemy.xp_reward,
        gold: enemy.gold_reward,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Winner,
    pub xp_gained: u32,
    pub gold_gained: u32,
    pub rounds: u32,
}

/// What a special ability did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityOutcome {
    Damage { ability: &'static str, amount: u32 },
    Heal { ability: &'static str, amount: u32 },
}

impl AbilityOutcome {
    pub fn message(&self) -> String {
        match self {
            AbilityOutcome::Damage { ability, amount } => {
                format!("{} hits for {} damage!", ability, amount)
            }
            AbilityOutcome::Heal { ability, amount } => {
                format!("{} restores {} HP!", ability, amount)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleLogEntry {
    pub message: String,
    pub is_player_action: bool,
}
