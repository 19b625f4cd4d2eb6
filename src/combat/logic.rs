use rand::Rng;
use std::collections::VecDeque;

use crate::character::progression::{add_gold, gain_experience, gold_after, heal_character};
use crate::character::types::{Character, CharacterClass};
use crate::core::constants::*;
use crate::core::error::{CombatError, CombatResult};

use super::types::*;

/// Damage of a basic attack: attacker strength minus a quarter of the
/// defender's strength, never less than 1.
pub fn calculate_damage(attacker_strength: u32, defender_strength: u32) -> u32 {
    attacker_strength
        .saturating_sub(defender_strength / DEFENSE_DIVISOR)
        .max(MIN_DAMAGE)
}

pub fn can_character_fight(character: &Character) -> bool {
    !character.is_dead()
}

/// One encounter between the player and a single enemy.
///
/// The battle starts `Active` and ends in exactly one of `PlayerWon`,
/// `EnemyWon` or `Escaped`. The enemy's death is checked before the
/// character's, so a double knockout goes to the player. Rewards are applied
/// to the character once, on the transition to `PlayerWon`.
pub struct SimpleBattle<'a> {
    character: &'a mut Character,
    enemy: Enemy,
    state: BattleState,
    rounds: u32,
    ability_cooldown: u32,
    rewards: Rewards,
    log: VecDeque<BattleLogEntry>,
}

impl<'a> SimpleBattle<'a> {
    pub fn new(character: &'a mut Character, enemy: Enemy) -> CombatResult<Self> {
        character.ensure_alive()?;

        tracing::debug!(
            character = %character.name,
            enemy = %enemy.name,
            "battle started"
        );

        Ok(Self {
            character,
            enemy,
            state: BattleState::Active,
            rounds: 0,
            ability_cooldown: 0,
            rewards: Rewards::default(),
            log: VecDeque::with_capacity(BATTLE_LOG_CAPACITY),
        })
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BattleState::Active
    }

    pub fn character(&self) -> &Character {
        &*self.character
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Player turns left before the special ability can be used again.
    pub fn ability_cooldown(&self) -> u32 {
        self.ability_cooldown
    }

    pub fn log(&self) -> impl Iterator<Item = &BattleLogEntry> {
        self.log.iter()
    }

    fn add_log_entry(&mut self, message: String, is_player_action: bool) {
        if self.log.len() >= BATTLE_LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(BattleLogEntry {
            message,
            is_player_action,
        });
    }

    fn ensure_active(&self) -> CombatResult<()> {
        if !self.is_active() {
            return Err(CombatError::NotActive);
        }
        Ok(())
    }

    /// Player attacks the enemy. Returns the damage dealt.
    pub fn player_turn(&mut self) -> CombatResult<u32> {
        self.ensure_active()?;
        self.rounds += 1;
        self.ability_cooldown = self.ability_cooldown.saturating_sub(1);

        let damage = calculate_damage(self.character.strength, self.enemy.strength);
        self.enemy.take_damage(damage);
        self.add_log_entry(
            format!("{} hits {} for {} damage", self.character.name, self.enemy.name, damage),
            true,
        );

        self.check_battle_end()?;
        Ok(damage)
    }

    /// Enemy attacks the character. Returns the damage dealt.
    pub fn enemy_turn(&mut self) -> CombatResult<u32> {
        self.ensure_active()?;

        let damage = calculate_damage(self.enemy.strength, self.character.strength);
        self.character.health = self.character.health.saturating_sub(damage);
        self.add_log_entry(
            format!("{} hits {} for {} damage", self.enemy.name, self.character.name, damage),
            false,
        );

        self.check_battle_end()?;
        Ok(damage)
    }

    /// Uses the character's class ability in place of a basic attack.
    pub fn use_special_ability(&mut self, rng: &mut impl Rng) -> CombatResult<AbilityOutcome> {
        self.ensure_active()?;
        if self.ability_cooldown > 0 {
            return Err(CombatError::AbilityOnCooldown {
                turns_remaining: self.ability_cooldown,
            });
        }
        self.rounds += 1;

        let outcome = use_special_ability(self.character, &mut self.enemy, rng);
        self.ability_cooldown = ABILITY_COOLDOWN_TURNS;
        self.add_log_entry(outcome.message(), true);

        self.check_battle_end()?;
        Ok(outcome)
    }

    /// 50% chance to leave the fight. Returns whether the escape worked.
    pub fn attempt_escape(&mut self, rng: &mut impl Rng) -> CombatResult<bool> {
        self.ensure_active()?;

        let escaped = rng.gen_bool(ESCAPE_CHANCE);
        if escaped {
            self.state = BattleState::Escaped;
            self.add_log_entry(format!("{} escaped!", self.character.name), true);
            tracing::debug!(rounds = self.rounds, "escaped from battle");
        } else {
            self.add_log_entry("Escape failed!".to_string(), true);
        }

        Ok(escaped)
    }

    /// Alternates player and enemy turns until someone falls.
    ///
    /// A fight still running after `MAX_BATTLE_ROUNDS` rounds is a loss.
    pub fn start_battle(&mut self) -> CombatResult<BattleOutcome> {
        self.ensure_active()?;

        while self.is_active() {
            self.player_turn()?;
            if !self.is_active() {
                break;
            }

            self.enemy_turn()?;
            if !self.is_active() {
                break;
            }

            if self.rounds >= MAX_BATTLE_ROUNDS {
                tracing::warn!(rounds = self.rounds, "battle hit the round cap");
                self.state = BattleState::EnemyWon;
            }
        }

        self.outcome().ok_or(CombatError::NotActive)
    }

    /// Final result, once the battle has a winner.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let winner = match self.state {
            BattleState::PlayerWon => Winner::Player,
            BattleState::EnemyWon => Winner::Enemy,
            BattleState::Active | BattleState::Escaped => return None,
        };

        Some(BattleOutcome {
            winner,
            xp_gained: self.rewards.xp,
            gold_gained: self.rewards.gold,
            rounds: self.rounds,
        })
    }

    pub fn into_enemy(self) -> Enemy {
        self.enemy
    }

    fn check_battle_end(&mut self) -> CombatResult<BattleState> {
        if !self.enemy.is_alive() {
            let rewards = get_victory_rewards(&self.enemy);
            gold_after(self.character, i64::from(rewards.gold))?;
            self.state = BattleState::PlayerWon;
            self.grant_rewards(rewards)?;
        } else if self.character.is_dead() {
            self.state = BattleState::EnemyWon;
            tracing::info!(
                character = %self.character.name,
                enemy = %self.enemy.name,
                rounds = self.rounds,
                "character defeated"
            );
        }
        Ok(self.state)
    }

    fn grant_rewards(&mut self, rewards: Rewards) -> CombatResult<()> {
        gain_experience(self.character, rewards.xp)?;
        add_gold(self.character, i64::from(rewards.gold))?;
        self.rewards = rewards;

        self.add_log_entry(
            format!(
                "{} defeated! +{} XP, +{} gold",
                self.enemy.name, rewards.xp, rewards.gold
            ),
            true,
        );
        tracing::info!(
            enemy = %self.enemy.name,
            xp = rewards.xp,
            gold = rewards.gold,
            rounds = self.rounds,
            "battle won"
        );
        Ok(())
    }
}

/// Runs the class ability for `character`.
pub fn use_special_ability(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> AbilityOutcome {
    match character.class {
        CharacterClass::Warrior => warrior_power_strike(character, enemy),
        CharacterClass::Mage => mage_fireball(character, enemy),
        CharacterClass::Rogue => rogue_critical_strike(character, enemy, rng),
        CharacterClass::Cleric => cleric_heal(character),
    }
}

pub fn warrior_power_strike(character: &Character, enemy: &mut Enemy) -> AbilityOutcome {
    let amount = character.strength.saturating_mul(POWER_STRIKE_MULTIPLIER);
    enemy.take_damage(amount);
    AbilityOutcome::Damage {
        ability: "Power Strike",
        amount,
    }
}

pub fn mage_fireball(character: &Character, enemy: &mut Enemy) -> AbilityOutcome {
    let amount = character.magic.saturating_mul(FIREBALL_MULTIPLIER);
    enemy.take_damage(amount);
    AbilityOutcome::Damage {
        ability: "Fireball",
        amount,
    }
}

pub fn rogue_critical_strike(
    character: &Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> AbilityOutcome {
    let multiplier = if rng.gen_bool(CRITICAL_STRIKE_CHANCE) {
        CRITICAL_STRIKE_MULTIPLIER
    } else {
        1
    };
    let amount = character.strength.saturating_mul(multiplier);
    enemy.take_damage(amount);
    AbilityOutcome::Damage {
        ability: "Critical Strike",
        amount,
    }
}

pub fn cleric_heal(character: &mut Character) -> AbilityOutcome {
    AbilityOutcome::Heal {
        ability: "Heal",
        amount: heal_character(character, CLERIC_HEAL_AMOUNT),
    }
}

/// One-line health readout for both sides.
pub fn combat_stats_line(character: &Character, enemy: &Enemy) -> String {
    format!(
        "{}: HP={}/{} | {}: HP={}/{}",
        character.name,
        character.health,
        character.max_health,
        enemy.name,
        enemy.health,
        enemy.max_health
    )
}
