//! Experience, gold and healing.

use crate::core::constants::*;
use crate::core::error::{CharacterError, CharacterResult};

use super::types::Character;

/// Adds XP and processes any level-ups.
///
/// Each level costs `level * 100` XP. A level-up raises max health, strength
/// and magic and fully restores health. Returns true if at least one level-up
/// happened. A dead character gains nothing.
pub fn gain_experience(character: &mut Character, xp: u32) -> CharacterResult<bool> {
    character.ensure_alive()?;

    character.experience = character.experience.saturating_add(xp);
    let mut leveled = false;

    while character.experience >= character.xp_for_next_level() {
        character.experience -= character.xp_for_next_level();
        character.level = character.level.saturating_add(1);
        character.max_health = character.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
        character.strength = character.strength.saturating_add(LEVEL_UP_STRENGTH);
        character.magic = character.magic.saturating_add(LEVEL_UP_MAGIC);
        character.health = character.max_health;
        leveled = true;

        tracing::info!(
            name = %character.name,
            level = character.level,
            "level up"
        );
    }

    Ok(leveled)
}

/// The balance a signed gold change would leave, without applying it.
pub fn gold_after(character: &Character, amount: i64) -> CharacterResult<u32> {
    let new_balance = i64::from(character.gold).saturating_add(amount);
    u32::try_from(new_balance).map_err(|_| CharacterError::NegativeGold {
        balance: character.gold,
        amount,
    })
}

/// Applies a signed gold change and returns the new balance.
pub fn add_gold(character: &mut Character, amount: i64) -> CharacterResult<u32> {
    let new_balance = gold_after(character, amount)?;
    character.gold = new_balance;
    Ok(new_balance)
}

/// Heals up to max health. Returns the amount actually restored.
pub fn heal_character(character: &mut Character, amount: u32) -> u32 {
    let healed = amount.min(character.max_health.saturating_sub(character.health));
    character.health += healed;
    healed
}
