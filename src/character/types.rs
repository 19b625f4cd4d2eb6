use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::constants::*;
use crate::core::error::{CharacterError, CharacterResult};
use crate::items::types::ItemEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Level 1 stats for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        match self {
            CharacterClass::Warrior => BaseStats {
                max_health: 120,
                strength: 15,
                magic: 5,
            },
            CharacterClass::Mage => BaseStats {
                max_health: 80,
                strength: 8,
                magic: 20,
            },
            CharacterClass::Rogue => BaseStats {
                max_health: 90,
                strength: 12,
                magic: 10,
            },
            CharacterClass::Cleric => BaseStats {
                max_health: 100,
                strength: 10,
                magic: 15,
            },
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = CharacterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CharacterError::InvalidClass(s.to_string()))
    }
}

/// An item sitting in an equipment slot, with the bonus it applied so it can
/// be reverted on unequip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_id: String,
    pub bonus: ItemEffect,
}

/// The player character.
///
/// Quest lists behave as ordered sets: an id appears at most once and never in
/// both lists. `validate` checks every record invariant and is run after a
/// save is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub gold: u32,
    pub inventory: Vec<String>,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipped_weapon: Option<EquippedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipped_armor: Option<EquippedItem>,
}

impl Character {
    pub fn new(name: &str, class: CharacterClass) -> CharacterResult<Self> {
        validate_name(name).map_err(CharacterError::InvalidName)?;
        let base = class.base_stats();

        Ok(Self {
            name: name.trim().to_string(),
            class,
            level: 1,
            experience: 0,
            health: base.max_health,
            max_health: base.max_health,
            strength: base.strength,
            magic: base.magic,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
        })
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn ensure_alive(&self) -> CharacterResult<()> {
        if self.is_dead() {
            return Err(CharacterError::Dead(self.name.clone()));
        }
        Ok(())
    }

    /// XP needed to leave the current level.
    pub fn xp_for_next_level(&self) -> u32 {
        self.level.saturating_mul(XP_PER_LEVEL)
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;

        if self.level < 1 {
            return Err("level must be at least 1".to_string());
        }
        if self.max_health == 0 {
            return Err("max_health must be positive".to_string());
        }
        if self.health > self.max_health {
            return Err(format!(
                "health {} exceeds max_health {}",
                self.health, self.max_health
            ));
        }
        if self.inventory.len() > MAX_INVENTORY_SIZE {
            return Err(format!(
                "inventory holds {} items (max {})",
                self.inventory.len(),
                MAX_INVENTORY_SIZE
            ));
        }
        if let Some(id) = first_duplicate(&self.active_quests) {
            return Err(format!("quest '{}' listed twice as active", id));
        }
        if let Some(id) = first_duplicate(&self.completed_quests) {
            return Err(format!("quest '{}' listed twice as completed", id));
        }
        if let Some(id) = self
            .active_quests
            .iter()
            .find(|id| self.completed_quests.contains(id))
        {
            return Err(format!("quest '{}' is both active and completed", id));
        }

        Ok(())
    }
}

fn first_duplicate(ids: &[String]) -> Option<&String> {
    ids.iter()
        .enumerate()
        .find(|(i, id)| ids[..*i].contains(id))
        .map(|(_, id)| id)
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be {} characters or less",
            MAX_NAME_LENGTH
        ));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(
            "Name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character_uses_class_base_stats() {
        for class in CharacterClass::all() {
            let hero = Character::new("Hero", class).unwrap();
            let base = class.base_stats();
            assert_eq!(hero.level, 1);
            assert_eq!(hero.experience, 0);
            assert_eq!(hero.health, base.max_health);
            assert_eq!(hero.max_health, base.max_health);
            assert_eq!(hero.strength, base.strength);
            assert_eq!(hero.magic, base.magic);
            assert_eq!(hero.gold, STARTING_GOLD);
            assert!(hero.inventory.is_empty());
            assert!(hero.active_quests.is_empty());
            assert!(hero.completed_quests.is_empty());
        }
    }

    #[test]
    fn test_warrior_base_stats() {
        let warrior = Character::new("Conan", CharacterClass::Warrior).unwrap();
        assert_eq!(warrior.max_health, 120);
        assert_eq!(warrior.strength, 15);
        assert_eq!(warrior.magic, 5);
    }

    #[test]
    fn test_class_parse_is_case_insensitive() {
        assert_eq!("mage".parse::<CharacterClass>(), Ok(CharacterClass::Mage));
        assert_eq!("CLERIC".parse::<CharacterClass>(), Ok(CharacterClass::Cleric));
        assert_eq!(" Rogue ".parse::<CharacterClass>(), Ok(CharacterClass::Rogue));
    }

    #[test]
    fn test_class_parse_rejects_unknown() {
        assert_eq!(
            "Necromancer".parse::<CharacterClass>(),
            Err(CharacterError::InvalidClass("Necromancer".to_string()))
        );
    }

    #[test]
    fn test_new_character_rejects_bad_names() {
        assert!(matches!(
            Character::new("", CharacterClass::Mage),
            Err(CharacterError::InvalidName(_))
        ));
        assert!(matches!(
            Character::new("12345678901234567", CharacterClass::Mage),
            Err(CharacterError::InvalidName(_))
        ));
        assert!(matches!(
            Character::new("bad/name", CharacterClass::Mage),
            Err(CharacterError::InvalidName(_))
        ));
    }

    #[test]
    fn test_validate_name_valid() {
        assert!(validate_name("Hero").is_ok());
        assert!(validate_name("Test 123").is_ok());
        assert!(validate_name("Warrior-2").is_ok());
        assert!(validate_name("under_score").is_ok());
    }

    #[test]
    fn test_validate_detects_health_above_max() {
        let mut hero = Character::new("Hero", CharacterClass::Rogue).unwrap();
        hero.health = hero.max_health + 1;
        assert!(hero.validate().is_err());
    }

    #[test]
    fn test_validate_detects_quest_in_both_lists() {
        let mut hero = Character::new("Hero", CharacterClass::Rogue).unwrap();
        hero.active_quests.push("q1".to_string());
        hero.completed_quests.push("q1".to_string());
        assert!(hero.validate().unwrap_err().contains("both active and completed"));
    }

    #[test]
    fn test_validate_detects_duplicate_quest() {
        let mut hero = Character::new("Hero", CharacterClass::Rogue).unwrap();
        hero.completed_quests.push("q1".to_string());
        hero.completed_quests.push("q1".to_string());
        assert!(hero.validate().is_err());
    }

    #[test]
    fn test_validate_detects_oversized_inventory() {
        let mut hero = Character::new("Hero", CharacterClass::Rogue).unwrap();
        hero.inventory = vec!["rock".to_string(); MAX_INVENTORY_SIZE + 1];
        assert!(hero.validate().is_err());
    }

    #[test]
    fn test_xp_for_next_level() {
        let mut hero = Character::new("Hero", CharacterClass::Mage).unwrap();
        assert_eq!(hero.xp_for_next_level(), 100);
        hero.level = 4;
        assert_eq!(hero.xp_for_next_level(), 400);
    }
}
