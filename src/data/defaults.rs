use std::fs;
use std::path::Path;

use crate::core::constants::{ITEMS_FILE, QUESTS_FILE};
use crate::core::error::DataResult;

pub const DEFAULT_QUESTS: &str = "QUEST_ID: first_steps
TITLE: First Steps
DESCRIPTION: Complete your first adventure.
REWARD_XP: 50
REWARD_GOLD: 25
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: herb_gathering
TITLE: Herb Gathering
DESCRIPTION: Collect healing herbs for the village healer.
REWARD_XP: 30
REWARD_GOLD: 20
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: goblin_trouble
TITLE: Goblin Trouble
DESCRIPTION: Drive the goblins away from the farms.
REWARD_XP: 100
REWARD_GOLD: 50
REQUIRED_LEVEL: 2
PREREQUISITE: first_steps

QUEST_ID: orc_camp
TITLE: The Orc Camp
DESCRIPTION: Break up the orc camp in the hills.
REWARD_XP: 250
REWARD_GOLD: 120
REQUIRED_LEVEL: 4
PREREQUISITE: goblin_trouble

QUEST_ID: dragon_lair
TITLE: The Dragon's Lair
DESCRIPTION: Slay the dragon that haunts the mountain.
REWARD_XP: 600
REWARD_GOLD: 400
REQUIRED_LEVEL: 6
PREREQUISITE: orc_camp
";

pub const DEFAULT_ITEMS: &str = "ITEM_ID: health_potion
NAME: Health Potion
TYPE: consumable
EFFECT: health:20
COST: 25
DESCRIPTION: Restores a small amount of health.

ITEM_ID: greater_health_potion
NAME: Greater Health Potion
TYPE: consumable
EFFECT: health:60
COST: 60
DESCRIPTION: Restores a large amount of health.

ITEM_ID: strength_tonic
NAME: Strength Tonic
TYPE: consumable
EFFECT: strength:2
COST: 80
DESCRIPTION: Permanently increases strength.

ITEM_ID: iron_sword
NAME: Iron Sword
TYPE: weapon
EFFECT: strength:5
COST: 60
DESCRIPTION: A plain but reliable blade.

ITEM_ID: oak_staff
NAME: Oak Staff
TYPE: weapon
EFFECT: magic:6
COST: 70
DESCRIPTION: A staff that focuses arcane power.

ITEM_ID: leather_armor
NAME: Leather Armor
TYPE: armor
EFFECT: max_health:15
COST: 50
DESCRIPTION: Light armor made of cured hide.

ITEM_ID: chain_mail
NAME: Chain Mail
TYPE: armor
EFFECT: max_health:35
COST: 150
DESCRIPTION: Interlocking rings of steel.
";

/// Writes the default `quests.txt` and `items.txt` into `dir`.
///
/// Existing files are left alone. Creates `dir` if needed.
pub fn create_default_data_files(dir: &Path) -> DataResult<()> {
    fs::create_dir_all(dir)?;

    for (file, content) in [(QUESTS_FILE, DEFAULT_QUESTS), (ITEMS_FILE, DEFAULT_ITEMS)] {
        let path = dir.join(file);
        if path.exists() {
            continue;
        }
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "created default data file");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_items, load_quests, parse_items, parse_quests};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn temp_data_dir() -> std::path::PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("chronicles_data_test_{}_{}", std::process::id(), id))
    }

    #[test]
    fn test_defaults_parse() {
        let quests = parse_quests(DEFAULT_QUESTS).unwrap();
        assert_eq!(quests.len(), 5);
        assert!(quests.validate_prerequisites().is_ok());
        assert_eq!(
            quests.prerequisite_chain("dragon_lair").unwrap(),
            vec!["first_steps", "goblin_trouble", "orc_camp", "dragon_lair"]
        );

        let items = parse_items(DEFAULT_ITEMS).unwrap();
        assert_eq!(items.len(), 7);
        assert_eq!(items.get("health_potion").unwrap().cost, 25);
    }

    #[test]
    fn test_create_default_data_files() {
        let dir = temp_data_dir();
        create_default_data_files(&dir).unwrap();

        assert_eq!(load_quests(&dir.join(QUESTS_FILE)).unwrap().len(), 5);
        assert_eq!(load_items(&dir.join(ITEMS_FILE)).unwrap().len(), 7);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_existing_files_are_kept() {
        let dir = temp_data_dir();
        fs::create_dir_all(&dir).unwrap();
        let custom = "ITEM_ID: rock\nNAME: Rock\nTYPE: weapon\nEFFECT: strength:1\nCOST: 1\nDESCRIPTION: A rock.\n";
        fs::write(dir.join(ITEMS_FILE), custom).unwrap();

        create_default_data_files(&dir).unwrap();

        let items = load_items(&dir.join(ITEMS_FILE)).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items.contains("rock"));
        assert!(dir.join(QUESTS_FILE).exists());

        fs::remove_dir_all(&dir).ok();
    }
}
