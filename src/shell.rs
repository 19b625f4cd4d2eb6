//! Line-oriented menu shell.
//!
//! The shell owns the [`GameContext`] and drives the engines from text
//! commands. Engine errors are printed and the menu continues; only I/O
//! errors on the shell's own streams end the session. End of input backs
//! out of every menu and exits.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use rand::Rng;

use crate::character::types::{Character, CharacterClass, EquippedItem};
use crate::character_manager::CharacterInfo;
use crate::combat::logic::{can_character_fight, combat_stats_line, SimpleBattle};
use crate::combat::types::{enemy_for_level, BattleState};
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::core::context::GameContext;
use crate::core::error::{InventoryError, QuestError};
use crate::items::inventory::{
    equip_armor, equip_weapon, inventory_summary, unequip_armor, unequip_weapon, use_item,
};
use crate::items::shop::{purchase_item, sell_item, sell_price};
use crate::items::types::ItemType;
use crate::quests::logic::{
    abandon_quest, accept_quest, complete_quest, get_active_quests, get_available_quests,
    get_completed_quests, quest_info_text, quest_progress_text,
};
use crate::quests::types::Quest;

pub struct Shell<R, W, G> {
    context: GameContext,
    input: R,
    output: W,
    rng: G,
}

/// Splits `"verb rest of line"` into the verb and the trimmed rest.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    }
}

fn quest_line(quest: &Quest) -> String {
    format!(
        "  [{}] {} (Level {}, {} XP, {} gold)",
        quest.quest_id, quest.title, quest.required_level, quest.reward_xp, quest.reward_gold
    )
}

fn equipped_line(slot: &Option<EquippedItem>) -> String {
    match slot {
        Some(equipped) => format!("{} ({})", equipped.item_id, equipped.bonus),
        None => "None".to_string(),
    }
}

fn save_line(info: &CharacterInfo) -> String {
    match (info.is_corrupted, info.class) {
        (false, Some(class)) => format!("  {} (Level {} {})", info.name, info.level, class),
        _ => format!("  {} [CORRUPTED]", info.filename),
    }
}

impl<R: BufRead, W: Write, G: Rng> Shell<R, W, G> {
    pub fn new(context: GameContext, input: R, output: W, rng: G) -> Self {
        Self {
            context,
            input,
            output,
            rng,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn print_result<E: Display>(&mut self, result: Result<String, E>) -> io::Result<()> {
        match result {
            Ok(message) => writeln!(self.output, "{}", message),
            Err(e) => writeln!(self.output, "Error: {}", e),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== QUEST CHRONICLES ===")?;

        loop {
            writeln!(
                self.output,
                "\n1. New Game\n2. Load Game\n3. Delete Character\n4. Exit"
            )?;
            let Some(choice) = self.read_line("Choice: ")? else {
                break;
            };

            let character = match choice.as_str() {
                "1" => self.new_game()?,
                "2" => self.load_game()?,
                "3" => {
                    self.delete_character()?;
                    None
                }
                "4" => break,
                _ => {
                    writeln!(self.output, "Invalid choice.")?;
                    None
                }
            };

            if let Some(mut character) = character {
                self.game_loop(&mut character)?;
            }
        }

        writeln!(self.output, "Farewell, adventurer!")
    }

    fn new_game(&mut self) -> io::Result<Option<Character>> {
        let Some(name) = self.read_line("Character name: ")? else {
            return Ok(None);
        };
        if self.context.characters.character_exists(&name) {
            writeln!(self.output, "A character named '{}' already exists.", name)?;
            return Ok(None);
        }

        let classes: Vec<_> = CharacterClass::all().iter().map(|c| c.name()).collect();
        writeln!(self.output, "Classes: {}", classes.join(", "))?;
        let Some(class) = self.read_line("Class: ")? else {
            return Ok(None);
        };

        let created = class
            .parse::<CharacterClass>()
            .and_then(|class| Character::new(&name, class));
        match created {
            Ok(character) => {
                writeln!(
                    self.output,
                    "Welcome, {} the {}!",
                    character.name, character.class
                )?;
                self.save(&character)?;
                Ok(Some(character))
            }
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                Ok(None)
            }
        }
    }

    fn list_saves(&mut self) -> io::Result<bool> {
        let saves = match self.context.characters.list_characters() {
            Ok(saves) => saves,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(false);
            }
        };
        if saves.is_empty() {
            writeln!(self.output, "No saved characters.")?;
            return Ok(false);
        }

        writeln!(self.output, "Saved characters:")?;
        for info in &saves {
            writeln!(self.output, "{}", save_line(info))?;
        }
        Ok(true)
    }

    fn load_game(&mut self) -> io::Result<Option<Character>> {
        if !self.list_saves()? {
            return Ok(None);
        }
        let Some(name) = self.read_line("Load which character? ")? else {
            return Ok(None);
        };

        match self.context.characters.load_character(&name) {
            Ok(character) => {
                writeln!(self.output, "Welcome back, {}!", character.name)?;
                Ok(Some(character))
            }
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                Ok(None)
            }
        }
    }

    fn delete_character(&mut self) -> io::Result<()> {
        if !self.list_saves()? {
            return Ok(());
        }
        let Some(name) = self.read_line("Delete which character? ")? else {
            return Ok(());
        };

        let result = self
            .context
            .characters
            .delete_character(&name)
            .map(|_| format!("Deleted {}.", name));
        self.print_result(result)
    }

    fn save(&mut self, character: &Character) -> io::Result<()> {
        let result = self
            .context
            .characters
            .save_character(character)
            .map(|_| "Game saved.".to_string());
        self.print_result(result)
    }

    fn game_loop(&mut self, character: &mut Character) -> io::Result<()> {
        loop {
            if character.is_dead() {
                writeln!(
                    self.output,
                    "{} has fallen. Game over. Your last save is untouched.",
                    character.name
                )?;
                return Ok(());
            }

            writeln!(
                self.output,
                "\n1. View Character\n2. Inventory\n3. Quests\n4. Explore\n5. Shop\n6. Save Game\n7. Save and Quit"
            )?;
            let Some(choice) = self.read_line("Choice: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.show_character(character)?,
                "2" => self.inventory_menu(character)?,
                "3" => self.quest_menu(character)?,
                "4" => self.explore(character)?,
                "5" => self.shop_menu(character)?,
                "6" => self.save(character)?,
                "7" => {
                    self.save(character)?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn show_character(&mut self, character: &Character) -> io::Result<()> {
        writeln!(self.output, "=== {} ===", character.name)?;
        writeln!(self.output, "Class: {}", character.class)?;
        writeln!(
            self.output,
            "Level: {} (XP: {}/{})",
            character.level,
            character.experience,
            character.xp_for_next_level()
        )?;
        writeln!(
            self.output,
            "Health: {}/{}",
            character.health, character.max_health
        )?;
        writeln!(self.output, "Strength: {}", character.strength)?;
        writeln!(self.output, "Magic: {}", character.magic)?;
        writeln!(self.output, "Gold: {}", character.gold)?;
        writeln!(self.output, "Weapon: {}", equipped_line(&character.equipped_weapon))?;
        writeln!(self.output, "Armor: {}", equipped_line(&character.equipped_armor))?;
        writeln!(
            self.output,
            "{}",
            quest_progress_text(character, &self.context.quests)
        )
    }

    fn inventory_menu(&mut self, character: &mut Character) -> io::Result<()> {
        loop {
            let lines = inventory_summary(character, &self.context.items);
            writeln!(
                self.output,
                "=== Inventory ({}/{}) ===",
                character.inventory.len(),
                MAX_INVENTORY_SIZE
            )?;
            if lines.is_empty() {
                writeln!(self.output, "  (empty)")?;
            }
            for line in &lines {
                let kind = line.item_type.map_or("unknown", |t| t.name());
                writeln!(
                    self.output,
                    "  [{}] {} x{} ({})",
                    line.item_id, line.name, line.quantity, kind
                )?;
            }
            writeln!(
                self.output,
                "Commands: use <id>, equip <id>, unequip weapon|armor, back"
            )?;

            let Some(line) = self.read_line("> ")? else {
                return Ok(());
            };
            let (command, arg) = split_command(&line);

            let result: Result<String, InventoryError> = match command {
                "use" => match self.context.items.get(arg) {
                    Some(item) => use_item(character, item).map(|change| {
                        format!(
                            "Used {} ({} {:+}).",
                            item.name,
                            item.effect.stat.name(),
                            change
                        )
                    }),
                    None => Err(InventoryError::ItemNotFound(arg.to_string())),
                },
                "equip" => match self.context.items.get(arg) {
                    Some(item) => match item.item_type {
                        ItemType::Weapon => equip_weapon(character, item),
                        ItemType::Armor => equip_armor(character, item),
                        ItemType::Consumable => Err(InventoryError::InvalidItemType(format!(
                            "{} cannot be equipped",
                            item.name
                        ))),
                    }
                    .map(|_| format!("Equipped {}.", item.name)),
                    None => Err(InventoryError::ItemNotFound(arg.to_string())),
                },
                "unequip" => match arg {
                    "weapon" => unequip_weapon(character),
                    "armor" => unequip_armor(character),
                    other => Err(InventoryError::InvalidItemType(format!(
                        "no '{}' slot",
                        other
                    ))),
                }
                .map(|item_id| format!("Unequipped {}.", item_id)),
                "back" | "" => return Ok(()),
                other => {
                    writeln!(self.output, "Unknown command '{}'.", other)?;
                    continue;
                }
            };
            self.print_result(result)?;
        }
    }

    fn print_quests(&mut self, heading: &str, quests: Vec<String>) -> io::Result<()> {
        writeln!(self.output, "{}:", heading)?;
        if quests.is_empty() {
            writeln!(self.output, "  (none)")?;
        }
        for line in quests {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn quest_menu(&mut self, character: &mut Character) -> io::Result<()> {
        loop {
            writeln!(
                self.output,
                "\n=== Quests ===\n1. Active\n2. Available\n3. Completed\n4. Accept\n5. Complete\n6. Abandon\n7. Details\n8. Progress\n9. Back"
            )?;
            let Some(choice) = self.read_line("Choice: ")? else {
                return Ok(());
            };

            let quests = &self.context.quests;
            match choice.as_str() {
                "1" => {
                    let lines = get_active_quests(character, quests)
                        .into_iter()
                        .map(quest_line)
                        .collect();
                    self.print_quests("Active quests", lines)?;
                }
                "2" => {
                    let lines = get_available_quests(character, quests)
                        .into_iter()
                        .map(quest_line)
                        .collect();
                    self.print_quests("Available quests", lines)?;
                }
                "3" => {
                    let lines = get_completed_quests(character, quests)
                        .into_iter()
                        .map(quest_line)
                        .collect();
                    self.print_quests("Completed quests", lines)?;
                }
                "4" | "5" | "6" | "7" => {
                    let Some(quest_id) = self.read_line("Quest id: ")? else {
                        return Ok(());
                    };
                    let quests = &self.context.quests;
                    let result = match choice.as_str() {
                        "4" => accept_quest(character, &quest_id, quests)
                            .map(|_| format!("Accepted quest '{}'.", quest_id)),
                        "5" => complete_quest(character, &quest_id, quests).map(|reward| {
                            format!(
                                "Quest complete! +{} XP, +{} gold",
                                reward.xp, reward.gold
                            )
                        }),
                        "6" => abandon_quest(character, &quest_id)
                            .map(|_| format!("Abandoned quest '{}'.", quest_id)),
                        _ => quests.lookup(&quest_id).map(quest_info_text),
                    };
                    self.print_result::<QuestError>(result)?;
                }
                "8" => {
                    let text = quest_progress_text(character, quests);
                    writeln!(self.output, "{}", text)?;
                }
                "9" => return Ok(()),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn explore(&mut self, character: &mut Character) -> io::Result<()> {
        if !can_character_fight(character) {
            return writeln!(self.output, "You are in no condition to fight.");
        }

        let level_before = character.level;
        let enemy = enemy_for_level(character.level);
        writeln!(self.output, "A wild {} appears!", enemy.name)?;

        let mut battle = match SimpleBattle::new(character, enemy) {
            Ok(battle) => battle,
            Err(e) => return writeln!(self.output, "Error: {}", e),
        };

        while battle.is_active() {
            writeln!(
                self.output,
                "{}",
                combat_stats_line(battle.character(), battle.enemy())
            )?;
            let ability = match battle.ability_cooldown() {
                0 => "Special Ability".to_string(),
                turns => format!("Special Ability (ready in {})", turns),
            };
            writeln!(self.output, "1. Attack\n2. {}\n3. Try to Escape", ability)?;

            let Some(choice) = self.read_line("Action: ")? else {
                return Ok(());
            };
            let result = match choice.as_str() {
                "1" => battle.player_turn().map(|damage| {
                    format!("You hit the {} for {} damage.", battle.enemy().name, damage)
                }),
                "2" => battle
                    .use_special_ability(&mut self.rng)
                    .map(|outcome| outcome.message()),
                "3" => battle.attempt_escape(&mut self.rng).map(|escaped| {
                    if escaped {
                        "You escaped!".to_string()
                    } else {
                        "You failed to escape!".to_string()
                    }
                }),
                _ => {
                    writeln!(self.output, "Invalid action.")?;
                    continue;
                }
            };
            match result {
                Ok(message) => writeln!(self.output, "{}", message)?,
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    continue;
                }
            }

            if battle.is_active() {
                let result = battle.enemy_turn().map(|damage| {
                    format!("The {} hits you for {} damage.", battle.enemy().name, damage)
                });
                self.print_result(result)?;
            }
        }

        let state = battle.state();
        let outcome = battle.outcome();
        let enemy = battle.into_enemy();
        match (state, outcome) {
            (BattleState::PlayerWon, Some(outcome)) => {
                writeln!(
                    self.output,
                    "Victory! The {} is defeated. +{} XP, +{} gold",
                    enemy.name, outcome.xp_gained, outcome.gold_gained
                )?;
                if character.level > level_before {
                    writeln!(self.output, "LEVEL UP! You are now level {}.", character.level)?;
                }
            }
            (BattleState::Escaped, _) => writeln!(self.output, "You got away safely.")?,
            _ => writeln!(self.output, "You were defeated by the {}...", enemy.name)?,
        }
        Ok(())
    }

    fn shop_menu(&mut self, character: &mut Character) -> io::Result<()> {
        loop {
            writeln!(self.output, "=== Shop === (Gold: {})", character.gold)?;
            for item in self.context.items.iter() {
                writeln!(
                    self.output,
                    "  [{}] {} - {} gold, sells for {} ({}, {})",
                    item.item_id,
                    item.name,
                    item.cost,
                    sell_price(item),
                    item.item_type,
                    item.effect
                )?;
            }
            writeln!(self.output, "Commands: buy <id>, sell <id>, back")?;

            let Some(line) = self.read_line("> ")? else {
                return Ok(());
            };
            let (command, arg) = split_command(&line);
            let item = self.context.items.get(arg);

            let result = match (command, item) {
                ("back" | "", _) => return Ok(()),
                ("buy" | "sell", None) => Err(InventoryError::ItemNotFound(arg.to_string())),
                ("buy", Some(item)) => purchase_item(character, item)
                    .map(|_| format!("Bought {} for {} gold.", item.name, item.cost)),
                ("sell", Some(item)) => sell_item(character, item)
                    .map(|price| format!("Sold {} for {} gold.", item.name, price)),
                (other, _) => {
                    writeln!(self.output, "Unknown command '{}'.", other)?;
                    continue;
                }
            };
            self.print_result(result)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use rand::rngs::mock::StepRng;
    use std::fs;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn temp_root() -> std::path::PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("chronicles_shell_test_{}_{}", std::process::id(), id))
    }

    fn run_script(root: &std::path::Path, script: &str) -> String {
        let context = GameContext::load(GameConfig::with_root(root)).unwrap();
        let mut shell = Shell::new(
            context,
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            StepRng::new(0, 0),
        );
        shell.run().unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("buy  iron_sword "), ("buy", "iron_sword"));
        assert_eq!(split_command("back"), ("back", ""));
    }

    #[test]
    fn test_new_game_buy_and_save() {
        let root = temp_root();
        let output = run_script(
            &root,
            "1\nAria\nmage\n5\nbuy health_potion\nback\n1\n7\n4\n",
        );

        assert!(output.contains("Welcome, Aria the Mage!"));
        assert!(output.contains("Bought Health Potion for 25 gold."));
        assert!(output.contains("Gold: 75"));
        assert!(output.contains("Farewell, adventurer!"));

        let context = GameContext::load(GameConfig::with_root(&root)).unwrap();
        let saved = context.characters.load_character("Aria").unwrap();
        assert_eq!(saved.gold, 75);
        assert_eq!(saved.inventory, vec!["health_potion".to_string()]);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_quest_flow_through_menu() {
        let root = temp_root();
        let output = run_script(
            &root,
            "1\nBran\nwarrior\n3\n4\nfirst_steps\n5\nfirst_steps\n4\nfirst_steps\n9\n7\n",
        );

        assert!(output.contains("Accepted quest 'first_steps'."));
        assert!(output.contains("Quest complete! +50 XP, +25 gold"));
        assert!(output.contains("Error: quest 'first_steps' is already completed"));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_explore_until_victory() {
        let root = temp_root();
        // Warrior deals 13 per hit to a goblin with 50 HP: four attacks.
        let output = run_script(&root, "1\nCara\nwarrior\n4\n1\n1\n1\n1\n7\n");

        assert!(output.contains("A wild Goblin appears!"));
        assert!(output.contains("Victory! The Goblin is defeated. +25 XP, +10 gold"));

        let context = GameContext::load(GameConfig::with_root(&root)).unwrap();
        let saved = context.characters.load_character("Cara").unwrap();
        assert_eq!(saved.experience, 25);
        assert_eq!(saved.gold, 110);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let root = temp_root();
        run_script(&root, "1\nDax\nrogue\n7\n4\n");
        let output = run_script(&root, "1\nDax\n4\n");
        assert!(output.contains("A character named 'Dax' already exists."));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_end_of_input_exits() {
        let root = temp_root();
        let output = run_script(&root, "1\nEve\ncleric\n");
        assert!(output.contains("Farewell, adventurer!"));
        fs::remove_dir_all(&root).ok();
    }
}
