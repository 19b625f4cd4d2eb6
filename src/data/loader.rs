use std::fs;
use std::path::Path;

use crate::core::constants::NO_PREREQUISITE;
use crate::core::error::{DataError, DataResult};
use crate::items::types::{Item, ItemCatalog, ItemEffect, ItemType};
use crate::quests::types::{Quest, QuestCatalog};

use super::parser::{parse_records, Record};

const QUEST_KEYS: [&str; 7] = [
    "QUEST_ID",
    "TITLE",
    "DESCRIPTION",
    "REWARD_XP",
    "REWARD_GOLD",
    "REQUIRED_LEVEL",
    "PREREQUISITE",
];

const ITEM_KEYS: [&str; 6] = ["ITEM_ID", "NAME", "TYPE", "EFFECT", "COST", "DESCRIPTION"];

fn read_catalog_file(path: &Path) -> DataResult<String> {
    if !path.is_file() {
        return Err(DataError::MissingFile(path.to_path_buf()));
    }
    fs::read_to_string(path)
        .map_err(|e| DataError::Corrupted(format!("{}: {}", path.display(), e)))
}

fn log_unknown_keys(record: &Record, known: &[&str]) {
    for key in record.keys().filter(|key| !known.contains(key)) {
        tracing::debug!(line = record.line, key, "ignoring unknown catalog key");
    }
}

fn quest_from_record(record: &Record) -> DataResult<Quest> {
    log_unknown_keys(record, &QUEST_KEYS);

    let prerequisite = record.require("PREREQUISITE")?;
    let prerequisite = if prerequisite.is_empty() || prerequisite.eq_ignore_ascii_case(NO_PREREQUISITE)
    {
        None
    } else {
        Some(prerequisite.to_string())
    };

    let required_level = record.require_u32("REQUIRED_LEVEL")?;
    if required_level == 0 {
        return Err(DataError::InvalidFormat(format!(
            "REQUIRED_LEVEL must be at least 1 in record at line {}",
            record.line
        )));
    }

    Ok(Quest {
        quest_id: record.require_non_empty("QUEST_ID")?.to_string(),
        title: record.require("TITLE")?.to_string(),
        description: record.require("DESCRIPTION")?.to_string(),
        reward_xp: record.require_u32("REWARD_XP")?,
        reward_gold: record.require_u32("REWARD_GOLD")?,
        required_level,
        prerequisite,
    })
}

fn item_from_record(record: &Record) -> DataResult<Item> {
    log_unknown_keys(record, &ITEM_KEYS);

    let item_type: ItemType = record
        .require("TYPE")?
        .parse()
        .map_err(|e| DataError::InvalidFormat(format!("record at line {}: {}", record.line, e)))?;
    let effect: ItemEffect = record
        .require("EFFECT")?
        .parse()
        .map_err(|e| DataError::InvalidFormat(format!("record at line {}: {}", record.line, e)))?;

    Ok(Item {
        item_id: record.require_non_empty("ITEM_ID")?.to_string(),
        name: record.require("NAME")?.to_string(),
        item_type,
        effect,
        cost: record.require_u32("COST")?,
        description: record.require("DESCRIPTION")?.to_string(),
    })
}

/// Parses quest records from catalog text.
pub fn parse_quests(content: &str) -> DataResult<QuestCatalog> {
    let mut quests: Vec<Quest> = Vec::new();
    for record in parse_records(content)? {
        let quest = quest_from_record(&record)?;
        if quests.iter().any(|q| q.quest_id == quest.quest_id) {
            return Err(DataError::InvalidFormat(format!(
                "duplicate quest id '{}' at line {}",
                quest.quest_id, record.line
            )));
        }
        quests.push(quest);
    }
    Ok(QuestCatalog::from_quests(quests))
}

/// Parses item records from catalog text.
pub fn parse_items(content: &str) -> DataResult<ItemCatalog> {
    let mut items: Vec<Item> = Vec::new();
    for record in parse_records(content)? {
        let item = item_from_record(&record)?;
        if items.iter().any(|i| i.item_id == item.item_id) {
            return Err(DataError::InvalidFormat(format!(
                "duplicate item id '{}' at line {}",
                item.item_id, record.line
            )));
        }
        items.push(item);
    }
    Ok(ItemCatalog::from_items(items))
}

pub fn load_quests(path: &Path) -> DataResult<QuestCatalog> {
    let catalog = parse_quests(&read_catalog_file(path)?)?;
    tracing::debug!(path = %path.display(), count = catalog.len(), "loaded quests");
    Ok(catalog)
}

pub fn load_items(path: &Path) -> DataResult<ItemCatalog> {
    let catalog = parse_items(&read_catalog_file(path)?)?;
    tracing::debug!(path = %path.display(), count = catalog.len(), "loaded items");
    Ok(catalog)
}
