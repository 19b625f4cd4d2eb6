use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::error::InventoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(ItemType::Weapon),
            "armor" => Ok(ItemType::Armor),
            "consumable" => Ok(ItemType::Consumable),
            other => Err(InventoryError::InvalidItemType(format!(
                "unknown item type '{}'",
                other
            ))),
        }
    }
}

/// Character stats an item effect can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl Stat {
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}

impl FromStr for Stat {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "health" => Ok(Stat::Health),
            "max_health" => Ok(Stat::MaxHealth),
            "strength" => Ok(Stat::Strength),
            "magic" => Ok(Stat::Magic),
            other => Err(InventoryError::InvalidItemType(format!(
                "unknown stat '{}' in effect",
                other
            ))),
        }
    }
}

/// A `stat:delta` effect such as `health:20` or `strength:5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub stat: Stat,
    pub value: i32,
}

impl ItemEffect {
    pub fn new(stat: Stat, value: i32) -> Self {
        Self { stat, value }
    }

    /// The opposite change. `i32::MIN` saturates to `i32::MAX`.
    pub fn reversed(&self) -> Self {
        Self {
            stat: self.stat,
            value: self.value.saturating_neg(),
        }
    }
}

impl fmt::Display for ItemEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat.name(), self.value)
    }
}

impl FromStr for ItemEffect {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, value) = s
            .split_once(':')
            .ok_or_else(|| InventoryError::InvalidItemType(format!("invalid effect '{}'", s)))?;
        let value = value.trim().parse::<i32>().map_err(|_| {
            InventoryError::InvalidItemType(format!("effect value in '{}' must be an integer", s))
        })?;

        Ok(Self {
            stat: stat.parse()?,
            value,
        })
    }
}

/// Parses an effect string of the form `stat:value`.
pub fn parse_item_effect(effect: &str) -> Result<ItemEffect, InventoryError> {
    effect.parse()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: String,
    pub name: String,
    pub item_type: ItemType,
    pub effect: ItemEffect,
    pub cost: u32,
    pub description: String,
}

/// All items known to the game, keyed by id. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.item_id.clone(), item))
                .collect(),
        }
    }

    pub fn get(&self, item_id: &str) -> Option<&Item> {
        self.items.get(item_id)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
