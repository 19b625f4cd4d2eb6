//! Inventory list operations, consumables and equipment slots.
//!
//! Every operation checks all of its preconditions before touching the
//! character, so a failed call leaves the record unchanged.

use crate::character::types::{Character, EquippedItem};
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::core::error::{InventoryError, InventoryResult};

use super::types::{Item, ItemCatalog, ItemEffect, ItemType, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    fn item_type(&self) -> ItemType {
        match self {
            EquipmentSlot::Weapon => ItemType::Weapon,
            EquipmentSlot::Armor => ItemType::Armor,
        }
    }

    fn slot_mut<'a>(&self, character: &'a mut Character) -> &'a mut Option<EquippedItem> {
        match self {
            EquipmentSlot::Weapon => &mut character.equipped_weapon,
            EquipmentSlot::Armor => &mut character.equipped_armor,
        }
    }
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn inventory_space_remaining(character: &Character) -> usize {
    MAX_INVENTORY_SIZE.saturating_sub(character.inventory.len())
}

fn ensure_space(character: &Character) -> InventoryResult<()> {
    if inventory_space_remaining(character) == 0 {
        return Err(InventoryError::Full {
            capacity: MAX_INVENTORY_SIZE,
        });
    }
    Ok(())
}

fn ensure_present(character: &Character, item_id: &str) -> InventoryResult<usize> {
    character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| InventoryError::ItemNotFound(item_id.to_string()))
}

pub fn add_item_to_inventory(character: &mut Character, item_id: &str) -> InventoryResult<()> {
    ensure_space(character)?;
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Removes a single unit of `item_id`.
pub fn remove_item_from_inventory(character: &mut Character, item_id: &str) -> InventoryResult<()> {
    let index = ensure_present(character, item_id)?;
    character.inventory.remove(index);
    Ok(())
}

/// Empties the inventory and returns what was in it.
pub fn clear_inventory(character: &mut Character) -> Vec<String> {
    std::mem::take(&mut character.inventory)
}

/// Applies a stat change and returns the change actually made.
///
/// Health stays within `0..=max_health`; max health never drops below 1 and
/// pulls health down with it; strength and magic floor at 0.
pub fn apply_stat_effect(character: &mut Character, effect: ItemEffect) -> i64 {
    apply_stat_change(character, effect.stat, i64::from(effect.value))
}

fn apply_stat_change(character: &mut Character, stat: Stat, delta: i64) -> i64 {
    let shift = |current: u32, floor: i64, ceiling: i64| -> u32 {
        (i64::from(current) + delta).clamp(floor, ceiling) as u32
    };

    match stat {
        Stat::Health => {
            let before = character.health;
            character.health = shift(before, 0, i64::from(character.max_health));
            i64::from(character.health) - i64::from(before)
        }
        Stat::MaxHealth => {
            let before = character.max_health;
            character.max_health = shift(before, 1, i64::from(u32::MAX));
            character.health = character.health.min(character.max_health);
            i64::from(character.max_health) - i64::from(before)
        }
        Stat::Strength => {
            let before = character.strength;
            character.strength = shift(before, 0, i64::from(u32::MAX));
            i64::from(character.strength) - i64::from(before)
        }
        Stat::Magic => {
            let before = character.magic;
            character.magic = shift(before, 0, i64::from(u32::MAX));
            i64::from(character.magic) - i64::from(before)
        }
    }
}

/// Applies an equipment effect and returns the bonus to store in the slot:
/// the change actually made, not the item's nominal value.
fn apply_bonus(character: &mut Character, effect: ItemEffect) -> ItemEffect {
    let applied = apply_stat_effect(character, effect);
    // The clamped change never exceeds the nominal one in magnitude.
    let value = i32::try_from(applied).unwrap_or(effect.value);
    ItemEffect::new(effect.stat, value)
}

/// Undoes a stored bonus. Taking off a health bonus never drops a living
/// character below 1 health.
fn revert_bonus(character: &mut Character, bonus: ItemEffect) {
    let mut delta = -i64::from(bonus.value);
    if bonus.stat == Stat::Health && character.health > 0 {
        delta = delta.max(1 - i64::from(character.health));
    }
    apply_stat_change(character, bonus.stat, delta);
}

/// Uses one unit of a consumable and applies its effect.
pub fn use_item(character: &mut Character, item: &Item) -> InventoryResult<i64> {
    let index = ensure_present(character, &item.item_id)?;
    if item.item_type != ItemType::Consumable {
        return Err(InventoryError::InvalidItemType(format!(
            "{} is a {}, only consumables can be used",
            item.name, item.item_type
        )));
    }

    let change = apply_stat_effect(character, item.effect);
    character.inventory.remove(index);

    tracing::debug!(item = %item.item_id, change, "used item");
    Ok(change)
}

pub fn equip_weapon(character: &mut Character, item: &Item) -> InventoryResult<()> {
    equip(character, item, EquipmentSlot::Weapon)
}

pub fn equip_armor(character: &mut Character, item: &Item) -> InventoryResult<()> {
    equip(character, item, EquipmentSlot::Armor)
}

/// Moves an item from the inventory into its slot.
///
/// Whatever was in the slot goes back to the inventory with its bonus
/// reverted. The swap frees the new item's space first, so it never overflows.
/// The slot records the change actually applied, so unequipping restores the
/// stats exactly even when the effect was clamped.
fn equip(character: &mut Character, item: &Item, slot: EquipmentSlot) -> InventoryResult<()> {
    let index = ensure_present(character, &item.item_id)?;
    if item.item_type != slot.item_type() {
        return Err(InventoryError::InvalidItemType(format!(
            "{} is a {}, not a {}",
            item.name,
            item.item_type,
            slot.item_type()
        )));
    }

    character.inventory.remove(index);
    if let Some(previous) = slot.slot_mut(character).take() {
        revert_bonus(character, previous.bonus);
        character.inventory.push(previous.item_id);
    }

    let bonus = apply_bonus(character, item.effect);
    *slot.slot_mut(character) = Some(EquippedItem {
        item_id: item.item_id.clone(),
        bonus,
    });

    tracing::debug!(item = %item.item_id, ?slot, "equipped");
    Ok(())
}

pub fn unequip_weapon(character: &mut Character) -> InventoryResult<String> {
    unequip(character, EquipmentSlot::Weapon)
}

pub fn unequip_armor(character: &mut Character) -> InventoryResult<String> {
    unequip(character, EquipmentSlot::Armor)
}

/// Returns the equipped item to the inventory and reverts its bonus.
fn unequip(character: &mut Character, slot: EquipmentSlot) -> InventoryResult<String> {
    let Some(previous) = slot.slot_mut(character).clone() else {
        return Err(InventoryError::ItemNotFound(format!(
            "no {} equipped",
            slot.item_type()
        )));
    };
    ensure_space(character)?;

    *slot.slot_mut(character) = None;
    revert_bonus(character, previous.bonus);
    character.inventory.push(previous.item_id.clone());

    Ok(previous.item_id)
}

/// One display row per distinct item, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLine {
    pub item_id: String,
    pub name: String,
    pub quantity: usize,
    pub item_type: Option<ItemType>,
}

pub fn inventory_summary(character: &Character, catalog: &ItemCatalog) -> Vec<InventoryLine> {
    let mut lines: Vec<InventoryLine> = Vec::new();

    for item_id in &character.inventory {
        if let Some(line) = lines.iter_mut().find(|l| &l.item_id == item_id) {
            line.quantity += 1;
            continue;
        }
        let item = catalog.get(item_id);
        lines.push(InventoryLine {
            item_id: item_id.clone(),
            name: item.map_or_else(|| item_id.clone(), |i| i.name.clone()),
            quantity: 1,
            item_type: item.map(|i| i.item_type),
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::CharacterClass;

    fn hero() -> Character {
        Character::new("Hero", CharacterClass::Warrior).unwrap()
    }

    fn item(id: &str, item_type: ItemType, effect: ItemEffect) -> Item {
        Item {
            item_id: id.to_string(),
            name: id.to_string(),
            item_type,
            effect,
            cost: 10,
            description: String::new(),
        }
    }

    fn potion() -> Item {
        item(
            "health_potion",
            ItemType::Consumable,
            ItemEffect::new(Stat::Health, 20),
        )
    }

    fn sword() -> Item {
        item(
            "iron_sword",
            ItemType::Weapon,
            ItemEffect::new(Stat::Strength, 5),
        )
    }

    #[test]
    fn test_add_and_remove() {
        let mut c = hero();
        add_item_to_inventory(&mut c, "health_potion").unwrap();
        add_item_to_inventory(&mut c, "health_potion").unwrap();
        assert_eq!(count_item(&c, "health_potion"), 2);

        remove_item_from_inventory(&mut c, "health_potion").unwrap();
        assert_eq!(count_item(&c, "health_potion"), 1);
        assert!(has_item(&c, "health_potion"));
    }

    #[test]
    fn test_remove_missing_item() {
        let mut c = hero();
        assert_eq!(
            remove_item_from_inventory(&mut c, "ghost"),
            Err(InventoryError::ItemNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_inventory_full() {
        let mut c = hero();
        for _ in 0..MAX_INVENTORY_SIZE {
            add_item_to_inventory(&mut c, "rock").unwrap();
        }
        assert_eq!(inventory_space_remaining(&c), 0);
        assert_eq!(
            add_item_to_inventory(&mut c, "rock"),
            Err(InventoryError::Full {
                capacity: MAX_INVENTORY_SIZE
            })
        );
        assert_eq!(c.inventory.len(), MAX_INVENTORY_SIZE);
    }

    #[test]
    fn test_clear_inventory() {
        let mut c = hero();
        c.inventory = vec!["a".to_string(), "b".to_string()];
        assert_eq!(clear_inventory(&mut c).len(), 2);
        assert!(c.inventory.is_empty());
    }

    #[test]
    fn test_use_potion_heals_and_consumes() {
        let mut c = hero();
        c.health = 50;
        c.inventory.push("health_potion".to_string());

        assert_eq!(use_item(&mut c, &potion()), Ok(20));
        assert_eq!(c.health, 70);
        assert!(!has_item(&c, "health_potion"));
    }

    #[test]
    fn test_use_potion_caps_at_max_health() {
        let mut c = hero();
        c.health = c.max_health - 5;
        c.inventory.push("health_potion".to_string());
        assert_eq!(use_item(&mut c, &potion()), Ok(5));
        assert_eq!(c.health, c.max_health);
    }

    #[test]
    fn test_use_non_consumable_fails_without_change() {
        let mut c = hero();
        c.inventory.push("iron_sword".to_string());
        let before = c.clone();
        assert!(matches!(
            use_item(&mut c, &sword()),
            Err(InventoryError::InvalidItemType(_))
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn test_use_missing_item() {
        let mut c = hero();
        assert!(matches!(
            use_item(&mut c, &potion()),
            Err(InventoryError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_equip_weapon_applies_bonus() {
        let mut c = hero();
        c.inventory.push("iron_sword".to_string());

        equip_weapon(&mut c, &sword()).unwrap();
        assert_eq!(c.strength, 20);
        assert_eq!(
            c.equipped_weapon.as_ref().map(|e| e.item_id.as_str()),
            Some("iron_sword")
        );
        assert!(!has_item(&c, "iron_sword"));
    }

    #[test]
    fn test_equip_weapon_swaps_previous() {
        let mut c = hero();
        let axe = item("war_axe", ItemType::Weapon, ItemEffect::new(Stat::Strength, 8));
        c.inventory.push("iron_sword".to_string());
        c.inventory.push("war_axe".to_string());

        equip_weapon(&mut c, &sword()).unwrap();
        equip_weapon(&mut c, &axe).unwrap();

        assert_eq!(c.strength, 15 + 8);
        assert!(has_item(&c, "iron_sword"));
        assert!(!has_item(&c, "war_axe"));
        assert_eq!(c.equipped_weapon.unwrap().item_id, "war_axe");
    }

    #[test]
    fn test_equip_wrong_type() {
        let mut c = hero();
        c.inventory.push("health_potion".to_string());
        assert!(matches!(
            equip_weapon(&mut c, &potion()),
            Err(InventoryError::InvalidItemType(_))
        ));
        assert!(matches!(
            equip_armor(&mut c, &sword()),
            Err(InventoryError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_equip_armor_raises_max_health() {
        let mut c = hero();
        let mail = item("chain_mail", ItemType::Armor, ItemEffect::new(Stat::MaxHealth, 15));
        c.inventory.push("chain_mail".to_string());

        equip_armor(&mut c, &mail).unwrap();
        assert_eq!(c.max_health, 135);
        assert_eq!(c.health, 120);

        assert_eq!(unequip_armor(&mut c), Ok("chain_mail".to_string()));
        assert_eq!(c.max_health, 120);
        assert!(c.equipped_armor.is_none());
        assert!(has_item(&c, "chain_mail"));
    }

    #[test]
    fn test_clamped_weapon_penalty_restores_exactly() {
        let mut c = hero();
        let cursed = item("cursed_blade", ItemType::Weapon, ItemEffect::new(Stat::Strength, -20));
        c.inventory.push("cursed_blade".to_string());

        for _ in 0..3 {
            equip_weapon(&mut c, &cursed).unwrap();
            assert_eq!(c.strength, 0);
            assert_eq!(c.equipped_weapon.as_ref().map(|e| e.bonus.value), Some(-15));
            unequip_weapon(&mut c).unwrap();
            assert_eq!(c.strength, 15);
        }
    }

    #[test]
    fn test_health_armor_at_full_health_takes_nothing_back() {
        let mut c = hero();
        let charm = item("vital_charm", ItemType::Armor, ItemEffect::new(Stat::Health, 50));
        c.inventory.push("vital_charm".to_string());

        equip_armor(&mut c, &charm).unwrap();
        assert_eq!(c.health, 120);
        assert_eq!(c.equipped_armor.as_ref().map(|e| e.bonus.value), Some(0));

        unequip_armor(&mut c).unwrap();
        assert_eq!(c.health, 120);
        assert_eq!(c.max_health, 120);
    }

    #[test]
    fn test_removing_health_armor_never_kills() {
        let mut c = hero();
        c.health = 20;
        let charm = item("vital_charm", ItemType::Armor, ItemEffect::new(Stat::Health, 50));
        c.inventory.push("vital_charm".to_string());

        equip_armor(&mut c, &charm).unwrap();
        assert_eq!(c.health, 70);
        c.health = 10;

        unequip_armor(&mut c).unwrap();
        assert_eq!(c.health, 1);
        assert!(!c.is_dead());
    }

    #[test]
    fn test_extreme_negative_effect_unequips_cleanly() {
        let mut c = hero();
        let doom = item("doom_blade", ItemType::Weapon, ItemEffect::new(Stat::Strength, i32::MIN));
        c.inventory.push("doom_blade".to_string());

        equip_weapon(&mut c, &doom).unwrap();
        assert_eq!(c.strength, 0);
        assert_eq!(unequip_weapon(&mut c), Ok("doom_blade".to_string()));
        assert_eq!(c.strength, 15);
    }

    #[test]
    fn test_swapping_clamped_weapons_keeps_base_strength() {
        let mut c = hero();
        let cursed = item("cursed_blade", ItemType::Weapon, ItemEffect::new(Stat::Strength, -20));
        c.inventory.push("cursed_blade".to_string());
        c.inventory.push("iron_sword".to_string());

        equip_weapon(&mut c, &cursed).unwrap();
        equip_weapon(&mut c, &sword()).unwrap();
        assert_eq!(c.strength, 20);
        unequip_weapon(&mut c).unwrap();
        assert_eq!(c.strength, 15);
    }

    #[test]
    fn test_unequip_requires_space() {
        let mut c = hero();
        c.inventory.push("iron_sword".to_string());
        equip_weapon(&mut c, &sword()).unwrap();
        c.inventory = vec!["rock".to_string(); MAX_INVENTORY_SIZE];

        assert!(matches!(
            unequip_weapon(&mut c),
            Err(InventoryError::Full { .. })
        ));
        assert_eq!(c.strength, 20);
        assert!(c.equipped_weapon.is_some());
    }

    #[test]
    fn test_unequip_empty_slot() {
        let mut c = hero();
        assert!(matches!(
            unequip_weapon(&mut c),
            Err(InventoryError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_negative_effects_respect_floors() {
        let mut c = hero();
        assert_eq!(apply_stat_effect(&mut c, ItemEffect::new(Stat::Strength, -100)), -15);
        assert_eq!(c.strength, 0);

        apply_stat_effect(&mut c, ItemEffect::new(Stat::MaxHealth, -500));
        assert_eq!(c.max_health, 1);
        assert_eq!(c.health, 1);
    }

    #[test]
    fn test_inventory_summary_groups_items() {
        let mut c = hero();
        c.inventory = vec![
            "health_potion".to_string(),
            "mystery".to_string(),
            "health_potion".to_string(),
        ];
        let catalog = ItemCatalog::from_items(vec![potion()]);

        let lines = inventory_summary(&c, &catalog);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_id, "health_potion");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].item_type, Some(ItemType::Consumable));
        assert_eq!(lines[1].name, "mystery");
        assert_eq!(lines[1].item_type, None);
    }
}
