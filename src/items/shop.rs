use crate::character::types::Character;
use crate::core::constants::{MAX_INVENTORY_SIZE, SELL_PRICE_DIVISOR};
use crate::core::error::{InventoryError, InventoryResult};

use super::inventory::{add_item_to_inventory, inventory_space_remaining, remove_item_from_inventory};
use super::types::Item;

/// What the shop pays for an item.
pub fn sell_price(item: &Item) -> u32 {
    item.cost / SELL_PRICE_DIVISOR
}

/// Buys one unit of `item`. Requires enough gold and a free inventory slot.
pub fn purchase_item(character: &mut Character, item: &Item) -> InventoryResult<()> {
    if character.gold < item.cost {
        return Err(InventoryError::InsufficientResources {
            needed: item.cost,
            available: character.gold,
        });
    }
    if inventory_space_remaining(character) == 0 {
        return Err(InventoryError::Full {
            capacity: MAX_INVENTORY_SIZE,
        });
    }

    add_item_to_inventory(character, &item.item_id)?;
    character.gold -= item.cost;

    tracing::debug!(item = %item.item_id, cost = item.cost, gold = character.gold, "purchased");
    Ok(())
}

/// Sells one unit of `item` for half its cost. Returns the gold received.
pub fn sell_item(character: &mut Character, item: &Item) -> InventoryResult<u32> {
    remove_item_from_inventory(character, &item.item_id)?;

    let price = sell_price(item);
    character.gold = character.gold.saturating_add(price);

    tracing::debug!(item = %item.item_id, price, gold = character.gold, "sold");
    Ok(price)
}
