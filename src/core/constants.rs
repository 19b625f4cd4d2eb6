// Character creation
pub const STARTING_GOLD: u32 = 100;
pub const MAX_NAME_LENGTH: usize = 16;

// XP and leveling
pub const XP_PER_LEVEL: u32 = 100;
pub const LEVEL_UP_MAX_HEALTH: u32 = 10;
pub const LEVEL_UP_STRENGTH: u32 = 2;
pub const LEVEL_UP_MAGIC: u32 = 2;

// Combat
pub const MAX_BATTLE_ROUNDS: u32 = 500;
pub const ESCAPE_CHANCE: f64 = 0.5;
pub const MIN_DAMAGE: u32 = 1;
pub const DEFENSE_DIVISOR: u32 = 4;
pub const BATTLE_LOG_CAPACITY: usize = 10;
pub const ABILITY_COOLDOWN_TURNS: u32 = 3;

// Special abilities
pub const POWER_STRIKE_MULTIPLIER: u32 = 2;
pub const FIREBALL_MULTIPLIER: u32 = 2;
pub const CRITICAL_STRIKE_MULTIPLIER: u32 = 3;
pub const CRITICAL_STRIKE_CHANCE: f64 = 0.5;
pub const CLERIC_HEAL_AMOUNT: u32 = 30;

// Enemy level brackets (inclusive upper bounds)
pub const GOBLIN_MAX_LEVEL: u32 = 2;
pub const ORC_MAX_LEVEL: u32 = 5;

// Inventory and shop
pub const MAX_INVENTORY_SIZE: usize = 20;
pub const SELL_PRICE_DIVISOR: u32 = 2;

// Persistence
pub const SAVE_VERSION: u32 = 1;
pub const SAVE_EXTENSION: &str = "json";
pub const QUESTS_FILE: &str = "quests.txt";
pub const ITEMS_FILE: &str = "items.txt";
pub const DATA_HOME_DIR: &str = ".chronicles";

// Catalog files
pub const NO_PREREQUISITE: &str = "NONE";
