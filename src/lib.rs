//! Quest Chronicles - text-based RPG library
//!
//! Character records, turn-based combat, quests, inventory and shop, plus
//! JSON persistence and catalog loading. The binary wraps these in a menu
//! shell.

pub mod character;
pub mod character_manager;
pub mod combat;
pub mod core;
pub mod data;
pub mod items;
pub mod quests;
pub mod shell;

pub use character::{Character, CharacterClass};
pub use character_manager::CharacterManager;
pub use crate::core::{GameConfig, GameContext, GameError, GameResult};
