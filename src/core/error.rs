//! Error types for every game subsystem.
//!
//! Each engine returns its own error enum so callers can match on the exact
//! failure. [`GameError`] wraps all of them for the context and the shell.

use std::path::PathBuf;
use thiserror::Error;

/// Failures tied to the character record itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CharacterError {
    #[error("invalid character class: {0}")]
    InvalidClass(String),

    #[error("invalid character name: {0}")]
    InvalidName(String),

    #[error("character '{0}' does not exist")]
    NotFound(String),

    #[error("{0} is dead")]
    Dead(String),

    #[error("level {required} required (current level {current})")]
    InsufficientLevel { required: u32, current: u32 },

    #[error("cannot apply {amount} gold to a balance of {balance}")]
    NegativeGold { balance: u32, amount: i64 },
}

pub type CharacterResult<T> = Result<T, CharacterError>;

/// Failures raised by the combat engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("unknown enemy type: {0}")]
    InvalidTarget(String),

    #[error("combat is not active")]
    NotActive,

    #[error("special ability is on cooldown for {turns_remaining} more turn(s)")]
    AbilityOnCooldown { turns_remaining: u32 },

    #[error(transparent)]
    Character(#[from] CharacterError),
}

pub type CombatResult<T> = Result<T, CombatError>;

/// Failures raised by quest transitions and catalog lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestError {
    #[error("quest '{0}' not found")]
    NotFound(String),

    #[error("requirements not met: {0}")]
    RequirementsNotMet(String),

    #[error("quest '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("quest '{0}' is not active")]
    NotActive(String),

    #[error("prerequisite chain of '{0}' loops back on itself")]
    PrerequisiteCycle(String),

    #[error(transparent)]
    Character(#[from] CharacterError),
}

pub type QuestResult<T> = Result<T, QuestError>;

/// Failures raised by inventory, equipment and shop operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("inventory is full ({capacity} items)")]
    Full { capacity: usize },

    #[error("item '{0}' not found in inventory")]
    ItemNotFound(String),

    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientResources { needed: u32, available: u32 },

    #[error("invalid item type: {0}")]
    InvalidItemType(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Failures raised while loading the quest and item catalogs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("data file unreadable: {0}")]
    Corrupted(String),

    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DataResult<T> = Result<T, DataError>;

/// Failures raised by the save directory.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file corrupted: {0}")]
    Corrupted(String),

    #[error("invalid save data: {0}")]
    InvalidData(String),

    #[error("save file '{file}' belongs to '{existing}'")]
    NameConflict { file: String, existing: String },

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error(transparent)]
    Character(#[from] CharacterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SaveResult<T> = Result<T, SaveError>;

/// Any error the game can produce.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Character(#[from] CharacterError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Quest(#[from] QuestError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

pub type GameResult<T> = Result<T, GameError>;
