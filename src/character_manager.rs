//! JSON persistence for characters, one file per character in a save
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::character::types::{validate_name, Character, CharacterClass};
use crate::core::constants::{SAVE_EXTENSION, SAVE_VERSION};
use crate::core::error::{CharacterError, SaveError, SaveResult};

#[derive(Clone, Serialize, Deserialize)]
struct CharacterSaveData {
    version: u32,
    last_save_time: i64,
    #[serde(flatten)]
    character: Character,
}

/// One entry of the save directory listing.
#[derive(Debug, Clone)]
pub struct CharacterInfo {
    pub name: String,
    pub filename: String,
    pub class: Option<CharacterClass>,
    pub level: u32,
    pub last_save_time: i64,
    pub is_corrupted: bool,
}

pub struct CharacterManager {
    save_dir: PathBuf,
}

impl CharacterManager {
    /// Opens `save_dir`, creating it if missing.
    pub fn new(save_dir: impl Into<PathBuf>) -> SaveResult<Self> {
        let save_dir = save_dir.into();
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir })
    }

    #[cfg(test)]
    fn new_for_test() -> SaveResult<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(std::env::temp_dir().join(format!(
            "chronicles-saves-{}-{}",
            std::process::id(),
            test_id
        )))
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    fn path_for(&self, name: &str) -> SaveResult<PathBuf> {
        validate_name(name).map_err(CharacterError::InvalidName)?;
        Ok(self
            .save_dir
            .join(format!("{}.{}", sanitize_name(name), SAVE_EXTENSION)))
    }

    /// Writes `character` to `<save_dir>/<sanitized name>.json`, replacing any
    /// earlier save of the same character. Returns the file written.
    ///
    /// Names that sanitize to the same file ("Hero" and "hero") are different
    /// characters; saving over another character's file fails with
    /// `NameConflict`. An unreadable file at that path is overwritten.
    pub fn save_character(&self, character: &Character) -> SaveResult<PathBuf> {
        character.validate().map_err(SaveError::InvalidData)?;
        let path = self.path_for(&character.name)?;
        if let Some(existing) = stored_name(&path) {
            if existing != character.name {
                return Err(name_conflict(&path, existing));
            }
        }

        let save_data = CharacterSaveData {
            version: SAVE_VERSION,
            last_save_time: Utc::now().timestamp(),
            character: character.clone(),
        };
        let json = serde_json::to_string_pretty(&save_data)
            .map_err(|e| SaveError::InvalidData(e.to_string()))?;

        fs::write(&path, json)?;

        tracing::info!(name = %character.name, path = %path.display(), "character saved");
        Ok(path)
    }

    pub fn character_exists(&self, name: &str) -> bool {
        self.path_for(name).map(|path| path.is_file()).unwrap_or(false)
    }

    pub fn load_character(&self, name: &str) -> SaveResult<Character> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(CharacterError::NotFound(name.trim().to_string()).into());
        }
        let save_data = read_save_file(&path)?;
        if !same_name(&save_data.character.name, name) {
            return Err(name_conflict(&path, save_data.character.name));
        }

        tracing::info!(name = %save_data.character.name, "character loaded");
        Ok(save_data.character)
    }

    pub fn delete_character(&self, name: &str) -> SaveResult<()> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(CharacterError::NotFound(name.trim().to_string()).into());
        }
        if let Some(existing) = stored_name(&path) {
            if !same_name(&existing, name) {
                return Err(name_conflict(&path, existing));
            }
        }
        fs::remove_file(&path)?;

        tracing::info!(name = %name.trim(), "character deleted");
        Ok(())
    }

    /// Every save in the directory, most recently saved first. Files that
    /// fail to load are listed with `is_corrupted` set.
    pub fn list_characters(&self) -> SaveResult<Vec<CharacterInfo>> {
        let mut characters = Vec::new();

        for entry in fs::read_dir(&self.save_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            match read_save_file(&path) {
                Ok(save_data) => characters.push(CharacterInfo {
                    name: save_data.character.name,
                    filename,
                    class: Some(save_data.character.class),
                    level: save_data.character.level,
                    last_save_time: save_data.last_save_time,
                    is_corrupted: false,
                }),
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "unreadable save file");
                    characters.push(CharacterInfo {
                        name: "[CORRUPTED]".to_string(),
                        filename,
                        class: None,
                        level: 0,
                        last_save_time: 0,
                        is_corrupted: true,
                    });
                }
            }
        }

        characters.sort_by(|a, b| b.last_save_time.cmp(&a.last_save_time));
        Ok(characters)
    }
}

fn read_save_file(path: &Path) -> SaveResult<CharacterSaveData> {
    let json = fs::read_to_string(path)?;
    let save_data: CharacterSaveData = serde_json::from_str(&json).map_err(|e| match e.classify() {
        Category::Syntax | Category::Eof => SaveError::Corrupted(e.to_string()),
        Category::Data => SaveError::InvalidData(e.to_string()),
        Category::Io => SaveError::Io(e.into()),
    })?;

    if save_data.version > SAVE_VERSION {
        return Err(SaveError::InvalidData(format!(
            "unsupported save version {}",
            save_data.version
        )));
    }
    save_data
        .character
        .validate()
        .map_err(SaveError::InvalidData)?;

    Ok(save_data)
}

/// Name of the character stored at `path`, if the file loads.
fn stored_name(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    read_save_file(path).ok().map(|save_data| save_data.character.name)
}

/// Lookups by name ignore case and surrounding spaces.
fn same_name(stored: &str, requested: &str) -> bool {
    stored.trim().to_lowercase() == requested.trim().to_lowercase()
}

fn name_conflict(path: &Path, existing: String) -> SaveError {
    SaveError::NameConflict {
        file: path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
        existing,
    }
}

/// File stem for a character name: lowercase, spaces as underscores.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
