use std::path::{Path, PathBuf};

use crate::core::constants::DATA_HOME_DIR;
use crate::core::error::{SaveError, SaveResult};

/// Where saves and catalog files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub save_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl GameConfig {
    /// `~/.chronicles/saves` and `~/.chronicles/data`.
    pub fn new() -> SaveResult<Self> {
        let home_dir = dirs::home_dir().ok_or(SaveError::NoHomeDir)?;
        Ok(Self::with_root(home_dir.join(DATA_HOME_DIR)))
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            save_dir: root.join("saves"),
            data_dir: root.join("data"),
        }
    }

    /// Replaces whichever directories are given.
    pub fn with_overrides(mut self, save_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = save_dir {
            self.save_dir = dir;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}
