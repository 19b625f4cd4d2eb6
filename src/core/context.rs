use crate::character_manager::CharacterManager;
use crate::core::config::GameConfig;
use crate::core::constants::{ITEMS_FILE, QUESTS_FILE};
use crate::core::error::GameResult;
use crate::data::{create_default_data_files, load_items, load_quests};
use crate::items::types::ItemCatalog;
use crate::quests::types::QuestCatalog;

/// Everything loaded once at startup and shared by the whole session.
pub struct GameContext {
    pub config: GameConfig,
    pub quests: QuestCatalog,
    pub items: ItemCatalog,
    pub characters: CharacterManager,
}

impl GameContext {
    /// Writes default catalogs if the data directory has none, loads both
    /// catalogs, checks quest prerequisites and opens the save directory.
    pub fn load(config: GameConfig) -> GameResult<Self> {
        create_default_data_files(&config.data_dir)?;

        let quests = load_quests(&config.data_dir.join(QUESTS_FILE))?;
        quests.validate_prerequisites()?;
        let items = load_items(&config.data_dir.join(ITEMS_FILE))?;
        let characters = CharacterManager::new(&config.save_dir)?;

        tracing::info!(
            quests = quests.len(),
            items = items.len(),
            save_dir = %config.save_dir.display(),
            "game data loaded"
        );

        Ok(Self {
            config,
            quests,
            items,
            characters,
        })
    }
}
