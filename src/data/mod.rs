//! Quest and item catalogs stored as flat `KEY: value` text files.

pub mod defaults;
pub mod loader;
pub mod parser;

pub use defaults::create_default_data_files;
pub use loader::{load_items, load_quests, parse_items, parse_quests};
