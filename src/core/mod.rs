//! Shared constants, configuration, errors and the application context.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;

pub use config::GameConfig;
pub use context::GameContext;
pub use error::*;
