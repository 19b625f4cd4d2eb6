//! Quest definitions and the quest lifecycle.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
