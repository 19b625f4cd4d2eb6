//! Enemy catalog and the turn-based battle engine.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
