//! The character record and its progression rules.

pub mod progression;
pub mod types;

pub use progression::*;
pub use types::*;
