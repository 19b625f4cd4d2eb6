//! Item system: catalog types, inventory and equipment, shop.

pub mod inventory;
pub mod shop;
pub mod types;

pub use inventory::*;
pub use shop::*;
pub use types::*;
