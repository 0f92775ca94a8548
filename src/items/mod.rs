//! Item system: types, name pools, generation, crafting, and equipment.

pub mod crafting;
pub mod equipment;
pub mod generation;
pub mod names;
pub mod types;

pub use crafting::*;
pub use equipment::*;
pub use generation::*;
pub use types::*;
