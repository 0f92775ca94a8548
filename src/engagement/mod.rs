//! Engagement metric validation and XP conversion.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
