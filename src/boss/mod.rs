//! Shared boss encounters: answer scoring, HP ledger, and tiered rewards.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
