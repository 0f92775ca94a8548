//! Player records and the XP/currency ledger.

pub mod ledger;
pub mod types;

pub use ledger::*;
pub use types::*;
