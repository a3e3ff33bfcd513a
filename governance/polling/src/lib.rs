#![deny(missing_docs)]
//! Governance poll ballots, vote breakdowns and vote payloads

pub mod analytics;
pub mod error;
pub mod export;
pub mod format;
pub mod instruction;
pub mod provider;
pub mod state;
pub mod tally;
pub mod view;

// Export the decimal type used for vote amounts for downstream users
pub use rust_decimal;
