//! Derived-value calculations for contract experience records.
//!
//! The derivation chain converts contract money into legal monthly minimum
//! wages (SMMLV) and back to present-day money. The expiration module
//! computes document expiration notices.

pub mod additions;
pub mod common;
pub mod derivation;
pub mod expiration;
pub mod wage_table;

pub use additions::AdditionList;
pub use derivation::{DerivationChain, compute};
pub use expiration::{
    ExpirationMonitor, ExpirationNotice, ExpirationStatus, FolderExpirationSummary,
    expiration_status,
};
pub use wage_table::{WageTable, amount_for_year, latest_amount};
