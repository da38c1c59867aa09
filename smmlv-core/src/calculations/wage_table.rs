//! Minimum-wage (SMMLV) table lookups.
//!
//! The table is the historical series of legal monthly minimum wages, one
//! entry per year. Lookups never fail: a missing year is `None` and an
//! empty table has a latest amount of zero, which callers read as
//! "no data yet".
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use smmlv_core::WageEntry;
//! use smmlv_core::calculations::WageTable;
//!
//! let table = WageTable::new(vec![
//!     WageEntry::new(2023, dec!(1160000)),
//!     WageEntry::new(2024, dec!(1300000)),
//! ]);
//!
//! assert_eq!(table.amount_for_year(2023), Some(dec!(1160000)));
//! assert_eq!(table.amount_for_year(2019), None);
//! assert_eq!(table.latest_amount(), dec!(1300000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::WageEntry;

/// Amount for exactly `year`. With duplicate years the first entry wins.
pub fn amount_for_year(
    table: &[WageEntry],
    year: i32,
) -> Option<Decimal> {
    table
        .iter()
        .find(|entry| entry.year == year)
        .map(|entry| entry.amount)
}

/// Entry with the greatest year. A later duplicate of that year does not
/// replace the first one found.
fn latest_entry(table: &[WageEntry]) -> Option<&WageEntry> {
    let mut latest: Option<&WageEntry> = None;
    for entry in table {
        match latest {
            Some(best) if entry.year <= best.year => {}
            _ => latest = Some(entry),
        }
    }
    latest
}

/// Amount of the most recent year in the table, or zero when it is empty.
pub fn latest_amount(table: &[WageEntry]) -> Decimal {
    latest_entry(table)
        .map(|entry| entry.amount)
        .unwrap_or(Decimal::ZERO)
}

/// Snapshot of the minimum-wage series used for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WageTable {
    entries: Vec<WageEntry>,
}

impl WageTable {
    pub fn new(entries: Vec<WageEntry>) -> Self {
        Self { entries }
    }

    /// Table used before reference data has arrived.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn amount_for_year(
        &self,
        year: i32,
    ) -> Option<Decimal> {
        amount_for_year(&self.entries, year)
    }

    /// The entry behind [`WageTable::latest_amount`], for display.
    pub fn latest_entry(&self) -> Option<&WageEntry> {
        latest_entry(&self.entries)
    }

    pub fn latest_amount(&self) -> Decimal {
        latest_amount(&self.entries)
    }
}

impl From<Vec<WageEntry>> for WageTable {
    fn from(entries: Vec<WageEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<WageEntry> for WageTable {
    fn from_iter<I: IntoIterator<Item = WageEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
