use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use smmlv_core::{RepositoryError, WageEntry, WageRepository};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading minimum-wage data.
#[derive(Debug, Error)]
pub enum WageTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("year {0} appears more than once")]
    DuplicateYear(i32),

    #[error("minimum wage for {year} must be positive, got {amount}")]
    InvalidAmount { year: i32, amount: Decimal },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for WageTableLoaderError {
    fn from(err: csv::Error) -> Self {
        WageTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the wage CSV file.
///
/// - `year`: calendar year (e.g., 2024)
/// - `amount`: legal monthly minimum wage in pesos (e.g., 1300000)
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct WageRecord {
    year: i32,
    amount: Decimal,
}

/// Loader for the minimum-wage series.
pub struct WageTableLoader;

impl WageTableLoader {
    /// Parse and validate wage entries from any reader.
    ///
    /// Rows are returned in file order. Years must be unique and amounts
    /// positive.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<WageEntry>, WageTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for result in csv_reader.deserialize() {
            let record: WageRecord = result?;
            if record.amount <= Decimal::ZERO {
                return Err(WageTableLoaderError::InvalidAmount {
                    year: record.year,
                    amount: record.amount,
                });
            }
            if !seen.insert(record.year) {
                return Err(WageTableLoaderError::DuplicateYear(record.year));
            }
            entries.push(WageEntry::new(record.year, record.amount));
        }

        Ok(entries)
    }

    pub fn parse_file(path: &Path) -> Result<Vec<WageEntry>, WageTableLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| WageTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(file)
    }

    /// Upsert every entry into the repository; returns how many were written.
    ///
    /// Loading the same file twice leaves the repository unchanged.
    pub async fn load<R: WageRepository + ?Sized>(
        repo: &R,
        entries: &[WageEntry],
    ) -> Result<usize, WageTableLoaderError> {
        for entry in entries {
            repo.upsert_wage_entry(entry).await?;
        }
        info!(entries = entries.len(), "minimum wage table loaded");
        Ok(entries.len())
    }
}
