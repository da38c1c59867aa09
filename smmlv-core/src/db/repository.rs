use async_trait::async_trait;
use thiserror::Error;

use crate::calculations::WageTable;
use crate::models::{ExperienceRecord, NewExperienceRecord, WageEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Reference data provider for the minimum-wage series.
#[async_trait]
pub trait WageRepository: Send + Sync {
    async fn list_wage_entries(&self) -> Result<Vec<WageEntry>, RepositoryError>;

    /// Inserts the entry or replaces the amount of an existing year.
    async fn upsert_wage_entry(
        &self,
        entry: &WageEntry,
    ) -> Result<(), RepositoryError>;

    async fn delete_wage_entry(
        &self,
        year: i32,
    ) -> Result<(), RepositoryError>;
}

/// Record store for finished experience records.
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create_experience(
        &self,
        record: NewExperienceRecord,
    ) -> Result<ExperienceRecord, RepositoryError>;

    async fn get_experience(
        &self,
        id: i64,
    ) -> Result<ExperienceRecord, RepositoryError>;

    async fn update_experience(
        &self,
        record: &ExperienceRecord,
    ) -> Result<ExperienceRecord, RepositoryError>;

    async fn delete_experience(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError>;

    async fn list_experiences(&self) -> Result<Vec<ExperienceRecord>, RepositoryError>;
}

/// A backend that serves both reference data and records.
pub trait ExperienceStore: WageRepository + ExperienceRepository {}

impl<T: WageRepository + ExperienceRepository + ?Sized> ExperienceStore for T {}

/// Fetches the wage series into a snapshot for the derivation chain.
pub async fn load_wage_table<R: WageRepository + ?Sized>(
    repo: &R,
) -> Result<WageTable, RepositoryError> {
    let entries = repo.list_wage_entries().await?;
    tracing::debug!(entries = entries.len(), "wage table loaded");
    Ok(WageTable::new(entries))
}
