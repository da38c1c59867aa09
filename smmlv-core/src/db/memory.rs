//! In-process store backend (`memory`).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use super::factory::{StoreConfig, StoreFactory};
use super::repository::{ExperienceRepository, ExperienceStore, RepositoryError, WageRepository};
use crate::models::{ExperienceRecord, NewExperienceRecord, WageEntry};

/// Thread-safe store holding everything in memory. Record ids start at 1.
#[derive(Debug)]
pub struct MemoryStore {
    wages: RwLock<BTreeMap<i32, Decimal>>,
    experiences: RwLock<BTreeMap<i64, ExperienceRecord>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            wages: RwLock::new(BTreeMap::new()),
            experiences: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Store pre-populated with a wage series.
    pub fn with_wages(entries: &[WageEntry]) -> Self {
        let store = Self::new();
        if let Ok(mut wages) = store.wages.write() {
            wages.extend(entries.iter().map(|e| (e.year, e.amount)));
        }
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read()
        .map_err(|_| RepositoryError::Database("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write()
        .map_err(|_| RepositoryError::Database("store lock poisoned".to_string()))
}

#[async_trait]
impl WageRepository for MemoryStore {
    async fn list_wage_entries(&self) -> Result<Vec<WageEntry>, RepositoryError> {
        let wages = read(&self.wages)?;
        Ok(wages
            .iter()
            .map(|(year, amount)| WageEntry::new(*year, *amount))
            .collect())
    }

    async fn upsert_wage_entry(
        &self,
        entry: &WageEntry,
    ) -> Result<(), RepositoryError> {
        write(&self.wages)?.insert(entry.year, entry.amount);
        Ok(())
    }

    async fn delete_wage_entry(
        &self,
        year: i32,
    ) -> Result<(), RepositoryError> {
        write(&self.wages)?
            .remove(&year)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ExperienceRepository for MemoryStore {
    async fn create_experience(
        &self,
        record: NewExperienceRecord,
    ) -> Result<ExperienceRecord, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let stored = ExperienceRecord {
            id,
            details: record.details,
            inputs: record.inputs,
            derived: record.derived,
            created_at: now,
            updated_at: now,
        };
        write(&self.experiences)?.insert(id, stored.clone());
        debug!(id, "experience created");
        Ok(stored)
    }

    async fn get_experience(
        &self,
        id: i64,
    ) -> Result<ExperienceRecord, RepositoryError> {
        read(&self.experiences)?
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_experience(
        &self,
        record: &ExperienceRecord,
    ) -> Result<ExperienceRecord, RepositoryError> {
        let mut experiences = write(&self.experiences)?;
        let existing = experiences
            .get_mut(&record.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = ExperienceRecord {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..record.clone()
        };
        debug!(id = record.id, "experience updated");
        Ok(existing.clone())
    }

    async fn delete_experience(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        write(&self.experiences)?
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_experiences(&self) -> Result<Vec<ExperienceRecord>, RepositoryError> {
        Ok(read(&self.experiences)?.values().cloned().collect())
    }
}

/// Factory for the `memory` backend; the connection string is ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn ExperienceStore>, RepositoryError> {
        Ok(Box::new(MemoryStore::new()))
    }
}
