//! Store selection by backend name.
//!
//! The binary reads a [`StoreConfig`] and asks a [`StoreRegistry`] to open
//! the matching backend. Only `memory` ships with this crate.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::MemoryStoreFactory;
use super::repository::{ExperienceStore, RepositoryError};

/// `[store]` table of the configuration file.
///
/// `connection_string` is handed to the backend untouched; `memory` ignores
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens one kind of store.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Name matched against [`StoreConfig::backend`].
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn ExperienceStore>, RepositoryError>;
}

/// Known backends, ordered by name.
#[derive(Default)]
pub struct StoreRegistry {
    factories: BTreeMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    /// Registry with every backend shipped in this crate.
    pub fn builtin() -> Self {
        Self::default().with(Box::new(MemoryStoreFactory))
    }

    /// Adds `factory`, replacing a previous one with the same name.
    pub fn with(
        mut self,
        factory: Box<dyn StoreFactory>,
    ) -> Self {
        self.factories.insert(factory.backend_name(), factory);
        self
    }

    pub fn backends(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Opens the backend named by `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] for an unknown backend; the
    ///   message names the requested and the available backends.
    /// * Whatever the backend's factory returns.
    pub async fn open(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn ExperienceStore>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            let known: Vec<&str> = self.backends().collect();
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {}",
                config.backend,
                known.join(", ")
            )));
        };
        debug!(backend = factory.backend_name(), "opening store");
        factory.create(config).await
    }
}
