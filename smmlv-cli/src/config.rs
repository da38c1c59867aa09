//! TOML configuration for the `smmlv` binary.
//!
//! Every table and key is optional:
//!
//! ```toml
//! [store]
//! backend = "memory"
//! connection_string = ":memory:"
//!
//! [reference]
//! wages_csv = "data/wages.csv"
//!
//! [logging]
//! level = "info"
//! file = "smmlv.log"
//!
//! [expirations]
//! window_days = 30
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smmlv_core::db::StoreConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub reference: ReferenceConfig,
    pub logging: LoggingConfig,
    pub expirations: ExpirationConfig,
}

/// Where the minimum-wage series comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub wages_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Append log records to this file in addition to stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpirationConfig {
    pub window_days: i64,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self { window_days: 30 }
    }
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads `path` when given; no path means all defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.expirations.window_days, 30);
        assert_eq!(config.reference.wages_csv, None);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [reference]
            wages_csv = "data/wages.csv"

            [logging]
            file = "smmlv.log"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.reference.wages_csv,
            Some(PathBuf::from("data/wages.csv"))
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("smmlv.log")));
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = AppConfig::from_toml_str("[expirations]\nwindow_days = \"soon\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = AppConfig::load(Some(Path::new("/no/such/smmlv.toml")));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
