//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document storage layout configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding documents that have no external path.
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,
    /// Extension appended to the document id to form its default file name
    /// (without the leading dot).
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("./data/docs")
}

fn default_extension() -> String {
    crate::DEFAULT_DOC_EXTENSION.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            extension: default_extension(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.extension.is_empty() {
            return Err("storage.extension cannot be empty".to_string());
        }
        if self.extension.starts_with('.') {
            return Err(format!(
                "storage.extension must not include the leading dot: {:?}",
                self.extension
            ));
        }
        if self.extension.contains(['/', '\\']) {
            return Err(format!(
                "storage.extension must not contain path separators: {:?}",
                self.extension
            ));
        }
        Ok(())
    }
}

/// Home database configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database file.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Query timeout in seconds (advisory only - SQLite cannot force-cancel queries).
        #[serde(default = "default_sqlite_query_timeout_secs")]
        query_timeout_secs: Option<u64>,
    },
}

fn default_sqlite_query_timeout_secs() -> Option<u64> {
    Some(60)
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/home.db"),
            query_timeout_secs: default_sqlite_query_timeout_secs(),
        }
    }
}

/// Path cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Populate the cache from the home database when the storage manager starts.
    #[serde(default = "default_reconcile_on_startup")]
    pub reconcile_on_startup: bool,
    /// Maximum number of filesystem existence checks in flight during
    /// reconciliation and uncached-document scans.
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,
}

fn default_reconcile_on_startup() -> bool {
    true
}

fn default_probe_concurrency() -> usize {
    16
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reconcile_on_startup: default_reconcile_on_startup(),
            probe_concurrency: default_probe_concurrency(),
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.probe_concurrency == 0 {
            return Err("cache.probe_concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document storage layout.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Home database.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Path cache behaviour.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Validate every section, reporting the first failure.
    pub fn validate(&self) -> crate::Result<()> {
        self.storage.validate().map_err(crate::Error::Config)?;
        self.cache.validate().map_err(crate::Error::Config)?;
        Ok(())
    }
}
