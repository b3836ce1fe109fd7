//! Document storage layer for docshelf.
//!
//! This crate provides:
//! - The default, configuration-derived document layout
//! - A filesystem existence probe
//! - The in-memory path cache and its reconciliation with the home database
//! - A storage manager that resolves paths through an optional cache

pub mod cache;
pub mod error;
pub mod index;
pub mod layout;
pub mod manager;
pub mod probe;
pub mod traits;

pub use cache::{PathCache, ReconcileStats};
pub use error::{StorageError, StorageResult};
pub use index::PathIndex;
pub use layout::DocLayout;
pub use manager::DocStorageManager;
pub use probe::FsProbe;
pub use traits::{FileProbe, PathCacheIntrospection, PathResolver};

use docshelf_core::config::AppConfig;
use docshelf_metadata::DocumentRepo;
use std::sync::Arc;

/// A storage manager together with the path cache backing it.
pub struct CachedStorage {
    pub manager: DocStorageManager,
    pub cache: Arc<PathCache>,
}

/// Build a cache-backed storage manager from configuration.
///
/// When `cache.reconcile_on_startup` is set the cache is populated from `repo`
/// before returning.
pub async fn from_config<R, P>(
    config: &AppConfig,
    repo: &R,
    probe: &P,
) -> StorageResult<CachedStorage>
where
    R: DocumentRepo + ?Sized,
    P: FileProbe + ?Sized,
{
    config.cache.validate().map_err(StorageError::Config)?;
    let layout = DocLayout::from_config(&config.storage)?;
    let cache = Arc::new(PathCache::from_config(layout.clone(), &config.cache));

    if config.cache.reconcile_on_startup {
        cache.reconcile(repo, probe).await?;
    } else {
        tracing::info!("Startup reconciliation disabled, path cache starts empty");
    }

    let manager = DocStorageManager::new(layout).with_resolver(cache.clone());
    Ok(CachedStorage { manager, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshelf_core::DocumentId;
    use docshelf_core::config::{CacheConfig, StorageConfig};
    use docshelf_metadata::{DocumentOptions, SqliteStore};
    use tempfile::tempdir;

    #[tokio::test]
    async fn from_config_reconciles_on_startup() {
        let temp = tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("home.db"), None)
            .await
            .unwrap();

        let doc_file = temp.path().join("Budget.grist");
        std::fs::write(&doc_file, b"x").unwrap();
        let row = store
            .create_document(
                "Budget",
                Some(&DocumentOptions::with_external_path(
                    doc_file.to_string_lossy(),
                )),
            )
            .await
            .unwrap();

        let config = AppConfig {
            storage: StorageConfig {
                docs_root: temp.path().join("docs"),
                extension: "grist".to_string(),
            },
            ..AppConfig::default()
        };

        let storage = from_config(&config, &store, &FsProbe::new()).await.unwrap();
        let id = DocumentId::new(row.doc_id).unwrap();
        assert_eq!(storage.manager.get_path(&id).as_path(), doc_file.as_path());
        assert!(storage.manager.supports_path_cache());
        assert_eq!(storage.cache.len(), 1);
    }

    #[tokio::test]
    async fn from_config_can_skip_reconciliation() {
        let temp = tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("home.db"), None)
            .await
            .unwrap();
        let config = AppConfig {
            cache: CacheConfig {
                reconcile_on_startup: false,
                probe_concurrency: 2,
            },
            ..AppConfig::default()
        };

        let storage = from_config(&config, &store, &FsProbe::new()).await.unwrap();
        assert!(storage.cache.is_empty());
    }

    #[tokio::test]
    async fn from_config_rejects_invalid_cache_config() {
        let temp = tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("home.db"), None)
            .await
            .unwrap();
        let config = AppConfig {
            cache: CacheConfig {
                reconcile_on_startup: true,
                probe_concurrency: 0,
            },
            ..AppConfig::default()
        };

        match from_config(&config, &store, &FsProbe::new()).await {
            Err(StorageError::Config(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected error"),
        }
    }
}
