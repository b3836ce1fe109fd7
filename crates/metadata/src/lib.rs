//! Home database access for docshelf.
//!
//! This crate provides the authoritative document records:
//! - Document rows and their JSON options (including the external file path)
//! - The `DocumentRepo` trait consumed by the path cache
//! - A SQLite-backed `MetadataStore`

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use models::{DocumentOptions, DocumentRow};
pub use repos::DocumentRepo;
pub use store::{MetadataStore, SqliteStore};

use docshelf_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            tracing::info!(path = %path.display(), "Opening SQLite home database");
            let store = SqliteStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}
