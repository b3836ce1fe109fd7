//! Configuration-derived document locations.

use crate::error::{StorageError, StorageResult};
use docshelf_core::config::StorageConfig;
use docshelf_core::{DocumentId, DocumentPath};
use std::path::PathBuf;

/// Computes where a document lives when nothing better is known.
///
/// Pure: the result depends only on the configuration and the id.
#[derive(Clone, Debug)]
pub struct DocLayout {
    docs_root: PathBuf,
    extension: String,
}

impl DocLayout {
    /// Create a layout rooted at `docs_root`. `extension` excludes the leading dot.
    pub fn new(docs_root: impl Into<PathBuf>, extension: impl Into<String>) -> StorageResult<Self> {
        let config = StorageConfig {
            docs_root: docs_root.into(),
            extension: extension.into(),
        };
        Self::from_config(&config)
    }

    /// Create a layout from configuration, validating it first.
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        config.validate().map_err(StorageError::Config)?;
        Ok(Self {
            docs_root: config.docs_root.clone(),
            extension: config.extension.clone(),
        })
    }

    /// Default path for `id`.
    pub fn default_path(&self, id: &DocumentId) -> DocumentPath {
        DocumentPath::for_document(&self.docs_root, id, &self.extension)
    }
}
