//! Local filesystem existence probe.

use crate::error::{StorageError, StorageResult};
use crate::traits::FileProbe;
use async_trait::async_trait;
use docshelf_core::DocumentPath;
use tokio::fs;
use tracing::instrument;

/// Checks document files on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl FsProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileProbe for FsProbe {
    #[instrument(skip(self), fields(probe = "filesystem"))]
    async fn exists(&self, path: &DocumentPath) -> StorageResult<bool> {
        // Directories are not documents.
        match fs::metadata(path.as_path()).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn probe_name(&self) -> &'static str {
        "filesystem"
    }
}
