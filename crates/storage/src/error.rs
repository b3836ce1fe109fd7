//! Storage error types.

use docshelf_metadata::MetadataError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// The home database could not be read as a whole.
    #[error("home database error: {0}")]
    Metadata(#[from] MetadataError),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
