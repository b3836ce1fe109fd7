//! Core domain types shared across docshelf crates.
//!
//! This crate defines:
//! - Document identifiers and physical document paths
//! - The document record consumed by the path cache
//! - Configuration for storage layout, the home database and the cache

pub mod config;
pub mod document;
pub mod error;

pub use document::{Document, DocumentId, DocumentPath};
pub use error::{Error, Result};

/// File extension used for documents stored under the docs root.
pub const DEFAULT_DOC_EXTENSION: &str = "grist";
