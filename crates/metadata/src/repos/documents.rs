//! Document repository trait.

use crate::error::MetadataResult;
use crate::models::{DocumentOptions, DocumentRow};
use async_trait::async_trait;

/// Repository for document records in the home database.
#[async_trait]
pub trait DocumentRepo: Send + Sync {
    /// Create a document. The store assigns its id.
    async fn create_document(
        &self,
        name: &str,
        options: Option<&DocumentOptions>,
    ) -> MetadataResult<DocumentRow>;

    /// Get a document by ID.
    async fn get_document(&self, doc_id: &str) -> MetadataResult<Option<DocumentRow>>;

    /// List every document, ordered by creation time.
    async fn list_documents(&self) -> MetadataResult<Vec<DocumentRow>>;

    /// Replace a document's options.
    async fn set_document_options(
        &self,
        doc_id: &str,
        options: Option<&DocumentOptions>,
    ) -> MetadataResult<()>;

    /// Delete a document by ID.
    async fn delete_document(&self, doc_id: &str) -> MetadataResult<()>;
}
