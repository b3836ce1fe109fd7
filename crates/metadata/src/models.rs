//! Database models mapping to the home database schema.

use crate::error::{MetadataError, MetadataResult};
use docshelf_core::{Document, DocumentId, DocumentPath};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Document record.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub doc_id: String,
    pub name: String,
    /// JSON-encoded [`DocumentOptions`], NULL when the document has none.
    pub options: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Per-document options stored alongside the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Where the document file lives when it is outside the docs root.
    /// Desktop documents opened from arbitrary locations record their file path here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl DocumentOptions {
    /// Options for a document whose file lives at `path`.
    pub fn with_external_path(path: impl Into<String>) -> Self {
        Self {
            external_id: Some(path.into()),
        }
    }
}

impl DocumentRow {
    /// Decode the options column. Missing options decode as the defaults.
    pub fn options(&self) -> MetadataResult<DocumentOptions> {
        match self.options.as_deref() {
            None => Ok(DocumentOptions::default()),
            Some(raw) if raw.trim().is_empty() || raw.trim() == "null" => {
                Ok(DocumentOptions::default())
            }
            Some(raw) => serde_json::from_str(raw).map_err(|e| MetadataError::InvalidRecord {
                doc_id: self.doc_id.clone(),
                reason: format!("undecodable options: {e}"),
            }),
        }
    }

    /// Convert to the document view consumed by the path cache.
    pub fn to_document(&self) -> MetadataResult<Document> {
        let invalid = |reason: String| MetadataError::InvalidRecord {
            doc_id: self.doc_id.clone(),
            reason,
        };

        let id = DocumentId::new(self.doc_id.as_str()).map_err(|e| invalid(e.to_string()))?;
        let external_path = match self.options()?.external_id {
            Some(path) if !path.is_empty() => {
                Some(DocumentPath::new(path).map_err(|e| invalid(e.to_string()))?)
            }
            _ => None,
        };

        Ok(Document {
            id,
            name: self.name.clone(),
            external_path,
        })
    }
}
