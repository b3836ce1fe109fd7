//! Document identifiers and physical locations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque identifier for a logical document, assigned by the home database.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create from a string. The identifier is opaque but must not be empty.
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidDocumentId(
                "document id cannot be empty".to_string(),
            ));
        }
        if id.contains('\0') {
            return Err(crate::Error::InvalidDocumentId(format!(
                "document id contains NUL byte: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Get the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({self})")
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A location in the physical filesystem namespace backing a document.
///
/// Kept as an opaque string rather than a `PathBuf`: the cache compares paths
/// byte-for-byte and never normalises them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Create from a string. The path must not be empty.
    pub fn new(path: impl Into<String>) -> crate::Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(crate::Error::InvalidDocumentPath(
                "document path cannot be empty".to_string(),
            ));
        }
        Ok(Self(path))
    }

    /// Default location of a document: `<dir>/<id>.<extension>`.
    ///
    /// Infallible because a document id is never empty.
    pub fn for_document(dir: &Path, id: &DocumentId, extension: &str) -> Self {
        Self(
            dir.join(format!("{id}.{extension}"))
                .to_string_lossy()
                .into_owned(),
        )
    }

    /// Build from a filesystem path. Non-UTF-8 components are replaced lossily.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        Self::new(path.to_string_lossy().into_owned())
    }

    /// Get the path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// View as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

impl AsRef<Path> for DocumentPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Debug for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentPath({self})")
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document as reported by the home database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Human-readable document name.
    pub name: String,
    /// Path recorded for documents that live outside the docs root.
    /// Documents created by older releases have none and use the default layout.
    pub external_path: Option<DocumentPath>,
}
