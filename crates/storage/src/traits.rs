//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use docshelf_core::{DocumentId, DocumentPath};

/// Existence check for document files.
#[async_trait]
pub trait FileProbe: Send + Sync {
    /// Check whether a file exists at `path`.
    ///
    /// Callers treat an error as "does not exist".
    async fn exists(&self, path: &DocumentPath) -> StorageResult<bool>;

    /// Get the name of this probe, for logging.
    fn probe_name(&self) -> &'static str;
}

/// Strategy that can answer path queries faster than the default layout.
///
/// Implementations must answer synchronously from memory: `resolve` sits on the
/// hot path of every document open.
pub trait PathResolver: Send + Sync {
    /// Known path for `id`, or `None` to fall back to the default layout.
    fn resolve(&self, id: &DocumentId) -> Option<DocumentPath>;

    /// Capability query for cache introspection.
    ///
    /// Resolvers that keep an inspectable index return `Some`.
    fn as_introspection(&self) -> Option<&dyn PathCacheIntrospection> {
        None
    }
}

/// Read-only view of a path cache, for diagnostics and repair tooling.
pub trait PathCacheIntrospection: Send + Sync {
    /// Cached path for `id`, without fallback.
    fn lookup_by_id(&self, id: &DocumentId) -> Option<DocumentPath>;

    /// Document cached at `path`.
    fn lookup_by_path(&self, path: &DocumentPath) -> Option<DocumentId>;

    /// Point-in-time copy of every cached pair.
    fn snapshot_entries(&self) -> Vec<(DocumentId, DocumentPath)>;
}
