//! In-memory document path cache.
//!
//! Document locations are recorded in the home database, but callers resolve
//! paths synchronously on every document access. `PathCache` keeps a bijective
//! id <-> path index in memory so those lookups never wait on the database, and
//! falls back to the configured [`DocLayout`] when it has no entry.
//!
//! The index is filled in two ways:
//! - explicitly, through [`PathCache::register_path`] when a document is opened
//!   or moved;
//! - in bulk, through [`PathCache::reconcile`], which walks the home database and
//!   registers every document whose recorded (or default) path exists on disk.
//!
//! Records whose file is gone are never registered, so a stale database entry
//! cannot poison the cache. [`PathCache::find_uncached_documents`] reports them.

use crate::error::StorageResult;
use crate::index::{Displaced, PathIndex};
use crate::layout::DocLayout;
use crate::traits::{FileProbe, PathCacheIntrospection, PathResolver};
use docshelf_core::config::CacheConfig;
use docshelf_core::{Document, DocumentId, DocumentPath};
use docshelf_metadata::{DocumentRepo, DocumentRow};
use futures::{StreamExt, future, stream};
use serde::Serialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::instrument;

/// Existence checks in flight when no configuration is given.
pub const DEFAULT_PROBE_CONCURRENCY: usize = 16;

/// Counters for one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Documents listed by the home database.
    pub documents_scanned: u64,
    /// Registrations applied, one per document whose path exists. A document
    /// whose path a later document claims in the same pass is still counted here
    /// and again in `displaced`.
    pub registered: u64,
    /// Registrations that evicted another document cached at the same path.
    pub displaced: u64,
    /// Documents whose candidate path does not exist.
    pub skipped_missing: u64,
    /// Documents skipped because their record or existence check failed.
    pub errors: u64,
}

enum ProbeOutcome {
    Exists(DocumentId, DocumentPath),
    Missing(DocumentId, DocumentPath),
    Failed { doc_id: String, error: String },
}

/// Bidirectional id <-> path cache layered over the default layout.
pub struct PathCache {
    index: RwLock<PathIndex>,
    layout: DocLayout,
    probe_concurrency: usize,
}

impl PathCache {
    /// Create an empty cache falling back to `layout`.
    pub fn new(layout: DocLayout) -> Self {
        Self {
            index: RwLock::new(PathIndex::new()),
            layout,
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
        }
    }

    /// Create an empty cache with settings from configuration.
    pub fn from_config(layout: DocLayout, config: &CacheConfig) -> Self {
        Self::new(layout).with_probe_concurrency(config.probe_concurrency)
    }

    /// Set how many existence checks may run at once (minimum 1).
    pub fn with_probe_concurrency(mut self, probe_concurrency: usize) -> Self {
        self.probe_concurrency = probe_concurrency.max(1);
        self
    }

    /// Layout used for uncached documents.
    pub fn layout(&self) -> &DocLayout {
        &self.layout
    }

    fn read_index(&self) -> RwLockReadGuard<'_, PathIndex> {
        self.index.read().unwrap_or_else(|poisoned| {
            tracing::warn!("path index RwLock was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        })
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, PathIndex> {
        self.index.write().unwrap_or_else(|poisoned| {
            tracing::warn!("path index RwLock was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        })
    }

    /// Resolve the path for `id`: the cached entry if any, otherwise the default layout.
    ///
    /// Never performs I/O.
    pub fn get_path(&self, id: &DocumentId) -> DocumentPath {
        let cached = self.lookup_by_id(id);
        tracing::debug!(doc_id = %id, cached = ?cached, "Resolving document path");
        cached.unwrap_or_else(|| self.layout.default_path(id))
    }

    /// Cache `path` as the location of `id`.
    ///
    /// A previous path of `id`, or a previous owner of `path`, is dropped so the
    /// index stays one-to-one.
    pub fn register_path(&self, id: DocumentId, path: DocumentPath) {
        self.register(id, path);
    }

    fn register(&self, id: DocumentId, path: DocumentPath) -> Displaced {
        let doc_id = id.clone();
        let displaced = self.write_index().insert(id, path);
        if !displaced.is_empty() {
            tracing::debug!(
                doc_id = %doc_id,
                previous_path = ?displaced.previous_path,
                previous_owner = ?displaced.previous_owner,
                "Replaced cached document path"
            );
        }
        displaced
    }

    /// Forget the cached path of `id`. No-op if uncached.
    pub fn deregister_by_id(&self, id: &DocumentId) {
        if let Some(path) = self.write_index().remove_by_id(id) {
            tracing::debug!(doc_id = %id, path = %path, "Deregistered document path");
        }
    }

    /// Forget whichever document is cached at `path`. No-op if none.
    pub fn deregister_by_path(&self, path: &DocumentPath) {
        if let Some(id) = self.write_index().remove_by_path(path) {
            tracing::debug!(doc_id = %id, path = %path, "Deregistered document path");
        }
    }

    /// Cached path for `id`, without fallback.
    pub fn lookup_by_id(&self, id: &DocumentId) -> Option<DocumentPath> {
        self.read_index().get_by_id(id).cloned()
    }

    /// Document cached at `path`.
    pub fn lookup_by_path(&self, path: &DocumentPath) -> Option<DocumentId> {
        self.read_index().get_by_path(path).cloned()
    }

    /// Copy of every cached pair, sorted by document id.
    pub fn snapshot_entries(&self) -> Vec<(DocumentId, DocumentPath)> {
        self.read_index().entries()
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.read_index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_index().is_empty()
    }

    /// Populate the cache from the home database.
    ///
    /// Each document's candidate path is its recorded external path, or the
    /// default layout path when none is recorded. Candidates that exist on disk
    /// are registered; the rest are left alone. A failure on one document is
    /// logged and counted without stopping the pass. Only a failure to list
    /// documents at all is returned as an error.
    ///
    /// Registrations are applied in listing order, so re-running the pass over
    /// unchanged inputs yields the same index.
    #[instrument(skip_all, fields(probe = probe.probe_name()))]
    pub async fn reconcile<R, P>(&self, repo: &R, probe: &P) -> StorageResult<ReconcileStats>
    where
        R: DocumentRepo + ?Sized,
        P: FileProbe + ?Sized,
    {
        let rows = repo.list_documents().await?;
        let mut stats = ReconcileStats {
            documents_scanned: rows.len() as u64,
            ..ReconcileStats::default()
        };

        let mut outcomes = stream::iter(rows.iter())
            .map(|row| self.probe_candidate(row, probe))
            .buffered(self.probe_concurrency);

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                ProbeOutcome::Exists(id, path) => {
                    let displaced = self.register(id, path);
                    stats.registered += 1;
                    if displaced.previous_owner.is_some() {
                        stats.displaced += 1;
                    }
                }
                ProbeOutcome::Missing(id, path) => {
                    tracing::debug!(
                        doc_id = %id,
                        path = %path,
                        "Document file missing, leaving uncached"
                    );
                    stats.skipped_missing += 1;
                }
                ProbeOutcome::Failed { doc_id, error } => {
                    tracing::warn!(
                        doc_id = %doc_id,
                        error = %error,
                        "Skipping document during path reconciliation"
                    );
                    stats.errors += 1;
                }
            }
        }

        tracing::info!(
            documents_scanned = stats.documents_scanned,
            registered = stats.registered,
            displaced = stats.displaced,
            skipped_missing = stats.skipped_missing,
            errors = stats.errors,
            cached = self.len(),
            "Path cache reconciled with home database"
        );

        Ok(stats)
    }

    async fn probe_candidate<P>(&self, row: &DocumentRow, probe: &P) -> ProbeOutcome
    where
        P: FileProbe + ?Sized,
    {
        let doc = match row.to_document() {
            Ok(doc) => doc,
            Err(e) => {
                return ProbeOutcome::Failed {
                    doc_id: row.doc_id.clone(),
                    error: e.to_string(),
                };
            }
        };

        let candidate = doc
            .external_path
            .unwrap_or_else(|| self.layout.default_path(&doc.id));

        match probe.exists(&candidate).await {
            Ok(true) => ProbeOutcome::Exists(doc.id, candidate),
            Ok(false) => ProbeOutcome::Missing(doc.id, candidate),
            Err(e) => ProbeOutcome::Failed {
                doc_id: doc.id.to_string(),
                error: format!("existence check for {candidate} failed: {e}"),
            },
        }
    }

    /// List documents whose resolved path (see [`PathCache::get_path`]) does not
    /// exist. A failed existence check counts as missing.
    ///
    /// Reports only; the cache is not modified.
    #[instrument(skip_all, fields(probe = probe.probe_name()))]
    pub async fn find_uncached_documents<R, P>(
        &self,
        repo: &R,
        probe: &P,
    ) -> StorageResult<Vec<Document>>
    where
        R: DocumentRepo + ?Sized,
        P: FileProbe + ?Sized,
    {
        let rows = repo.list_documents().await?;
        let docs: Vec<Document> = rows.iter().filter_map(document_for_report).collect();

        let missing: Vec<Document> = stream::iter(docs)
            .map(|doc| async move {
                let path = self.get_path(&doc.id);
                let present = match probe.exists(&path).await {
                    Ok(present) => present,
                    Err(e) => {
                        tracing::warn!(
                            doc_id = %doc.id,
                            path = %path,
                            error = %e,
                            "Existence check failed, reporting document as missing"
                        );
                        false
                    }
                };
                (!present).then_some(doc)
            })
            .buffered(self.probe_concurrency)
            .filter_map(future::ready)
            .collect()
            .await;

        tracing::info!(missing = missing.len(), "Scanned for documents without files");
        Ok(missing)
    }
}

/// Document view for repair reports. Records with undecodable options are still
/// reported, using the default layout.
fn document_for_report(row: &DocumentRow) -> Option<Document> {
    match row.to_document() {
        Ok(doc) => Some(doc),
        Err(e) => match DocumentId::new(row.doc_id.as_str()) {
            Ok(id) => {
                tracing::warn!(doc_id = %id, error = %e, "Ignoring undecodable document options");
                Some(Document {
                    id,
                    name: row.name.clone(),
                    external_path: None,
                })
            }
            Err(_) => {
                tracing::warn!(error = %e, "Skipping document with invalid id");
                None
            }
        },
    }
}

impl PathResolver for PathCache {
    fn resolve(&self, id: &DocumentId) -> Option<DocumentPath> {
        self.lookup_by_id(id)
    }

    fn as_introspection(&self) -> Option<&dyn PathCacheIntrospection> {
        Some(self)
    }
}

impl PathCacheIntrospection for PathCache {
    fn lookup_by_id(&self, id: &DocumentId) -> Option<DocumentPath> {
        PathCache::lookup_by_id(self, id)
    }

    fn lookup_by_path(&self, path: &DocumentPath) -> Option<DocumentId> {
        PathCache::lookup_by_path(self, path)
    }

    fn snapshot_entries(&self) -> Vec<(DocumentId, DocumentPath)> {
        PathCache::snapshot_entries(self)
    }
}
