use async_trait::async_trait;
use docshelf_core::DocumentPath;
use docshelf_metadata::{
    DocumentOptions, DocumentRepo, DocumentRow, MetadataError, MetadataResult,
};
use docshelf_storage::{FileProbe, StorageError, StorageResult};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use time::OffsetDateTime;

/// In-memory home database with caller-chosen document ids.
#[derive(Default)]
pub struct MockRepo {
    rows: Mutex<Vec<DocumentRow>>,
    fail_listing: AtomicBool,
    next_id: AtomicUsize,
}

#[allow(dead_code)]
impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with an explicit id and raw options JSON.
    pub fn insert_raw(&self, doc_id: &str, options: Option<&str>) {
        let now = OffsetDateTime::now_utc();
        self.rows.lock().unwrap().push(DocumentRow {
            doc_id: doc_id.to_string(),
            name: format!("{doc_id} name"),
            options: options.map(str::to_string),
            created_at: now,
            updated_at: now,
        });
    }

    /// Add a document, optionally recording an external path.
    pub fn insert(&self, doc_id: &str, external_path: Option<&str>) {
        let options = external_path
            .map(|path| serde_json::to_string(&DocumentOptions::with_external_path(path)).unwrap());
        self.insert_raw(doc_id, options.as_deref());
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentRepo for MockRepo {
    async fn create_document(
        &self,
        name: &str,
        options: Option<&DocumentOptions>,
    ) -> MetadataResult<DocumentRow> {
        let now = OffsetDateTime::now_utc();
        let row = DocumentRow {
            doc_id: format!("mock{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: name.to_string(),
            options: options.map(serde_json::to_string).transpose()?,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get_document(&self, doc_id: &str) -> MetadataResult<Option<DocumentRow>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|row| row.doc_id == doc_id).cloned())
    }

    async fn list_documents(&self) -> MetadataResult<Vec<DocumentRow>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(MetadataError::Io(std::io::Error::other(
                "home database unavailable",
            )));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn set_document_options(
        &self,
        doc_id: &str,
        options: Option<&DocumentOptions>,
    ) -> MetadataResult<()> {
        let encoded = options.map(serde_json::to_string).transpose()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.doc_id == doc_id)
            .ok_or_else(|| MetadataError::NotFound(doc_id.to_string()))?;
        row.options = encoded;
        Ok(())
    }

    async fn delete_document(&self, doc_id: &str) -> MetadataResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.doc_id != doc_id);
        if rows.len() == before {
            return Err(MetadataError::NotFound(doc_id.to_string()));
        }
        Ok(())
    }
}

/// Probe answering from a fixed set of existing paths.
///
/// Paths in `broken` fail with an I/O error instead of answering.
#[derive(Default)]
pub struct MockProbe {
    existing: Mutex<HashSet<String>>,
    broken: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(paths: &[&str]) -> Self {
        let probe = Self::new();
        for path in paths {
            probe.add(path);
        }
        probe
    }

    pub fn add(&self, path: &str) {
        self.existing.lock().unwrap().insert(path.to_string());
    }

    pub fn remove(&self, path: &str) {
        self.existing.lock().unwrap().remove(path);
    }

    pub fn break_path(&self, path: &str) {
        self.broken.lock().unwrap().insert(path.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileProbe for MockProbe {
    async fn exists(&self, path: &DocumentPath) -> StorageResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.lock().unwrap().contains(path.as_str()) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("permission denied: {path}"),
            )));
        }
        Ok(self.existing.lock().unwrap().contains(path.as_str()))
    }

    fn probe_name(&self) -> &'static str {
        "mock"
    }
}
