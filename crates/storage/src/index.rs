//! Bidirectional document id <-> path index.

use docshelf_core::{DocumentId, DocumentPath};
use std::collections::HashMap;

/// What a registration replaced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Displaced {
    /// Path `id` was previously cached at, if different from the new one.
    pub previous_path: Option<DocumentPath>,
    /// Document previously cached at the new path, if different from `id`.
    pub previous_owner: Option<DocumentId>,
}

impl Displaced {
    pub fn is_empty(&self) -> bool {
        self.previous_path.is_none() && self.previous_owner.is_none()
    }
}

/// Forward and reverse maps kept as exact inverses of each other.
///
/// Not synchronised; `PathCache` wraps it in a lock so both maps change together.
#[derive(Clone, Debug, Default)]
pub struct PathIndex {
    by_id: HashMap<DocumentId, DocumentPath>,
    by_path: HashMap<DocumentPath, DocumentId>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `id` to `path`, dropping any entry that would break the bijection.
    pub fn insert(&mut self, id: DocumentId, path: DocumentPath) -> Displaced {
        let mut displaced = Displaced::default();

        if let Some(old_path) = self.by_id.get(&id)
            && *old_path != path
        {
            let old_path = old_path.clone();
            self.by_path.remove(&old_path);
            displaced.previous_path = Some(old_path);
        }

        if let Some(owner) = self.by_path.get(&path)
            && *owner != id
        {
            let owner = owner.clone();
            self.by_id.remove(&owner);
            displaced.previous_owner = Some(owner);
        }

        self.by_path.insert(path.clone(), id.clone());
        self.by_id.insert(id, path);
        displaced
    }

    /// Remove the entry for `id`, returning its path.
    pub fn remove_by_id(&mut self, id: &DocumentId) -> Option<DocumentPath> {
        let path = self.by_id.remove(id)?;
        self.by_path.remove(&path);
        Some(path)
    }

    /// Remove the entry for `path`, returning its document.
    pub fn remove_by_path(&mut self, path: &DocumentPath) -> Option<DocumentId> {
        let id = self.by_path.remove(path)?;
        self.by_id.remove(&id);
        Some(id)
    }

    pub fn get_by_id(&self, id: &DocumentId) -> Option<&DocumentPath> {
        self.by_id.get(id)
    }

    pub fn get_by_path(&self, path: &DocumentPath) -> Option<&DocumentId> {
        self.by_path.get(path)
    }

    /// All pairs, sorted by document id.
    pub fn entries(&self) -> Vec<(DocumentId, DocumentPath)> {
        let mut entries: Vec<_> = self
            .by_id
            .iter()
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Check that the two maps mirror each other exactly. O(n).
    pub fn is_consistent(&self) -> bool {
        self.by_id.len() == self.by_path.len()
            && self
                .by_id
                .iter()
                .all(|(id, path)| self.by_path.get(path) == Some(id))
    }
}
