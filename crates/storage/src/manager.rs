//! Document storage manager.

use crate::layout::DocLayout;
use crate::traits::{PathCacheIntrospection, PathResolver};
use docshelf_core::{DocumentId, DocumentPath};
use std::sync::Arc;

/// Resolves document ids to file paths.
///
/// Paths come from the configured [`DocLayout`] unless a [`PathResolver`]
/// strategy (typically a [`PathCache`](crate::PathCache)) knows better.
#[derive(Clone)]
pub struct DocStorageManager {
    layout: DocLayout,
    resolver: Option<Arc<dyn PathResolver>>,
}

impl DocStorageManager {
    /// Manager that always uses the default layout.
    pub fn new(layout: DocLayout) -> Self {
        Self {
            layout,
            resolver: None,
        }
    }

    /// Consult `resolver` before falling back to the layout.
    pub fn with_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn layout(&self) -> &DocLayout {
        &self.layout
    }

    /// Path for `id`. Synchronous and I/O free.
    pub fn get_path(&self, id: &DocumentId) -> DocumentPath {
        self.resolver
            .as_ref()
            .and_then(|resolver| resolver.resolve(id))
            .unwrap_or_else(|| self.layout.default_path(id))
    }

    /// Path `id` would have without any resolver.
    pub fn default_path(&self, id: &DocumentId) -> DocumentPath {
        self.layout.default_path(id)
    }

    /// Cache introspection, when the configured resolver supports it.
    pub fn path_cache_introspection(&self) -> Option<&dyn PathCacheIntrospection> {
        self.resolver
            .as_deref()
            .and_then(|resolver| resolver.as_introspection())
    }

    /// Whether this manager is backed by an inspectable path cache.
    pub fn supports_path_cache(&self) -> bool {
        self.path_cache_introspection().is_some()
    }
}

impl std::fmt::Debug for DocStorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStorageManager")
            .field("layout", &self.layout)
            .field("path_cache", &self.supports_path_cache())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathCache;

    struct FixedResolver(DocumentPath);

    impl PathResolver for FixedResolver {
        fn resolve(&self, _id: &DocumentId) -> Option<DocumentPath> {
            Some(self.0.clone())
        }
    }

    fn layout() -> DocLayout {
        DocLayout::new("/srv/docs", "grist").unwrap()
    }

    #[test]
    fn test_plain_manager_uses_layout() {
        let manager = DocStorageManager::new(layout());
        let id = DocumentId::new("doc1").unwrap();

        assert_eq!(manager.get_path(&id).as_str(), "/srv/docs/doc1.grist");
        assert!(!manager.supports_path_cache());
    }

    #[test]
    fn test_resolver_without_introspection() {
        let fixed = DocumentPath::new("/elsewhere.grist").unwrap();
        let manager =
            DocStorageManager::new(layout()).with_resolver(Arc::new(FixedResolver(fixed.clone())));
        let id = DocumentId::new("doc1").unwrap();

        assert_eq!(manager.get_path(&id), fixed);
        assert_eq!(manager.default_path(&id).as_str(), "/srv/docs/doc1.grist");
        assert!(manager.path_cache_introspection().is_none());
    }

    #[test]
    fn test_cache_backed_manager() {
        let cache = Arc::new(PathCache::new(layout()));
        let manager = DocStorageManager::new(layout()).with_resolver(cache.clone());
        let id = DocumentId::new("doc1").unwrap();
        let external = DocumentPath::new("/home/me/Budget.grist").unwrap();

        assert_eq!(manager.get_path(&id).as_str(), "/srv/docs/doc1.grist");

        cache.register_path(id.clone(), external.clone());
        assert_eq!(manager.get_path(&id), external);

        let view = manager.path_cache_introspection().unwrap();
        assert_eq!(view.lookup_by_path(&external), Some(id.clone()));

        cache.deregister_by_id(&id);
        assert_eq!(manager.get_path(&id).as_str(), "/srv/docs/doc1.grist");
    }
}
