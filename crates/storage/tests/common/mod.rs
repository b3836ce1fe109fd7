pub mod mocks;

#[allow(unused_imports)]
pub use mocks::{MockProbe, MockRepo};

use docshelf_core::{DocumentId, DocumentPath};
use docshelf_storage::{DocLayout, PathCache};

/// Docs root used by every cache built through [`test_cache`].
pub const DOCS_ROOT: &str = "/srv/docs";

/// Empty cache over the `/srv/docs/<id>.grist` layout.
#[allow(dead_code)]
pub fn test_cache() -> PathCache {
    PathCache::new(DocLayout::new(DOCS_ROOT, "grist").expect("valid layout"))
}

#[allow(dead_code)]
pub fn id(s: &str) -> DocumentId {
    DocumentId::new(s).expect("valid document id")
}

#[allow(dead_code)]
pub fn path(s: &str) -> DocumentPath {
    DocumentPath::new(s).expect("valid document path")
}
