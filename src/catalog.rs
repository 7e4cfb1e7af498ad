use std::path::Path;

use parking_lot::RwLock;

use crate::{
    document::{Document, DocumentId},
    error::Result,
    index::TextIndex,
    store::DocumentStore,
};

/// The document catalog: a [`DocumentStore`] as source of truth plus a
/// [`TextIndex`] rebuilt from it at startup.
///
/// The index lives behind a reader-writer lock so any number of concurrent
/// searches can proceed together while insert/delete take exclusive access.
/// Store transactions do not cover the index; a crash between a committed
/// insert and the index update only hides that document from search until the
/// next startup replay.
pub struct Catalog {
    store: DocumentStore,
    index: RwLock<TextIndex>,
}

impl Catalog {
    /// Open the store at `path` and replay every live record into a freshly
    /// built index. The index is never persisted.
    pub fn open(path: &Path) -> Result<Self> {
        let store = DocumentStore::open(path)?;

        let mut index = TextIndex::new();
        store.for_each(|id, document| {
            index.insert(id, &document);
            Ok(())
        })?;
        tracing::debug!(documents = index.len(), "rebuilt text index");

        Ok(Self {
            store,
            index: RwLock::new(index),
        })
    }

    /// Insert a document into the store and, only on success, the index.
    pub fn insert(&self, document: &Document) -> Result<DocumentId> {
        let id = self.store.insert(document)?;
        self.index.write().insert(id, document);
        Ok(id)
    }

    pub fn get(&self, id: DocumentId) -> Result<Document> {
        self.store.get(id)
    }

    /// Delete a document from the store and the index, keeping the two in
    /// sync. Returns whether a record was actually removed.
    pub fn delete(&self, id: DocumentId) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            self.index.write().delete(id);
        }
        Ok(removed)
    }

    /// Ranked shortlist of at most [`crate::index::MAX_RESULTS`] document IDs.
    pub fn search(&self, query: &str) -> Vec<DocumentId> {
        let results = self.index.read().search(query);
        tracing::debug!(query, hits = results.len(), "searched catalog");
        results
    }

    /// Visit every live record in ascending ID order.
    pub fn for_each(
        &self,
        visit: impl FnMut(DocumentId, Document) -> Result<()>,
    ) -> Result<()> {
        self.store.for_each(visit)
    }

    /// Number of live records in the store.
    pub fn len(&self) -> Result<u64> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{document::ContentHash, error::Error};

    fn test_catalog() -> (tempfile::TempDir, Catalog) {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(&tmp.path().join("catalog.redb")).unwrap();
        (tmp, catalog)
    }

    fn doc(title: &str, content: &[u8]) -> Document {
        Document {
            title: title.to_string(),
            authors: vec![],
            keywords: vec![],
            extension: "pdf".into(),
            hash: ContentHash::of(content),
        }
    }

    #[test]
    fn insert_then_search_and_get() {
        let (_tmp, catalog) = test_catalog();

        let document = doc("Quantum Computing Basics", b"qcb");
        let id = catalog.insert(&document).unwrap();
        // A companion document keeps the query trigrams' IDF positive.
        catalog.insert(&doc("Classical Mechanics Primer", b"cmp")).unwrap();

        assert_eq!(catalog.search("quantum").first(), Some(&id));
        assert_eq!(catalog.get(id).unwrap(), document);
    }

    #[test]
    fn failed_insert_leaves_the_index_untouched() {
        let (_tmp, catalog) = test_catalog();

        catalog.insert(&doc("Original", b"same")).unwrap();
        let err = catalog.insert(&doc("Duplicate Paper", b"same")).unwrap_err();
        assert!(matches!(err, Error::DuplicateContent { .. }));

        // The rejected title must not be searchable.
        assert!(catalog.search("duplicate paper").is_empty());
    }

    #[test]
    fn delete_removes_from_store_and_search() {
        let (_tmp, catalog) = test_catalog();

        let id = catalog.insert(&doc("Quantum Notes", b"qn")).unwrap();
        catalog.insert(&doc("Classical Primer", b"cp")).unwrap();

        assert!(catalog.delete(id).unwrap());
        assert!(catalog.search("quantum").is_empty());
        assert!(matches!(
            catalog.get(id).unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(!catalog.delete(id).unwrap());
    }

    #[test]
    fn startup_replay_restores_search() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.redb");

        let id = {
            let catalog = Catalog::open(&path).unwrap();
            let id = catalog.insert(&doc("Quantum Notes", b"qn")).unwrap();
            catalog.insert(&doc("Classical Primer", b"cp")).unwrap();
            id
        };

        let catalog = Catalog::open(&path).unwrap();
        assert_eq!(catalog.search("quantum").first(), Some(&id));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.redb");

        {
            let catalog = Catalog::open(&path).unwrap();
            catalog.insert(&doc("Quantum Computing Basics", b"a")).unwrap();
            catalog.insert(&doc("Quantum Chemistry Notes", b"b")).unwrap();
            catalog.insert(&doc("Classical Mechanics Primer", b"c")).unwrap();
        }

        let first = Catalog::open(&path).unwrap().search("quantum");
        let second = Catalog::open(&path).unwrap().search("quantum");
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
