use std::path::Path;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition,
};

use crate::{
    document::{Document, DocumentId},
    error::{Error, Result},
};

const DOCUMENTS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("documents");
const HASHES: TableDefinition<&[u8], u64> = TableDefinition::new("hashes");
const STATE: TableDefinition<&str, u64> = TableDefinition::new("state");

/// Key in the `state` table holding the last issued document ID.
const LAST_ID: &str = "last_id";

/// Durable document repository keyed by [`DocumentId`].
///
/// Three tables live in one redb file: `documents` maps the numeric ID to the
/// JSON-serialized record, `hashes` maps the 32 raw content-hash bytes back to
/// the ID that owns them, and `state` holds the ID counter. The counter only
/// advances inside a committed insert, so IDs stay densely packed except for
/// explicit deletions, and an ID is never reissued.
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Open or create a store at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// # let tmp = tempfile::tempdir().unwrap();
    /// use quire::DocumentStore;
    ///
    /// let store = DocumentStore::open(&tmp.path().join("catalog.redb")).unwrap();
    /// assert_eq!(store.len().unwrap(), 0);
    /// ```
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        // Ensure all tables exist by opening them in a write transaction.
        let txn = db.begin_write()?;
        txn.open_table(DOCUMENTS)?;
        txn.open_table(HASHES)?;
        txn.open_table(STATE)?;
        txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a document and return its freshly assigned ID.
    ///
    /// The duplicate-hash check, counter increment, and both table writes are
    /// one write transaction. A duplicate hash fails with
    /// [`Error::DuplicateContent`] before the counter moves; the aborted
    /// transaction leaves no trace.
    pub fn insert(&self, document: &Document) -> Result<DocumentId> {
        let txn = self.db.begin_write()?;
        let id = {
            let mut hashes = txn.open_table(HASHES)?;
            if hashes.get(document.hash.as_bytes())?.is_some() {
                return Err(Error::DuplicateContent {
                    title: document.title.clone(),
                    hash: document.hash,
                });
            }

            let mut state = txn.open_table(STATE)?;
            let next = state.get(LAST_ID)?.map(|g| g.value()).unwrap_or(0) + 1;
            state.insert(LAST_ID, next)?;

            hashes.insert(document.hash.as_bytes(), next)?;

            let mut documents = txn.open_table(DOCUMENTS)?;
            let bytes = serde_json::to_vec(document)?;
            documents.insert(next, bytes.as_slice())?;

            DocumentId::new(next)
        };
        txn.commit()?;

        tracing::debug!(%id, hash = %document.hash, "inserted document");
        Ok(id)
    }

    /// Retrieve a document by ID.
    ///
    /// Fails with [`Error::NotFound`] if no live record exists, or
    /// [`Error::Corruption`] if the stored record no longer deserializes.
    pub fn get(&self, id: DocumentId) -> Result<Document> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;

        let Some(guard) = table.get(id.as_u64())? else {
            return Err(Error::NotFound { id });
        };

        serde_json::from_slice(guard.value())
            .map_err(|source| Error::Corruption { id, source })
    }

    /// Delete a document, freeing its content hash for re-insertion.
    ///
    /// Removing both mappings happens in one write transaction. Deleting an
    /// absent ID is a no-op returning `Ok(false)`.
    pub fn delete(&self, id: DocumentId) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let hash = {
            let mut documents = txn.open_table(DOCUMENTS)?;
            match documents.remove(id.as_u64())? {
                Some(guard) => {
                    let document: Document =
                        serde_json::from_slice(guard.value()).map_err(
                            |source| Error::Corruption { id, source },
                        )?;
                    Some(document.hash)
                }
                None => None,
            }
        };

        let removed = match hash {
            Some(hash) => {
                let mut hashes = txn.open_table(HASHES)?;
                hashes.remove(hash.as_bytes())?;
                true
            }
            None => false,
        };
        txn.commit()?;

        if removed {
            tracing::debug!(%id, "deleted document");
        }
        Ok(removed)
    }

    /// Visit every live record in ascending ID order under one read snapshot.
    ///
    /// Any error returned by `visit` aborts the iteration and propagates.
    pub fn for_each(
        &self,
        mut visit: impl FnMut(DocumentId, Document) -> Result<()>,
    ) -> Result<()> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        for entry in table.iter()? {
            let (key, value) = entry?;
            let id = DocumentId::new(key.value());
            let document = serde_json::from_slice(value.value())
                .map_err(|source| Error::Corruption { id, source })?;
            visit(id, document)?;
        }
        Ok(())
    }

    /// Number of live records.
    pub fn len(&self) -> Result<u64> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentHash;

    fn test_store() -> (tempfile::TempDir, DocumentStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(&tmp.path().join("catalog.redb")).unwrap();
        (tmp, store)
    }

    fn doc(title: &str, content: &[u8]) -> Document {
        Document {
            title: title.to_string(),
            authors: vec!["Author".into()],
            keywords: vec!["keyword".into()],
            extension: "pdf".into(),
            hash: ContentHash::of(content),
        }
    }

    #[test]
    fn insert_get_round_trip() {
        let (_tmp, store) = test_store();
        let document = doc("First", b"first");

        let id = store.insert(&document).unwrap();
        assert_eq!(store.get(id).unwrap(), document);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let (_tmp, store) = test_store();
        let err = store.get(DocumentId::new(7)).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn duplicate_hash_is_rejected_without_consuming_an_id() {
        let (_tmp, store) = test_store();

        let first = store.insert(&doc("First", b"same")).unwrap();
        let err = store.insert(&doc("Copy", b"same")).unwrap_err();
        assert!(matches!(err, Error::DuplicateContent { .. }));

        // The failed insert must not have advanced the counter.
        let second = store.insert(&doc("Second", b"other")).unwrap();
        assert_eq!(second.as_u64(), first.as_u64() + 1);
    }

    #[test]
    fn ids_are_strictly_increasing_and_never_reused() {
        let (_tmp, store) = test_store();

        let a = store.insert(&doc("A", b"a")).unwrap();
        let b = store.insert(&doc("B", b"b")).unwrap();
        assert!(b > a);

        assert!(store.delete(b).unwrap());
        let c = store.insert(&doc("C", b"c")).unwrap();
        assert!(c > b);
    }

    #[test]
    fn delete_frees_the_hash_for_reinsertion() {
        let (_tmp, store) = test_store();

        let id = store.insert(&doc("First", b"same")).unwrap();
        assert!(store.delete(id).unwrap());

        // Identical content is insertable again once the record is gone.
        store.insert(&doc("Again", b"same")).unwrap();
    }

    #[test]
    fn delete_absent_id_is_a_noop() {
        let (_tmp, store) = test_store();
        assert!(!store.delete(DocumentId::new(99)).unwrap());
    }

    #[test]
    fn for_each_yields_survivors_in_id_order() {
        let (_tmp, store) = test_store();

        let a = store.insert(&doc("A", b"a")).unwrap();
        let b = store.insert(&doc("B", b"b")).unwrap();
        let c = store.insert(&doc("C", b"c")).unwrap();
        store.delete(b).unwrap();

        let mut seen = Vec::new();
        store
            .for_each(|id, _| {
                seen.push(id);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![a, c]);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn for_each_propagates_visitor_errors() {
        let (_tmp, store) = test_store();
        store.insert(&doc("A", b"a")).unwrap();

        let err = store
            .for_each(|id, _| Err(Error::NotFound { id }))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn counter_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.redb");

        let last = {
            let store = DocumentStore::open(&path).unwrap();
            store.insert(&doc("A", b"a")).unwrap();
            let b = store.insert(&doc("B", b"b")).unwrap();
            store.delete(b).unwrap();
            b
        };

        let store = DocumentStore::open(&path).unwrap();
        let next = store.insert(&doc("C", b"c")).unwrap();
        assert!(next > last);
    }
}
