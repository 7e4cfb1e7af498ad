use std::path::PathBuf;

use crate::document::{ContentHash, DocumentId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Redb(#[from] redb::Error),

    #[error("database open error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("database storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("database transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("database table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("database commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "the document \"{title}\" cannot be inserted because the hash \"{hash}\" is already in the catalog"
    )]
    DuplicateContent { title: String, hash: ContentHash },

    #[error("no document with id {id}")]
    NotFound { id: DocumentId },

    #[error("stored record for document {id} is corrupted: {source}")]
    Corruption {
        id: DocumentId,
        source: serde_json::Error,
    },

    #[error("invalid {kind}: \"{value}\"")]
    Validation { kind: &'static str, value: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("data directory does not exist and could not be created: {0}")]
    DataDir(PathBuf),
}
