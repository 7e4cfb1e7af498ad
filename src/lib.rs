//! quire - a personal document catalog.
//!
//! quire stores metadata about files you own, deduplicates them by content
//! hash, assigns stable numeric identifiers, and answers free-text queries
//! with a ranked shortlist. Records live in a transactional [redb] store; the
//! trigram text index is rebuilt from the store at startup and never
//! persisted.
//!
//! [redb]: https://github.com/cberner/redb
//!
//! # Quick start
//!
//! ```no_run
//! use quire::{Catalog, DataDir, Document, ContentHash};
//!
//! let data_dir = DataDir::resolve(None).unwrap();
//! let catalog = Catalog::open(&data_dir.catalog_db()).unwrap();
//!
//! let bytes = std::fs::read("paper.pdf").unwrap();
//! let id = catalog
//!     .insert(&Document {
//!         title: "Quantum Computing Basics".into(),
//!         authors: vec!["A. Turing".into()],
//!         keywords: vec!["quantum".into()],
//!         extension: "pdf".into(),
//!         hash: ContentHash::of(&bytes),
//!     })
//!     .unwrap();
//!
//! for hit in catalog.search("quantum") {
//!     let doc = catalog.get(hit).unwrap();
//!     println!("{hit}: {}", doc.title);
//! }
//! # let _ = id;
//! ```

pub mod backup;
pub mod catalog;
pub mod data_dir;
pub mod document;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod store;

pub use catalog::Catalog;
pub use data_dir::DataDir;
pub use document::{ContentHash, Document, DocumentId};
pub use error::{Error, Result};
pub use index::TextIndex;
pub use store::DocumentStore;
