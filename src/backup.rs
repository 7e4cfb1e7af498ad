use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{catalog::Catalog, document::Document, error::Result};

#[derive(Debug, Serialize, Deserialize)]
struct Backup {
    docs: Vec<Document>,
}

/// Write every catalog record to a pretty-printed JSON file.
pub fn save(catalog: &Catalog, path: &Path) -> Result<usize> {
    let mut docs = Vec::new();
    catalog.for_each(|_, document| {
        docs.push(document);
        Ok(())
    })?;

    let count = docs.len();
    let json = serde_json::to_string_pretty(&Backup { docs })?;
    std::fs::write(path, json)?;

    tracing::info!(count, path = %path.display(), "saved backup");
    Ok(count)
}

/// Insert every document from a JSON backup through the catalog, so the
/// index stays in sync. The first failure, including a duplicate content
/// hash, aborts the load and propagates.
pub fn load(catalog: &Catalog, path: &Path) -> Result<usize> {
    let bytes = std::fs::read(path)?;
    let backup: Backup = serde_json::from_slice(&bytes)?;

    let count = backup.docs.len();
    for document in &backup.docs {
        catalog.insert(document)?;
    }

    tracing::info!(count, path = %path.display(), "loaded backup");
    Ok(count)
}
