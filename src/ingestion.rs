use std::path::{Path, PathBuf};

use crate::{
    catalog::Catalog,
    data_dir::DataDir,
    document::{ContentHash, Document, DocumentId},
    error::{Error, Result},
};

/// Add a file to the catalog.
///
/// Reads the file, hashes its contents, inserts the record, then copies the
/// bytes into the managed files directory under `<hex-hash>.<extension>`. If
/// the copy fails the freshly inserted record is deleted again so the catalog
/// never points at a missing file. The file must have an extension.
pub fn add_document(
    catalog: &Catalog,
    data_dir: &DataDir,
    path: &Path,
    title: String,
    authors: Vec<String>,
    keywords: Vec<String>,
) -> Result<DocumentId> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::Validation {
            kind: "file extension",
            value: path.display().to_string(),
        })?
        .to_string();

    let bytes = std::fs::read(path)?;
    let hash = ContentHash::of(&bytes);

    let document = Document {
        title,
        authors,
        keywords,
        extension,
        hash,
    };
    let destination = stored_path(data_dir, &document)?;

    let id = catalog.insert(&document)?;
    if let Err(err) = std::fs::write(&destination, &bytes) {
        catalog.delete(id)?;
        return Err(err.into());
    }

    tracing::info!(%id, %hash, path = %path.display(), "added document");
    Ok(id)
}

/// Where a document's file lives inside the data directory.
pub fn stored_path(data_dir: &DataDir, document: &Document) -> Result<PathBuf> {
    let filename = format!("{}.{}", document.hash, document.extension);
    Ok(data_dir.files_dir()?.join(filename))
}
