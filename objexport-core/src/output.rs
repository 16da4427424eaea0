//! YAML output for collected descriptions.
//!
//! Writes are plain overwrites: no temp files, no rename, no rollback. In
//! split mode a failure part way through leaves the files already written.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::Result;
use crate::error::ObjExportError;
use crate::models::DescriptionCollection;

/// Serializes any document to YAML text.
///
/// # Errors
/// Returns a serialization error if the document cannot be represented.
pub fn to_yaml<T: Serialize + ?Sized>(document: &T) -> Result<String> {
    serde_yaml::to_string(document)
        .map_err(|e| ObjExportError::serialization("YAML serialization", e))
}

/// Path of the per-object file for `name` inside `dir`.
///
/// # Errors
/// Returns a configuration error if `name` is empty, `.`/`..`, or contains
/// a path separator, since the file would land outside `dir`.
pub fn object_file_path(dir: &Path, name: &str) -> Result<PathBuf> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ObjExportError::configuration(format!(
            "Object name '{name}' cannot be used as a file name"
        )));
    }
    Ok(dir.join(format!("{name}.yaml")))
}

/// Writes the whole collection as one YAML mapping to `path`.
///
/// # Errors
/// Returns error if serialization or the write fails.
pub async fn write_combined(collection: &DescriptionCollection, path: &Path) -> Result<()> {
    let yaml = to_yaml(collection)?;
    write_file(path, &yaml).await?;
    info!(path = %path.display(), objects = collection.len(), "Wrote combined schema file");
    Ok(())
}

/// Writes one `<name>.yaml` per entry into `dir`, in collection order.
///
/// `dir` is created (non-recursively) when it does not exist.
///
/// # Errors
/// Returns error if the directory cannot be created, or on the first
/// serialization or write failure.
pub async fn write_split(collection: &DescriptionCollection, dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dir).await?;

    let mut written = Vec::with_capacity(collection.len());
    for (name, description) in collection.iter() {
        let path = object_file_path(dir, name)?;
        let yaml = to_yaml(description)?;
        write_file(&path, &yaml).await?;
        debug!(path = %path.display(), "Wrote object schema file");
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "Wrote split schema files");
    Ok(written)
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    let exists = tokio::fs::try_exists(dir).await.map_err(|e| {
        ObjExportError::io(format!("Failed to check output directory {}", dir.display()), e)
    })?;
    if exists {
        return Ok(());
    }

    tokio::fs::create_dir(dir).await.map_err(|e| {
        ObjExportError::io(format!("Failed to create output directory {}", dir.display()), e)
    })?;
    debug!(dir = %dir.display(), "Created output directory");
    Ok(())
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ObjExportError::io(format!("Failed to write to {}", path.display()), e))
}
