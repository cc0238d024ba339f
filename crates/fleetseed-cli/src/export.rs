use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use fleetseed_cloud::DocumentStore;

use crate::error::CliError;

/// File name an export of `collection` is written to.
pub fn export_file_name(collection: &str) -> String {
    format!("{collection}_export.json")
}

/// Read every document of `collection` and write them as a pretty-printed
/// JSON array to `<out_dir>/<collection>_export.json`.
///
/// Each element carries the document's fields with `id` set from its key.
/// Returns the written path and the number of documents.
pub async fn export_collection(
    store: &dyn DocumentStore,
    collection: &str,
    out_dir: &Path,
) -> Result<(PathBuf, usize), CliError> {
    let documents = store.read_all(collection).await?;
    let count = documents.len();
    let records: Vec<Value> = documents.into_iter().map(|doc| doc.into_json()).collect();

    let path = out_dir.join(export_file_name(collection));
    let data = serde_json::to_vec_pretty(&records)?;
    write_bytes_atomic(&path, &data)?;

    info!(
        event = "collection_exported",
        collection = %collection,
        documents = count,
        path = %path.display()
    );
    Ok((path, count))
}

/// Write through a sibling temp file and rename it into place.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), CliError> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, CliError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::InvalidConfig("invalid path for export".to_string()))?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
