//! Snapshot fetcher: pulls each schema entry's raw JSON response from
//! the content API into the local snapshot store.
//!
//! The store has full-resync semantics: it is cleared wholesale before
//! the first fetch of a run, so no stale snapshot from a deleted or
//! renamed entry ever survives.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::contract::{ApiError, ContentApi};
use crate::schema::ContentSchemaEntry;

/// Snapshot file path for one entry key.
pub fn snapshot_path(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{}.json", key))
}

/// Removes the entire snapshot store and recreates it empty.
pub async fn clear_store(data_dir: &Path) -> std::io::Result<()> {
    if data_dir.exists() {
        fs::remove_dir_all(data_dir).await?;
        debug!(path = %data_dir.display(), "Removed existing snapshot store");
    }
    fs::create_dir_all(data_dir).await?;
    debug!(path = %data_dir.display(), "Created snapshot store");
    Ok(())
}

/// Fetches one entry's content query and persists the body verbatim as
/// `<data_dir>/<key>.json`, overwriting any previous file. Errors are
/// returned to the caller (the driver logs them and moves on); no file
/// is written for a failed fetch.
pub async fn fetch_and_snapshot<A>(
    api: &A,
    entry: &ContentSchemaEntry,
    data_dir: &Path,
) -> Result<PathBuf, ApiError>
where
    A: ContentApi + ?Sized,
{
    info!(key = %entry.key, fetch_path = %entry.fetch_path, "Fetching snapshot");

    let body = api.fetch_json(&entry.fetch_path).await?;

    let path = snapshot_path(data_dir, &entry.key);
    fs::write(&path, body.as_bytes()).await?;
    info!(key = %entry.key, path = %path.display(), "Snapshot saved");

    Ok(path)
}
