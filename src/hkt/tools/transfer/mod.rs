//! Moving the source workbook and the generated reports to and from remote
//! storage.

pub mod credentials;
pub mod drive;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::hkt::tools::error::{Result, ToolError};

pub use credentials::{CredentialProvider, Credentials, DRIVE_SCOPE, ServiceAccountProvider};
pub use drive::DriveFileStore;

/// A file held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    /// Link for viewing the file in a browser, when the store provides one.
    #[serde(rename = "webViewLink", default)]
    pub url: Option<String>,
}

/// Primitive operations of a remote file store.
pub trait FileStore {
    /// Downloads the content of `file_id`.
    fn fetch(&self, file_id: &str) -> Result<Vec<u8>>;

    /// Lists the files called `name` directly under `parent_id`.
    fn find_by_name(&self, name: &str, parent_id: &str) -> Result<Vec<RemoteFile>>;

    fn delete(&self, file_id: &str) -> Result<()>;

    /// Stores `bytes` as a new file called `name` under `parent_id`.
    fn create(&self, name: &str, bytes: Vec<u8>, parent_id: &str) -> Result<RemoteFile>;
}

/// Downloads `file_id` to `output`, replacing any existing file.
#[instrument(level = "info", skip(store), fields(output = %output.display()))]
pub fn download_input_file(store: &dyn FileStore, file_id: &str, output: &Path) -> Result<PathBuf> {
    match fs::remove_file(output) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    let bytes = store.fetch(file_id)?;
    fs::write(output, &bytes)?;
    info!(size = bytes.len(), "downloaded input file");
    Ok(output.to_path_buf())
}

/// Uploads `path` under `parent_id`, named after the file stem.
///
/// Files of the same name already under the parent are deleted first.
pub fn upload_file(store: &dyn FileStore, path: &Path, parent_id: &str) -> Result<RemoteFile> {
    if !path.is_file() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| ToolError::MissingInput(path.to_path_buf()))?;

    for existing in store.find_by_name(&name, parent_id)? {
        store.delete(&existing.id)?;
        info!(name = %existing.name, id = %existing.id, "deleted previous upload");
    }

    let bytes = fs::read(path)?;
    let uploaded = store.create(&name, bytes, parent_id)?;
    info!(
        name = %uploaded.name,
        url = uploaded.url.as_deref().unwrap_or(""),
        "uploaded file"
    );
    Ok(uploaded)
}

/// Uploads every file in `paths`. All paths are checked before the first
/// upload starts.
#[instrument(level = "info", skip(store, paths), fields(count = paths.len()))]
pub fn upload_files(
    store: &dyn FileStore,
    paths: &[PathBuf],
    parent_id: &str,
) -> Result<Vec<RemoteFile>> {
    if let Some(missing) = paths.iter().find(|path| !path.is_file()) {
        return Err(ToolError::MissingInput(missing.clone()));
    }
    paths
        .iter()
        .map(|path| upload_file(store, path, parent_id))
        .collect()
}
