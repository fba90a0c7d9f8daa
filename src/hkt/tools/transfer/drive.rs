use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::transfer::credentials::Credentials;
use crate::hkt::tools::transfer::{FileStore, RemoteFile};

const API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const FILE_FIELDS: &str = "id,name,webViewLink";

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<RemoteFile>,
}

/// [`FileStore`] backed by the Google Drive v3 REST API.
pub struct DriveFileStore {
    client: Client,
    token: String,
}

impl DriveFileStore {
    /// Obtains an access token for `credentials` and returns a ready store.
    pub fn connect(credentials: &Credentials) -> Result<Self> {
        let client = Client::new();
        let token = credentials.access_token(&client)?;
        Ok(Self { client, token })
    }

    fn send(&self, request: RequestBuilder, what: &str, id: &str) -> Result<Response> {
        let response = request.bearer_auth(&self.token).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ToolError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ToolError::Transfer(format!("{what} {id} failed with {status}: {body}")));
        }
        Ok(response)
    }
}

impl FileStore for DriveFileStore {
    fn fetch(&self, file_id: &str) -> Result<Vec<u8>> {
        let request = self
            .client
            .get(format!("{API_BASE}/files/{file_id}"))
            .query(&[("alt", "media"), ("supportsAllDrives", "true")]);
        let bytes = self.send(request, "download of", file_id)?.bytes()?;
        debug!(file_id, size = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }

    fn find_by_name(&self, name: &str, parent_id: &str) -> Result<Vec<RemoteFile>> {
        let query = format!(
            "name = '{}' and '{}' in parents and trashed = false",
            escape_query(name),
            escape_query(parent_id)
        );
        let request = self.client.get(format!("{API_BASE}/files")).query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name,webViewLink)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        let list: FileList = self.send(request, "listing of", parent_id)?.json()?;
        Ok(list.files)
    }

    fn delete(&self, file_id: &str) -> Result<()> {
        let request = self
            .client
            .delete(format!("{API_BASE}/files/{file_id}"))
            .query(&[("supportsAllDrives", "true")]);
        self.send(request, "deletion of", file_id)?;
        Ok(())
    }

    fn create(&self, name: &str, bytes: Vec<u8>, parent_id: &str) -> Result<RemoteFile> {
        let metadata = json!({ "name": name, "parents": [parent_id] });
        let request = self
            .client
            .post(format!("{API_BASE}/files"))
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")])
            .json(&metadata);
        let created: RemoteFile = self.send(request, "creation of", name)?.json()?;

        let request = self
            .client
            .patch(format!("{UPLOAD_BASE}/files/{}", created.id))
            .query(&[
                ("uploadType", "media"),
                ("fields", FILE_FIELDS),
                ("supportsAllDrives", "true"),
            ])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        let uploaded = self
            .send(request, "upload of", &created.id)
            .and_then(|response| Ok(response.json::<RemoteFile>()?));
        discard_on_failure(uploaded, || self.delete(&created.id))
    }
}

/// Runs `discard` when `result` failed and returns `result` unchanged. A
/// failing `discard` is only logged so the original error is kept.
fn discard_on_failure<T>(result: Result<T>, discard: impl FnOnce() -> Result<()>) -> Result<T> {
    if let Err(error) = &result {
        match discard() {
            Ok(()) => debug!(%error, "removed placeholder of failed upload"),
            Err(cleanup) => warn!(%error, %cleanup, "failed to remove placeholder of failed upload"),
        }
    }
    result
}

fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
