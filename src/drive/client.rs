use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use super::auth::{TokenError, TokenSource};
use super::query::folder_lookup_query;
use super::{DriveFile, DriveStore, FOLDER_MIME_TYPE, NewFile};

const FILES_PATH: &str = "/drive/v3/files";
const UPLOAD_PATH: &str = "/upload/drive/v3/files";

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("invalid metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("authorization failed: {0}")]
    Token(#[from] TokenError),
}

#[derive(Clone)]
pub struct DriveClient {
    http: Client,
    base_url: Url,
    tokens: Arc<TokenSource>,
}

impl DriveClient {
    pub fn with_base_url(base_url: &str, tokens: TokenSource) -> Result<Self, DriveError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
            tokens: Arc::new(tokens),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DriveError> {
        Ok(self.base_url.join(path)?)
    }

    fn file_endpoint(&self, file_id: &str, suffix: &[&str]) -> Result<Url, DriveError> {
        let mut url = self.endpoint(FILES_PATH)?;
        url.path_segments_mut()
            .map_err(|_| DriveError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(file_id)
            .extend(suffix);
        Ok(url)
    }

    async fn bearer(&self) -> Result<String, DriveError> {
        Ok(self.tokens.access_token().await?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DriveError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn handle_empty(response: reqwest::Response) -> Result<(), DriveError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: reqwest::Response) -> DriveError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });
        DriveError::Api { status, message }
    }
}

#[async_trait]
impl DriveStore for DriveClient {
    async fn find_folders(
        &self,
        folder_name: &str,
        parent_id: &str,
    ) -> Result<Vec<DriveFile>, DriveError> {
        let mut url = self.endpoint(FILES_PATH)?;
        url.query_pairs_mut()
            .append_pair("q", &folder_lookup_query(folder_name, parent_id))
            .append_pair("fields", "files(id)")
            .append_pair("orderBy", "createdTime")
            .append_pair("supportsAllDrives", "true")
            .append_pair("includeItemsFromAllDrives", "true");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;
        let list: FileList = Self::handle_response(response).await?;
        Ok(list.files)
    }

    async fn create_folder(
        &self,
        folder_name: &str,
        parent_id: &str,
    ) -> Result<DriveFile, DriveError> {
        let mut url = self.endpoint(FILES_PATH)?;
        url.query_pairs_mut()
            .append_pair("fields", "id")
            .append_pair("supportsAllDrives", "true");
        let metadata = FileMetadata {
            name: folder_name,
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: [parent_id],
        };
        let response = self
            .http
            .post(url)
            .bearer_auth(self.bearer().await?)
            .json(&metadata)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn upload_file(&self, file: NewFile, parent_id: &str) -> Result<DriveFile, DriveError> {
        let mut url = self.endpoint(UPLOAD_PATH)?;
        url.query_pairs_mut()
            .append_pair("uploadType", "multipart")
            .append_pair("fields", "id")
            .append_pair("supportsAllDrives", "true");
        let metadata = serde_json::to_vec(&FileMetadata {
            name: &file.name,
            mime_type: None,
            parents: [parent_id],
        })?;
        let boundary = format!("relay-{}", Uuid::new_v4().simple());
        let body = related_body(&boundary, &metadata, &file);
        let response = self
            .http
            .post(url)
            .bearer_auth(self.bearer().await?)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn share_with_anyone(&self, file_id: &str) -> Result<(), DriveError> {
        let mut url = self.file_endpoint(file_id, &["permissions"])?;
        url.query_pairs_mut().append_pair("supportsAllDrives", "true");
        let response = self
            .http
            .post(url)
            .bearer_auth(self.bearer().await?)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), DriveError> {
        let mut url = self.file_endpoint(file_id, &[])?;
        url.query_pairs_mut().append_pair("supportsAllDrives", "true");
        let response = self
            .http
            .delete(url)
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;
        Self::handle_empty(response).await
    }
}

/// Metadata part first, media part second.
fn related_body(boundary: &str, metadata: &[u8], file: &NewFile) -> Vec<u8> {
    let mut body = Vec::with_capacity(file.data.len() + metadata.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.mime_type).as_bytes());
    body.extend_from_slice(&file.data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    parents: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}
