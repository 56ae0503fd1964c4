//! Uploaded files under `/files`.

use std::path::Path;

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{Client, ClientError};
use crate::form::{FileSource, FormFile, MultipartRequest};
use crate::http::{Binary, Json};

pub const ENDPOINT: &str = "files";

/// Purpose accepted by fine-tuning jobs.
pub const PURPOSE_FINE_TUNE: &str = "fine-tune";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadedFile {
    pub id: String,
    pub object: String,
    pub bytes: u64,
    pub created_at: u64,
    pub filename: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileList {
    pub object: String,
    pub data: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletedFile {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

/// Upload a JSON Lines document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub purpose: String,
    /// Name the file will have on the service, not a path.
    pub filename: String,
    pub source: FileSource,
}

impl UploadRequest {
    pub fn new(purpose: impl Into<String>, source: impl Into<FileSource>) -> Self {
        let source = source.into();
        Self {
            purpose: purpose.into(),
            filename: source.file_name(),
            source,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

impl Client {
    /// List files belonging to the organization.
    pub async fn list_files(&self, organization_id: Option<&str>) -> Result<FileList, ClientError> {
        self.send_empty::<Json<FileList>>(&self.endpoint(ENDPOINT), Method::GET, organization_id)
            .await
    }

    pub async fn upload_file(
        &self,
        request: UploadRequest,
        organization_id: Option<&str>,
    ) -> Result<UploadedFile, ClientError> {
        let form = MultipartRequest::new()
            .text("purpose", request.purpose)
            .file(FormFile::new("file", request.filename, request.source));
        self.send_multipart::<Json<UploadedFile>>(
            form,
            &self.endpoint(ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }

    pub async fn retrieve_file(
        &self,
        file_id: &str,
        organization_id: Option<&str>,
    ) -> Result<UploadedFile, ClientError> {
        self.send_empty::<Json<UploadedFile>>(
            &self.resource_endpoint(ENDPOINT, &[file_id])?,
            Method::GET,
            organization_id,
        )
        .await
    }

    pub async fn delete_file(
        &self,
        file_id: &str,
        organization_id: Option<&str>,
    ) -> Result<DeletedFile, ClientError> {
        self.send_empty::<Json<DeletedFile>>(
            &self.resource_endpoint(ENDPOINT, &[file_id])?,
            Method::DELETE,
            organization_id,
        )
        .await
    }

    /// Raw contents of an uploaded file.
    pub async fn retrieve_file_content(
        &self,
        file_id: &str,
        organization_id: Option<&str>,
    ) -> Result<Bytes, ClientError> {
        self.send_empty::<Binary>(
            &self.resource_endpoint(ENDPOINT, &[file_id, "content"])?,
            Method::GET,
            organization_id,
        )
        .await
    }

    /// Write the contents of an uploaded file to `path`.
    ///
    /// An existing `path` is only truncated when `overwrite` is set. Nothing
    /// is written if the download fails.
    pub async fn download_file_content(
        &self,
        file_id: &str,
        path: impl AsRef<Path>,
        overwrite: bool,
        organization_id: Option<&str>,
    ) -> Result<(), ClientError> {
        let path = path.as_ref();
        if !overwrite && tokio::fs::try_exists(path).await? {
            return Err(ClientError::FileExists(path.to_path_buf()));
        }

        let content = self.retrieve_file_content(file_id, organization_id).await?;
        tokio::fs::write(path, &content).await?;
        tracing::debug!("Wrote {} bytes of {} to {}", content.len(), file_id, path.display());
        Ok(())
    }
}
