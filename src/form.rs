//! Multipart form descriptions for file-upload endpoints.
//!
//! A [`MultipartRequest`] is an ordered list of scalar fields followed by an
//! ordered list of file attachments. Attachments are only read when the form
//! is turned into a request body, so a failing remote fetch or a missing local
//! file aborts the call before anything is sent to the API.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::Url;

use crate::client::ClientError;

/// Where the bytes of an attachment come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Url(Url),
}

impl FileSource {
    /// Interpret `location` as a URL when it has both a scheme and a host,
    /// otherwise as a local path.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if url.has_host() && !url.scheme().is_empty() => FileSource::Url(url),
            _ => FileSource::Path(PathBuf::from(location)),
        }
    }

    /// Last path or URL segment, used as the default display filename.
    pub fn file_name(&self) -> String {
        match self {
            FileSource::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            FileSource::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl From<&str> for FileSource {
    fn from(location: &str) -> Self {
        FileSource::parse(location)
    }
}

impl From<String> for FileSource {
    fn from(location: String) -> Self {
        FileSource::parse(&location)
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        FileSource::Path(path)
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        FileSource::Path(path.to_path_buf())
    }
}

impl From<Url> for FileSource {
    fn from(url: Url) -> Self {
        FileSource::Url(url)
    }
}

/// A named file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    pub field: String,
    pub filename: String,
    pub source: FileSource,
}

impl FormFile {
    pub fn new(
        field: impl Into<String>,
        filename: impl Into<String>,
        source: impl Into<FileSource>,
    ) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            source: source.into(),
        }
    }

    /// File part whose display name is taken from the source itself.
    pub fn from_source(field: impl Into<String>, source: impl Into<FileSource>) -> Self {
        let source = source.into();
        Self {
            field: field.into(),
            filename: source.file_name(),
            source,
        }
    }
}

/// Ordered scalar fields and file attachments of a multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartRequest {
    fields: Vec<(String, String)>,
    files: Vec<FormFile>,
}

impl MultipartRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar field, stringified with `Display`.
    pub fn text(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }

    /// Append a scalar field only when a value is present.
    pub fn text_opt<V: Display>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn file(mut self, file: FormFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FormFile] {
        &self.files
    }

    /// Materialize the form: scalar fields first, then each file in order.
    pub(crate) async fn into_form(self, http: &reqwest::Client) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = file_part(http, &file.source)
                .await?
                .file_name(file.filename)
                .mime_str("application/octet-stream")
                .map_err(|e| ClientError::RequestBuild(Box::new(e)))?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

async fn file_part(http: &reqwest::Client, source: &FileSource) -> Result<Part, ClientError> {
    match source {
        FileSource::Path(path) => {
            let local_error = |source| ClientError::LocalFile {
                path: path.clone(),
                source,
            };
            let file = tokio::fs::File::open(path).await.map_err(local_error)?;
            let length = file.metadata().await.map_err(local_error)?.len();
            tracing::debug!("Attaching {} ({} bytes)", path.display(), length);
            Ok(Part::stream_with_length(file, length))
        }
        FileSource::Url(url) => {
            let response = http
                .get(url.clone())
                .send()
                .await
                .map_err(ClientError::Transport)?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::RemoteFetch {
                    url: url.to_string(),
                    status,
                });
            }
            let bytes = response.bytes().await.map_err(ClientError::BodyRead)?;
            let length = bytes.len() as u64;
            tracing::debug!("Attaching {} ({} bytes)", url, length);
            Ok(Part::stream_with_length(bytes, length))
        }
    }
}
