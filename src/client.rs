//! Client handle and error types.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::moderations::ModerationResponse;
use crate::auth::Credentials;
use crate::http::build_http_client;
use crate::options::TransportOptions;

/// Base URL of every endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Boxed error used where several unrelated sources collapse into one variant.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Empty value: {0} must not be empty")]
    EmptyValue(&'static str),

    #[error("Failed to build request: {0}")]
    RequestBuild(#[source] BoxError),

    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Empty response received (status {status})")]
    NilResponse { status: StatusCode },

    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to retrieve file from {url}: status {status}")]
    RemoteFetch { url: String, status: StatusCode },

    #[error("Failed to open {}: {source}", .path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The service answered with an error envelope. `body` is the raw
    /// response, which binary callers may still want to inspect.
    #[error("API error: {error}")]
    Service { error: ApiError, body: Bytes },

    #[error("HTTP {status}: {}", String::from_utf8_lossy(.body))]
    UnexpectedStatus { status: StatusCode, body: Bytes },

    #[error("{0}")]
    EmptyResult(&'static str),

    #[error("One or more request inputs were flagged by the moderations endpoint")]
    Flagged(Box<ModerationResponse>),

    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The decoded error envelope, if the service sent one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Service { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Error object carried in `{"error": {...}}` response envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub param: Option<serde_json::Value>,
    pub code: Option<serde_json::Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.error_type, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Handle for issuing authenticated calls.
///
/// Cloning is cheap; the underlying connection pool and credential store are
/// shared between clones.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: Arc<Credentials>,
    base_url: String,
    transport_options: TransportOptions,
}

impl Client {
    /// Client against the public API, authenticated from the process-wide store.
    pub fn new() -> Result<Self, ClientError> {
        ClientBuilder::new().build()
    }

    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Credential store read on every call.
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get reference to the transport options.
    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// Fully qualified URL for an endpoint path such as `chat/completions`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Endpoint URL for `path` followed by `segments`, each percent-encoded as
    /// a single path segment, e.g. `files` + `[file_id, "content"]`.
    pub fn resource_endpoint(&self, path: &str, segments: &[&str]) -> Result<String, ClientError> {
        let mut url = parse_url(&self.endpoint(path))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("base URL cannot carry path segments".to_string()))?
            .extend(segments);
        Ok(url.into())
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|e| ClientError::Config(format!("invalid URL {url}: {e}")))
}

/// Builder for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    credentials: Option<Arc<Credentials>>,
    transport_options: TransportOptions,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            transport_options: TransportOptions::default(),
        }
    }

    /// Point the client at another API prefix, e.g. a local mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a dedicated credential store instead of the process-wide one.
    pub fn credentials(mut self, credentials: Arc<Credentials>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn transport_options(mut self, transport_options: TransportOptions) -> Self {
        self.transport_options = transport_options;
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let mut base_url = self.base_url;
        if Url::parse(&base_url).is_err() {
            return Err(ClientError::Config(format!("invalid base URL: {base_url}")));
        }
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let http = build_http_client(&self.transport_options)
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Client {
            http,
            credentials: self.credentials.unwrap_or_else(Credentials::global),
            base_url,
            transport_options: self.transport_options,
        })
    }
}
