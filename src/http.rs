//! Generic authenticated transport shared by every endpoint.
//!
//! Every call goes through [`Client::send_json`] or [`Client::send_multipart`].
//! Both attach the bearer token and organization header from the client's
//! [`Credentials`](crate::auth::Credentials), execute the request, read the
//! whole body, and hand it to a [`Decode`] strategy. Before decoding, the body
//! is probed for the `{"error": {...}}` envelope, whatever the expected shape:
//! binary endpoints can fail with a JSON body too.

use std::marker::PhantomData;

use bytes::Bytes;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{AUTH_SCHEME, ORGANIZATION_HEADER};
use crate::client::{ApiError, Client, ClientError};
use crate::form::MultipartRequest;
use crate::options::TransportOptions;

/// Build a configured HTTP client from transport options.
pub fn build_http_client(
    transport_options: &TransportOptions,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = transport_options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy_url) = &transport_options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Add extra headers to a request if specified in transport options.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    transport_options: &TransportOptions,
) -> RequestBuilder {
    if let Some(headers) = &transport_options.headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

/// How a response body turns into the caller's value.
pub trait Decode {
    /// Value handed back to the caller.
    type Output;

    /// Whether an empty body is a valid payload rather than a nil response.
    const ACCEPTS_EMPTY: bool = false;

    fn decode(body: Bytes) -> Result<Self::Output, ClientError>;
}

/// Decode the body as JSON into `T`.
#[derive(Debug)]
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned> Decode for Json<T> {
    type Output = T;

    fn decode(body: Bytes) -> Result<T, ClientError> {
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }
}

/// Keep the body verbatim.
#[derive(Debug)]
pub struct Binary;

impl Decode for Binary {
    type Output = Bytes;

    const ACCEPTS_EMPTY: bool = true;

    fn decode(body: Bytes) -> Result<Bytes, ClientError> {
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ApiError>,
}

/// Look for a non-null `error` object in a response body.
///
/// Bodies that are not JSON objects (audio, file contents) simply yield `None`.
pub fn probe_error(body: &[u8]) -> Option<ApiError> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
}

/// Extension trait for RequestBuilder that logs request body.
pub trait RequestBuilderExt {
    /// Set JSON request body and log it. Returns the RequestBuilder for chaining.
    fn json_logged<T: Serialize + ?Sized>(self, json: &T) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_logged<T: Serialize + ?Sized>(self, json: &T) -> Self {
        if let Ok(req_body) = serde_json::to_string_pretty(json) {
            tracing::debug!("API request body ({} bytes):\n{}", req_body.len(), req_body);
        }

        self.json(json)
    }
}

/// Extension trait for Response that reads and logs the whole body.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Read the full body and log it. Consumes the response.
    async fn bytes_logged(self) -> Result<Bytes, reqwest::Error>;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn bytes_logged(self) -> Result<Bytes, reqwest::Error> {
        let bytes = self.bytes().await?;

        match std::str::from_utf8(&bytes) {
            Ok(text) => tracing::debug!("API response ({} bytes):\n{}", text.len(), text),
            Err(_) => tracing::debug!("API response ({} bytes, binary)", bytes.len()),
        }

        Ok(bytes)
    }
}

impl Client {
    /// Send an optional JSON payload and decode the response with `D`.
    ///
    /// `endpoint` is a fully qualified URL, see [`Client::endpoint`]. The
    /// organization header is `organization_id` when given, else the store's
    /// default when non-empty, else absent.
    pub async fn send_json<D, P>(
        &self,
        payload: Option<&P>,
        endpoint: &str,
        method: Method,
        organization_id: Option<&str>,
    ) -> Result<D::Output, ClientError>
    where
        D: Decode,
        P: Serialize + ?Sized,
    {
        let mut request =
            add_extra_headers(self.http.request(method, endpoint), self.transport_options())
                .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = payload {
            request = request.json_logged(payload);
        }

        self.execute::<D>(request, organization_id).await
    }

    /// Send a bodiless request, as used by GET and DELETE endpoints.
    pub async fn send_empty<D: Decode>(
        &self,
        endpoint: &str,
        method: Method,
        organization_id: Option<&str>,
    ) -> Result<D::Output, ClientError> {
        self.send_json::<D, ()>(None, endpoint, method, organization_id)
            .await
    }

    /// Send a multipart form and decode the response with `D`.
    ///
    /// Files are fetched or opened before the API request is dispatched; a
    /// sourcing failure returns early without contacting `endpoint`.
    pub async fn send_multipart<D: Decode>(
        &self,
        form: MultipartRequest,
        endpoint: &str,
        method: Method,
        organization_id: Option<&str>,
    ) -> Result<D::Output, ClientError> {
        tracing::debug!(
            "API multipart request: fields {:?}, files {:?}",
            form.fields(),
            form.files()
        );
        let form = form.into_form(&self.http).await?;
        let request =
            add_extra_headers(self.http.request(method, endpoint), self.transport_options())
                .multipart(form);

        self.execute::<D>(request, organization_id).await
    }

    /// Set the bearer token and organization header on a built request,
    /// replacing any extra header of the same name. Credentials are read
    /// here, before dispatch.
    fn insert_credentials(
        &self,
        request: &mut reqwest::Request,
        organization_id: Option<&str>,
    ) -> Result<(), ClientError> {
        let headers = request.headers_mut();
        let auth = format!("{}{}", AUTH_SCHEME, self.credentials.api_key());
        let auth = HeaderValue::try_from(auth)
            .map_err(|e| ClientError::RequestBuild(Box::new(e)))?;
        headers.insert(AUTHORIZATION, auth);

        match self.credentials.organization_for(organization_id) {
            Some(org) => {
                let org = HeaderValue::try_from(org)
                    .map_err(|e| ClientError::RequestBuild(Box::new(e)))?;
                headers.insert(ORGANIZATION_HEADER, org);
            }
            None => {
                headers.remove(ORGANIZATION_HEADER);
            }
        }
        Ok(())
    }

    async fn execute<D: Decode>(
        &self,
        request: RequestBuilder,
        organization_id: Option<&str>,
    ) -> Result<D::Output, ClientError> {
        let mut request = request
            .build()
            .map_err(|e| ClientError::RequestBuild(Box::new(e)))?;
        self.insert_credentials(&mut request, organization_id)?;
        tracing::debug!("API request: {} {}", request.method(), request.url());

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ClientError::Transport)?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.bytes_logged().await.map_err(ClientError::BodyRead)?;
        if body.is_empty() && !D::ACCEPTS_EMPTY {
            return Err(ClientError::NilResponse { status });
        }

        if let Some(error) = probe_error(&body) {
            return Err(ClientError::Service { error, body });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus { status, body });
        }

        D::decode(body)
    }
}
