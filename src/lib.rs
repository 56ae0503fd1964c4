//! # openai_bind - typed bindings for the OpenAI REST API
//!
//! Every endpoint shares one generic transport: a typed request is serialized
//! as JSON or as a multipart form, the bearer token and organization header are
//! attached from a [`Credentials`] store, and the response body is decoded into
//! a typed value. Binary endpoints (speech, file contents) get the raw bytes
//! back, after the same probe for a `{"error": {...}}` envelope.
//!
//! ## Architecture
//!
//! - [`auth`]: process-wide API key and default organization ID.
//! - [`http`]: the transport, [`Client::send_json`] and [`Client::send_multipart`],
//!   parametrized by a [`Decode`] strategy ([`Json`] or [`Binary`]).
//! - [`form`]: multipart field and file descriptions; files come from a local
//!   path or a URL.
//! - [`api`]: per-endpoint request/response shapes and `Client` methods.
//!
//! No call is retried, cached or streamed. Dropping a call's future cancels the
//! in-flight request.
//!
//! ## Example
//! ```no_run
//! use openai_bind::api::chat::{ChatMessage, ChatRequest};
//! use openai_bind::{auth, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     auth::set_api_key(std::env::var("OPENAI_API_KEY")?)?;
//!     let client = Client::new()?;
//!
//!     let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatMessage::user("Hello!")]);
//!     let response = client.create_chat_completion(&request, None).await?;
//!     println!("{:?}", response.first_content());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod form;
pub mod http;
pub mod options;

pub use auth::Credentials;
pub use client::{ApiError, Client, ClientBuilder, ClientError, DEFAULT_BASE_URL};
pub use form::{FileSource, FormFile, MultipartRequest};
pub use http::{Binary, Decode, Json};
pub use options::TransportOptions;
