//! Embeddings: `POST /embeddings`.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::api::moderations::ModerationResponse;
use crate::api::Usage;
use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "embeddings";

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
    pub user: Option<String>,
    /// `float` or `base64`.
    pub encoding_format: Option<String>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: Vec<String>) -> Self {
        Self {
            model: model.into(),
            input,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingResponse {
    pub object: String,
    pub data: Vec<Embedding>,
    pub model: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embedding {
    pub object: String,
    pub embedding: Vec<f64>,
    pub index: u64,
}

impl Client {
    /// Embed each input. An answer without data is an error.
    pub async fn create_embeddings(
        &self,
        request: &EmbeddingRequest,
        organization_id: Option<&str>,
    ) -> Result<EmbeddingResponse, ClientError> {
        let response = self
            .send_json::<Json<EmbeddingResponse>, _>(
                Some(request),
                &self.endpoint(ENDPOINT),
                Method::POST,
                organization_id,
            )
            .await?;
        if response.data.is_empty() {
            return Err(ClientError::EmptyResult("no data in response"));
        }
        Ok(response)
    }

    pub async fn create_embeddings_moderated(
        &self,
        request: &EmbeddingRequest,
        organization_id: Option<&str>,
    ) -> Result<(EmbeddingResponse, ModerationResponse), ClientError> {
        let moderation = self
            .ensure_unflagged(request.input.clone(), organization_id)
            .await?;
        let response = self.create_embeddings(request, organization_id).await?;
        Ok((response, moderation))
    }
}
