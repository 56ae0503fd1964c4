//! Content moderation: `POST /moderations`.
//!
//! Besides the plain endpoint, [`Client::ensure_unflagged`] is the pre-flight
//! check used by the `*_moderated` helpers of the generation endpoints.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "moderations";

/// The stable moderation model.
pub const MODEL_STABLE: &str = "text-moderation-stable";
/// The latest moderation model, upgraded over time.
pub const MODEL_LATEST: &str = "text-moderation-latest";

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub input: Vec<String>,
    pub model: Option<String>,
}

impl ModerationRequest {
    pub fn new(input: Vec<String>) -> Self {
        Self { input, model: None }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationResponse {
    pub id: String,
    pub model: String,
    pub results: Vec<ModerationResult>,
}

impl ModerationResponse {
    /// Whether any input was flagged.
    pub fn flagged(&self) -> bool {
        self.results.iter().any(|result| result.flagged)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationResult {
    pub flagged: bool,
    pub categories: HashMap<String, bool>,
    pub category_scores: HashMap<String, f64>,
}

impl Client {
    /// Classify inputs. An answer without results is an error.
    pub async fn create_moderation(
        &self,
        request: &ModerationRequest,
        organization_id: Option<&str>,
    ) -> Result<ModerationResponse, ClientError> {
        let response = self
            .send_json::<Json<ModerationResponse>, _>(
                Some(request),
                &self.endpoint(ENDPOINT),
                Method::POST,
                organization_id,
            )
            .await?;
        if response.results.is_empty() {
            return Err(ClientError::EmptyResult("no results in response"));
        }
        Ok(response)
    }

    /// Run `input` through the latest moderation model and fail with
    /// [`ClientError::Flagged`] if anything was flagged.
    pub async fn ensure_unflagged(
        &self,
        input: Vec<String>,
        organization_id: Option<&str>,
    ) -> Result<ModerationResponse, ClientError> {
        let request = ModerationRequest::new(input).with_model(MODEL_LATEST);
        let response = self.create_moderation(&request, organization_id).await?;
        if response.flagged() {
            tracing::debug!("Moderation {} flagged request input", response.id);
            return Err(ClientError::Flagged(Box::new(response)));
        }
        Ok(response)
    }
}
