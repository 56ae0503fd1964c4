//! Legacy text completions: `POST /completions`.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::api::moderations::ModerationResponse;
use crate::api::Usage;
use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "completions";

/// Request body for the completions endpoint.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: Option<Vec<String>>,
    pub suffix: Option<String>,
    pub max_tokens: Option<u64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub n: Option<u64>,
    pub logprobs: Option<u64>,
    pub echo: Option<bool>,
    pub stop: Option<Vec<String>>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub best_of: Option<u64>,
    pub logit_bias: Option<HashMap<String, i64>>,
    pub user: Option<String>,
    pub seed: Option<i64>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: Some(vec![prompt.into()]),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub system_fingerprint: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u64,
    pub finish_reason: Option<String>,
    pub logprobs: Option<LogProbs>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogProbs {
    pub tokens: Vec<String>,
    pub token_logprobs: Vec<Option<f64>>,
    pub top_logprobs: Vec<Option<HashMap<String, f64>>>,
    pub text_offset: Vec<u64>,
}

impl Client {
    /// Create a completion. An answer without choices is an error.
    pub async fn create_completion(
        &self,
        request: &CompletionRequest,
        organization_id: Option<&str>,
    ) -> Result<CompletionResponse, ClientError> {
        let response = self
            .send_json::<Json<CompletionResponse>, _>(
                Some(request),
                &self.endpoint(ENDPOINT),
                Method::POST,
                organization_id,
            )
            .await?;
        if response.choices.is_empty() {
            return Err(ClientError::EmptyResult("no choices in response"));
        }
        Ok(response)
    }

    /// Screen the prompts with the moderation endpoint, then create the
    /// completion. Flagged prompts never reach the completions endpoint.
    pub async fn create_completion_moderated(
        &self,
        request: &CompletionRequest,
        organization_id: Option<&str>,
    ) -> Result<(CompletionResponse, ModerationResponse), ClientError> {
        let moderation = self
            .ensure_unflagged(request.prompt.clone().unwrap_or_default(), organization_id)
            .await?;
        let response = self.create_completion(request, organization_id).await?;
        Ok((response, moderation))
    }
}
