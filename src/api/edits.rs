//! Deprecated text edits: `POST /edits`.
//!
//! Kept for accounts that still have access; chat completions replace it.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::api::moderations::ModerationResponse;
use crate::api::Usage;
use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "edits";

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    pub model: String,
    pub input: String,
    pub instruction: String,
    pub n: Option<u64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl EditRequest {
    pub fn new(
        model: impl Into<String>,
        input: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            instruction: instruction.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditResponse {
    pub object: String,
    pub created: u64,
    pub choices: Vec<EditChoice>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditChoice {
    pub text: String,
    pub index: u64,
}

impl Client {
    pub async fn create_edit(
        &self,
        request: &EditRequest,
        organization_id: Option<&str>,
    ) -> Result<EditResponse, ClientError> {
        let response = self
            .send_json::<Json<EditResponse>, _>(
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

    pub async fn create_edit_moderated(
        &self,
        request: &EditRequest,
        organization_id: Option<&str>,
    ) -> Result<(EditResponse, ModerationResponse), ClientError> {
        let moderation = self
            .ensure_unflagged(vec![request.input.clone()], organization_id)
            .await?;
        let response = self.create_edit(request, organization_id).await?;
        Ok((response, moderation))
    }
}
