//! Chat completions: `POST /chat/completions`.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::api::moderations::ModerationResponse;
use crate::api::Usage;
use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "chat/completions";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Tool,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// `{"type": "json_object"}` or `{"type": "text"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

/// Request body for the chat completions endpoint.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub n: Option<u64>,
    pub stop: Option<Vec<String>>,
    pub max_tokens: Option<u64>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub logit_bias: Option<HashMap<String, i64>>,
    pub user: Option<String>,
    pub seed: Option<i64>,
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub system_fingerprint: Option<String>,
    pub usage: Usage,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatChoice {
    pub index: u64,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl Client {
    /// Create a chat completion. An answer without choices is an error.
    pub async fn create_chat_completion(
        &self,
        request: &ChatRequest,
        organization_id: Option<&str>,
    ) -> Result<ChatResponse, ClientError> {
        let response = self
            .send_json::<Json<ChatResponse>, _>(
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

    /// Screen every message body with the moderation endpoint first.
    pub async fn create_chat_completion_moderated(
        &self,
        request: &ChatRequest,
        organization_id: Option<&str>,
    ) -> Result<(ChatResponse, ModerationResponse), ClientError> {
        let inputs = request
            .messages
            .iter()
            .filter_map(|message| message.content.clone())
            .collect();
        let moderation = self.ensure_unflagged(inputs, organization_id).await?;
        let response = self.create_chat_completion(request, organization_id).await?;
        Ok((response, moderation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatMessage::user("Hello!")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "Hello!"}]
            })
        );
    }
}
