//! Model listing and lookup under `/models`.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "models";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub owned_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<Model>,
}

impl Client {
    /// List available models. An empty listing is an error.
    pub async fn list_models(&self, organization_id: Option<&str>) -> Result<ModelList, ClientError> {
        let response = self
            .send_empty::<Json<ModelList>>(&self.endpoint(ENDPOINT), Method::GET, organization_id)
            .await?;
        if response.data.is_empty() {
            return Err(ClientError::EmptyResult("no data in response"));
        }
        Ok(response)
    }

    pub async fn retrieve_model(
        &self,
        model: &str,
        organization_id: Option<&str>,
    ) -> Result<Model, ClientError> {
        self.send_empty::<Json<Model>>(
            &self.resource_endpoint(ENDPOINT, &[model])?,
            Method::GET,
            organization_id,
        )
        .await
    }
}
