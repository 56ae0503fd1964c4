//! Fine-tuning jobs under `/fine_tuning/jobs`.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::api::paginated;
use crate::client::{Client, ClientError};
use crate::http::Json;

pub const ENDPOINT: &str = "fine_tuning/jobs";

/// Values are either numbers or the string `"auto"`, so they stay untyped.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    pub batch_size: Option<serde_json::Value>,
    pub learning_rate_multiplier: Option<serde_json::Value>,
    pub n_epochs: Option<serde_json::Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FineTuningJobRequest {
    pub model: String,
    /// ID of an uploaded JSONL file with purpose `fine-tune`.
    pub training_file: String,
    pub hyperparameters: Option<Hyperparameters>,
    /// Up to 18 characters added to the fine-tuned model name.
    pub suffix: Option<String>,
    pub validation_file: Option<String>,
}

impl FineTuningJobRequest {
    pub fn new(model: impl Into<String>, training_file: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            training_file: training_file.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningJob {
    pub id: String,
    pub object: String,
    pub created_at: u64,
    pub finished_at: Option<u64>,
    pub model: String,
    pub fine_tuned_model: Option<String>,
    pub organization_id: String,
    pub status: String,
    pub hyperparameters: Hyperparameters,
    pub training_file: String,
    pub validation_file: Option<String>,
    pub result_files: Vec<String>,
    pub trained_tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningJobList {
    pub object: String,
    pub data: Vec<FineTuningJob>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningEvent {
    pub id: String,
    pub object: String,
    pub created_at: u64,
    pub level: String,
    pub message: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningEventList {
    pub object: String,
    pub data: Vec<FineTuningEvent>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletedModel {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

impl Client {
    /// Enqueue a job fine-tuning `model` on an uploaded training file.
    pub async fn create_fine_tuning_job(
        &self,
        request: &FineTuningJobRequest,
        organization_id: Option<&str>,
    ) -> Result<FineTuningJob, ClientError> {
        self.send_json::<Json<FineTuningJob>, _>(
            Some(request),
            &self.endpoint(ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }

    pub async fn list_fine_tuning_jobs(
        &self,
        after: Option<&str>,
        limit: Option<u64>,
        organization_id: Option<&str>,
    ) -> Result<FineTuningJobList, ClientError> {
        self.send_empty::<Json<FineTuningJobList>>(
            &paginated(self.endpoint(ENDPOINT), after, limit)?,
            Method::GET,
            organization_id,
        )
        .await
    }

    pub async fn retrieve_fine_tuning_job(
        &self,
        job_id: &str,
        organization_id: Option<&str>,
    ) -> Result<FineTuningJob, ClientError> {
        self.send_empty::<Json<FineTuningJob>>(
            &self.resource_endpoint(ENDPOINT, &[job_id])?,
            Method::GET,
            organization_id,
        )
        .await
    }

    pub async fn cancel_fine_tuning_job(
        &self,
        job_id: &str,
        organization_id: Option<&str>,
    ) -> Result<FineTuningJob, ClientError> {
        self.send_empty::<Json<FineTuningJob>>(
            &self.resource_endpoint(ENDPOINT, &[job_id, "cancel"])?,
            Method::POST,
            organization_id,
        )
        .await
    }

    /// Status updates of a job.
    pub async fn list_fine_tuning_events(
        &self,
        job_id: &str,
        after: Option<&str>,
        limit: Option<u64>,
        organization_id: Option<&str>,
    ) -> Result<FineTuningEventList, ClientError> {
        self.send_empty::<Json<FineTuningEventList>>(
            &paginated(
                self.resource_endpoint(ENDPOINT, &[job_id, "events"])?,
                after,
                limit,
            )?,
            Method::GET,
            organization_id,
        )
        .await
    }

    /// Delete a fine-tuned model. Requires the Owner role in the organization.
    pub async fn delete_fine_tuned_model(
        &self,
        model: &str,
        organization_id: Option<&str>,
    ) -> Result<DeletedModel, ClientError> {
        self.send_empty::<Json<DeletedModel>>(
            &self.resource_endpoint(crate::api::models::ENDPOINT, &[model])?,
            Method::DELETE,
            organization_id,
        )
        .await
    }
}
