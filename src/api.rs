//! Endpoint bindings.
//!
//! Each module holds the request/response shapes of one API family and the
//! `Client` methods that send them through the shared transport.

pub mod audio;
pub mod chat;
pub mod completions;
pub mod edits;
pub mod embeddings;
pub mod files;
pub mod fine_tuning;
pub mod images;
pub mod models;
pub mod moderations;

use serde::{Deserialize, Serialize};

use crate::client::{parse_url, ClientError};

/// Token accounting included in most responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Append `after`/`limit` pagination parameters to an endpoint URL.
pub(crate) fn paginated(
    endpoint: String,
    after: Option<&str>,
    limit: Option<u64>,
) -> Result<String, ClientError> {
    if after.is_none() && limit.is_none() {
        return Ok(endpoint);
    }

    let mut url = parse_url(&endpoint)?;
    {
        let mut query = url.query_pairs_mut();
        if let Some(after) = after {
            query.append_pair("after", after);
        }
        if let Some(limit) = limit {
            query.append_pair("limit", &limit.to_string());
        }
    }
    Ok(url.into())
}
