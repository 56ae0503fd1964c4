//! Process-wide credential store.
//!
//! The API key and the default organization ID are held behind two independent
//! reader/writer locks, so reading one never waits on a write to the other.
//! Most programs set the key once at startup through the free functions in this
//! module and never touch it again; tests build their own [`Credentials`] and
//! hand it to a [`crate::ClientBuilder`].

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::client::ClientError;

/// Header carrying the bearer token.
pub const AUTH_HEADER: &str = "Authorization";
/// Scheme prefix of the authorization header value.
pub const AUTH_SCHEME: &str = "Bearer ";
/// Header scoping a call to an organization.
pub const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

/// Environment variable read by [`Credentials::from_env`] for the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable read by [`Credentials::from_env`] for the organization.
pub const ORGANIZATION_ENV: &str = "OPENAI_ORG_ID";

static GLOBAL: Lazy<Arc<Credentials>> = Lazy::new(|| Arc::new(Credentials::new()));

/// API key and optional default organization ID.
#[derive(Default)]
pub struct Credentials {
    api_key: RwLock<String>,
    default_organization_id: RwLock<String>,
}

impl Credentials {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store used by clients built without explicit credentials.
    pub fn global() -> Arc<Credentials> {
        Arc::clone(&GLOBAL)
    }

    /// Build a store from `OPENAI_API_KEY` and, if present, `OPENAI_ORG_ID`.
    pub fn from_env() -> Result<Self, ClientError> {
        let credentials = Self::new();
        credentials.set_api_key(std::env::var(API_KEY_ENV).unwrap_or_default())?;
        if let Ok(org) = std::env::var(ORGANIZATION_ENV) {
            if !org.is_empty() {
                credentials.set_default_organization_id(org)?;
            }
        }
        Ok(credentials)
    }

    /// Replace the API key. Empty keys are rejected and the previous key is kept.
    pub fn set_api_key(&self, key: impl Into<String>) -> Result<(), ClientError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ClientError::EmptyValue("API key"));
        }
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = key;
        Ok(())
    }

    /// Current API key, empty if never set.
    pub fn api_key(&self) -> String {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the default organization ID. Empty IDs are rejected.
    pub fn set_default_organization_id(&self, id: impl Into<String>) -> Result<(), ClientError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ClientError::EmptyValue("organization ID"));
        }
        *self
            .default_organization_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = id;
        Ok(())
    }

    /// Current default organization ID, empty if unset.
    pub fn default_organization_id(&self) -> String {
        self.default_organization_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove the default organization ID so the header is omitted again.
    pub fn clear_default_organization_id(&self) {
        self.default_organization_id
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Resolve the organization header value: the override wins, then a
    /// non-empty default, otherwise no header.
    pub fn organization_for(&self, organization_override: Option<&str>) -> Option<String> {
        match organization_override {
            Some(id) => Some(id.to_string()),
            None => {
                let default = self.default_organization_id();
                (!default.is_empty()).then_some(default)
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_set = !self.api_key().is_empty();
        f.debug_struct("Credentials")
            .field("api_key", &if key_set { "<redacted>" } else { "<unset>" })
            .field("default_organization_id", &self.default_organization_id())
            .finish()
    }
}

/// Set the process-wide API key.
pub fn set_api_key(key: impl Into<String>) -> Result<(), ClientError> {
    GLOBAL.set_api_key(key)
}

/// Process-wide API key.
pub fn api_key() -> String {
    GLOBAL.api_key()
}

/// Set the process-wide default organization ID.
pub fn set_default_organization_id(id: impl Into<String>) -> Result<(), ClientError> {
    GLOBAL.set_default_organization_id(id)
}

/// Process-wide default organization ID.
pub fn default_organization_id() -> String {
    GLOBAL.default_organization_id()
}
