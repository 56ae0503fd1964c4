//! Shared setup for tests that talk to a wiremock server.

#![allow(dead_code)]

use std::sync::Arc;

use openai_bind::{Client, Credentials};
use wiremock::MockServer;

pub const TEST_KEY: &str = "sk-test-key";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client pointed at `server`, with its own credential store holding `TEST_KEY`.
pub fn client_for(server: &MockServer) -> (Client, Arc<Credentials>) {
    init_tracing();
    let credentials = Arc::new(Credentials::new());
    credentials.set_api_key(TEST_KEY).unwrap();
    let client = Client::builder()
        .base_url(format!("{}/v1/", server.uri()))
        .credentials(Arc::clone(&credentials))
        .build()
        .unwrap();
    (client, credentials)
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    position(haystack, needle).is_some()
}

pub fn position(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
