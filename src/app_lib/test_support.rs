//! Shared fixtures for unit tests that talk to a `wiremock` server.

use super::{ApiClient, AppConfig, MemoryStorage, Storage};
use anyhow::Result;
use std::sync::Arc;
use wiremock::MockServer;

/// Config pointing at the mock server's `/api` prefix.
pub(crate) fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        api_base_url: format!("{}/api", server.uri()),
        ..AppConfig::default()
    }
}

/// Client with fresh in-memory storage.
pub(crate) fn api_for(server: &MockServer) -> Result<ApiClient> {
    api_with_storage(server, Arc::new(MemoryStorage::new()))
}

pub(crate) fn api_with_storage(server: &MockServer, storage: Arc<dyn Storage>) -> Result<ApiClient> {
    Ok(ApiClient::new(&config_for(server), storage)?)
}
