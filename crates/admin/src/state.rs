//! Application state shared across handlers.

use std::sync::Arc;

use threadline_api::{ApiClient, ApiError};

use crate::config::AdminConfig;
use crate::services::CredentialGate;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    gate: CredentialGate,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let gate = config.gate();

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, gate }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get the operator credential check.
    #[must_use]
    pub fn gate(&self) -> &CredentialGate {
        &self.inner.gate
    }
}
