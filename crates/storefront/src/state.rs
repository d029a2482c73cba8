//! Application state shared across handlers.

use std::sync::Arc;

use threadline_api::{ApiClient, ApiError};
use threadline_core::FilterMode;

use crate::config::StorefrontConfig;
use crate::services::checkout::InFlightCheckouts;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    checkouts: InFlightCheckouts,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                checkouts: InFlightCheckouts::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Customers with a checkout in progress.
    #[must_use]
    pub fn checkouts(&self) -> &InFlightCheckouts {
        &self.inner.checkouts
    }

    /// Filter interpretation for catalog requests.
    #[must_use]
    pub fn filter_mode(&self) -> FilterMode {
        self.inner.config.filter_mode
    }
}
