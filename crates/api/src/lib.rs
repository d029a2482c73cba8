//! Threadline backend REST client.
//!
//! # Architecture
//!
//! - [`ApiClient`] wraps `reqwest` and speaks the backend's camelCase JSON
//!   contract under a configurable base path (default `/api`).
//! - The [`CatalogApi`], [`CustomerApi`], and [`OrderApi`] traits are the
//!   seams the storefront and admin services depend on, so business logic
//!   can be exercised against in-memory fakes.
//! - The backend is the source of truth. Nothing here caches responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use threadline_api::{ApiClient, ApiConfig, CatalogApi};
//!
//! let client = ApiClient::new(&ApiConfig::from_base_url("http://localhost:8080/api")?)?;
//! let products = client.get_products().await?;
//! let sku = client.resolve_sku("Canvas Tote", "Tan", "Medium").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod error;
mod store;
pub mod types;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use store::{CatalogApi, CustomerApi, OrderApi, StoreApi};
pub use types::*;
