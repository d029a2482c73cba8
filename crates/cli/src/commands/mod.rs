//! Command implementations.
//!
//! Every command talks to the backend named by `THREADLINE_API_BASE_URL`
//! and writes its result to stdout as pretty-printed JSON.

pub mod admin;
pub mod catalog;
pub mod orders;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use threadline_admin::config::{self, ConfigError};
use threadline_admin::services::{GateError, ReconcileError};
use threadline_api::{ApiClient, ApiError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Operator credentials did not match the configured pair.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Submitting edits failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Edits file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadEdits {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Edits file is not valid YAML for the tables.
    #[error("Failed to parse {path}: {source}")]
    ParseEdits {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Result could not be rendered.
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Build a backend client from the environment.
///
/// # Errors
///
/// Returns an error if the base URL or timeout is invalid.
pub fn connect() -> Result<ApiClient, CliError> {
    dotenvy::dotenv().ok();

    let api = config::api_config(&|key: &str| std::env::var(key).ok())?;
    tracing::debug!(backend = %api.base_url, "Connecting to backend");
    Ok(ApiClient::new(&api)?)
}

/// Write a value to stdout as JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
