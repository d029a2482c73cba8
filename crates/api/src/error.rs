//! Errors returned by the backend client.

use thiserror::Error;
use threadline_core::IdParseError;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error on {path}: {status} - {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("Parse error on {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A `message` field did not hold the expected identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdParseError),

    /// The configured base URL cannot be used.
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status reported by the backend, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Description safe to show outside the service.
    ///
    /// Carries the status code at most, never the backend's response body.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Status { status, .. } => format!("Backend returned {status}"),
            Self::Decode { .. } | Self::InvalidIdentifier(_) => {
                "Backend sent an unexpected response".to_string()
            }
            Self::Http(_) | Self::InvalidBaseUrl { .. } => "Backend unreachable".to_string(),
        }
    }
}
