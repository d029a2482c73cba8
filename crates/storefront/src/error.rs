//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use threadline_api::ApiError;
use threadline_core::CartError;

use crate::services::account::AccountError;
use crate::services::cart::AddToCartError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Adding a selection to the cart failed.
    #[error("Add to cart error: {0}")]
    AddToCart(#[from] AddToCartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Login or registration failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

const BACKEND_MESSAGE: &str = "The store is temporarily unavailable";
const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// HTTP status and client-safe message for this error.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Api(e) | Self::AddToCart(AddToCartError::Api(e)) => api_status(e),
            Self::Cart(e) | Self::AddToCart(AddToCartError::Cart(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::AddToCart(e @ AddToCartError::UnknownVariant { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            Self::Checkout(e) => match e {
                CheckoutError::InvalidForm { .. } | CheckoutError::EmptyCart => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                CheckoutError::AlreadyStarted => (StatusCode::CONFLICT, e.to_string()),
                CheckoutError::Payment(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Payment could not be submitted".to_string(),
                ),
                CheckoutError::Shipping(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Shipping details could not be submitted".to_string(),
                ),
            },
            Self::Account(e) => match e {
                AccountError::InvalidCredentials => (StatusCode::UNAUTHORIZED, e.to_string()),
                AccountError::MissingField(_) | AccountError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                AccountError::Api(e) => api_status(e),
            },
            Self::Session(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

fn api_status(err: &ApiError) -> (StatusCode, String) {
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else {
        (StatusCode::BAD_GATEWAY, BACKEND_MESSAGE.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server-side failures to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added line", Some(&[("sku", "1001")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
