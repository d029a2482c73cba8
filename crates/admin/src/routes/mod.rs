//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Auth (single configured operator)
//! POST /login                  - {username, password} -> tables
//! POST /logout                 - Close the session
//!
//! # Tables (requires auth)
//! GET  /tables                 - Products, customers, enriched orders
//! POST /tables/submit          - {products, orders} -> reconcile report
//! ```

pub mod auth;
pub mod tables;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the tables routes router.
pub fn table_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tables::index))
        .route("/submit", post(tables::submit))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/tables", table_routes())
}

/// The admin application with sessions and request tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
