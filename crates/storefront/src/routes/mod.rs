//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Catalog
//! GET    /catalog                - One product per name
//! POST   /catalog/filter         - Apply {color, priceRange, size}
//! POST   /catalog/filter/reset   - Clear the filter panel
//! GET    /products/search?name=  - Product by name (404 when none)
//! GET    /products/{sku}         - Product by SKU
//!
//! # Cart (session)
//! GET    /cart                   - Lines and totals
//! POST   /cart                   - Add {productName, color, size, quantity}
//! DELETE /cart/{index}           - Remove a line
//! POST   /cart/clear             - Empty the cart
//!
//! # Auth
//! POST   /auth/login             - Log in
//! POST   /auth/register          - Register and log in
//! POST   /auth/logout            - Log out (cart survives)
//!
//! # Account (requires auth)
//! GET    /account                - Current customer
//! GET    /account/orders         - Current customer's orders
//!
//! # Checkout (requires auth)
//! POST   /checkout               - {payment, shipping} -> receipt
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/filter", post(catalog::filter))
        .route("/filter/reset", post(catalog::reset_filter))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(catalog::search))
        .route("/{sku}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/{index}", delete(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/catalog", catalog_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .route("/checkout", post(checkout::submit))
}

/// The storefront application with sessions and request tracing.
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
