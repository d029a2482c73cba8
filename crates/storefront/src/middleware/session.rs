//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The shopper's cart lives
//! in the session under [`session_keys::CART`].

use threadline_core::{Cart, OrderNumber};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tl_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Read the session's cart, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// A changed cart can be checked out again, so any submitted marker is dropped.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session
        .remove_value(session_keys::SUBMITTED_ORDER)
        .await?;
    session.insert(session_keys::CART, cart).await
}

/// Order number already placed for the session's current cart, if any.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn submitted_order(
    session: &Session,
) -> Result<Option<OrderNumber>, tower_sessions::session::Error> {
    session.get(session_keys::SUBMITTED_ORDER).await
}

/// Record that the current cart was checked out and persist immediately.
///
/// # Errors
///
/// Returns an error if the session cannot be modified or saved.
pub async fn mark_cart_submitted(
    session: &Session,
    order_number: &OrderNumber,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::SUBMITTED_ORDER, order_number)
        .await?;
    session.save().await
}
