//! Cart route handlers.
//!
//! The cart lives in the shopper's session. Adding a line resolves the
//! selection's SKU against the backend; every other operation is local.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use threadline_core::{Cart, CartTotals, LineItem, ProductSelection};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::{load_cart, save_cart};
use crate::services;
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<LineItem>,
    pub item_count: u32,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            item_count: cart.item_count(),
            totals: cart.totals().rounded(),
        }
    }
}

/// Display the cart with its totals.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product selection to the cart.
///
/// The session cart is read only after the SKU lookups return, so a line
/// added by another request while this one waited on the backend is kept.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(selection): Json<ProductSelection>,
) -> Result<Json<CartView>> {
    let line = services::cart::resolve_selection(state.api(), selection).await?;

    let mut cart = load_cart(&session).await?;
    cart.add(line.clone());
    save_cart(&session, &cart).await?;
    tracing::debug!(sku = %line.sku, lines = cart.len(), "Added line to cart");

    let sku = line.sku.to_string();
    add_breadcrumb("cart", "Added line", Some(&[("sku", sku.as_str())]));
    Ok(Json(CartView::from(&cart)))
}

/// Remove the line at `index`.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(index): Path<usize>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(index)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart unconditionally ("go home").
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}
