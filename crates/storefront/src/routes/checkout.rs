//! Checkout route handler.

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::{RequireCustomer, load_cart, mark_cart_submitted, submitted_order};
use crate::services::checkout::{CheckoutError, CheckoutOrchestrator, CheckoutRequest, Receipt};
use crate::state::AppState;

/// Submit payment, shipping, and the cart's order rows.
///
/// One checkout per customer runs at a time, and a cart that already went
/// through is refused with 409 until it changes. The cart itself is left
/// as-is; clearing it is the separate `POST /cart/clear`.
#[instrument(skip(state, session, customer, request), fields(customer_id = %customer.customer_id))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<Receipt>> {
    let _slot = state.checkouts().claim(customer.customer_id)?;

    if let Some(order_number) = submitted_order(&session).await? {
        tracing::warn!(%order_number, "Cart was already checked out");
        return Err(CheckoutError::AlreadyStarted.into());
    }

    let cart = load_cart(&session).await?;
    let checkout = CheckoutOrchestrator::new(state.api().clone());

    let receipt = checkout.submit(customer.customer_id, &cart, &request).await?;

    if checkout.is_order_submitted() {
        mark_cart_submitted(&session, &receipt.order_number).await?;
    }

    add_breadcrumb(
        "checkout",
        "Order submitted",
        Some(&[("order_number", receipt.order_number.as_str())]),
    );
    Ok(Json(receipt))
}
