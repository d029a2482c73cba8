//! Account route handlers (require a logged-in customer).

use axum::{Json, extract::State};
use threadline_api::OrderApi;
use threadline_core::{Customer, Order};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireCustomer;
use crate::state::AppState;

/// The logged-in customer.
pub async fn index(RequireCustomer(customer): RequireCustomer) -> Json<Customer> {
    Json(customer)
}

/// The logged-in customer's order rows.
#[instrument(skip(state, customer), fields(customer_id = %customer.customer_id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Vec<Order>>> {
    let orders = state.api().orders_by_customer(customer.customer_id).await?;
    Ok(Json(orders))
}
