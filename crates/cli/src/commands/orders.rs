//! Order listing.
//!
//! # Usage
//!
//! ```bash
//! # Every order, any status
//! tl-cli orders list
//!
//! # One customer's orders
//! tl-cli orders list --customer 12
//! ```

use threadline_api::{ApiClient, OrderApi};
use threadline_core::CustomerId;

use super::{CliError, print_json};

/// List orders, optionally for a single customer.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached.
pub async fn list(api: &ApiClient, customer: Option<CustomerId>) -> Result<(), CliError> {
    let orders = match customer {
        Some(customer_id) => api.orders_by_customer(customer_id).await?,
        None => api.get_orders().await?,
    };
    tracing::info!(count = orders.len(), "Orders listed");
    print_json(&orders)
}
