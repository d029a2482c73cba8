//! Products, customers, and orders tables for the admin panel.

use futures::future::join_all;
use serde::Serialize;
use threadline_api::{ApiError, StoreApi};
use threadline_core::{Customer, Order, Product};
use tracing::instrument;

/// An order row with the customer's name and shipping address.
///
/// Either field is empty when its lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub shipping_address: String,
}

/// The three admin tables as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminTables {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<OrderRow>,
}

/// Fetch all three tables concurrently, then enrich every order row.
///
/// # Errors
///
/// Returns [`ApiError`] if any of the three lists cannot be fetched.
/// Enrichment failures do not fail the table.
#[instrument(skip(api))]
pub async fn populate<A: StoreApi>(api: &A) -> Result<AdminTables, ApiError> {
    let (products, customers, orders) =
        tokio::join!(api.get_products(), api.get_customers(), api.get_orders());

    let products = products?;
    let customers = customers?;
    let orders = enrich_orders(api, orders?).await;

    tracing::debug!(
        products = products.len(),
        customers = customers.len(),
        orders = orders.len(),
        "Admin tables populated"
    );

    Ok(AdminTables {
        products,
        customers,
        orders,
    })
}

/// Look up each order's customer name and shipping address concurrently.
pub async fn enrich_orders<A: StoreApi>(api: &A, orders: Vec<Order>) -> Vec<OrderRow> {
    join_all(orders.into_iter().map(|order| enrich(api, order))).await
}

async fn enrich<A: StoreApi>(api: &A, order: Order) -> OrderRow {
    let customer_id = order.customer_id;
    let (customer, address) = tokio::join!(
        api.get_customer(customer_id),
        api.shipping_address(customer_id)
    );

    let customer_name = match customer {
        Ok(customer) => customer.display_name(),
        Err(e) => {
            tracing::warn!(customer_id = %customer_id, error = %e, "Customer lookup failed");
            String::new()
        }
    };

    let shipping_address = match address {
        Ok(Some(address)) => address.one_line(),
        Ok(None) => String::new(),
        Err(e) => {
            tracing::warn!(customer_id = %customer_id, error = %e, "Shipping address lookup failed");
            String::new()
        }
    };

    OrderRow {
        order,
        customer_name,
        shipping_address,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::services::testing::FakeStore;
    use threadline_core::{CustomerId, OrderStatus, ShippingAddress};

    #[tokio::test]
    async fn test_populate_enriches_orders() {
        let store = FakeStore::seeded();

        let tables = populate(&store).await.unwrap();

        assert_eq!(tables.products.len(), 2);
        assert_eq!(tables.customers.len(), 2);
        assert_eq!(tables.orders.len(), 2);
        assert_eq!(tables.orders[0].customer_name, "Ada Lovelace");
        assert_eq!(
            tables.orders[0].shipping_address,
            "12 Analytical Way, Apt 2, London, NY, 10001"
        );
    }

    #[tokio::test]
    async fn test_failed_lookups_leave_fields_empty() {
        let store = FakeStore::seeded();
        store.fail_customer(CustomerId::new(2));

        let tables = populate(&store).await.unwrap();

        let row = &tables.orders[1];
        assert_eq!(row.customer_name, "");
        // No address on file is empty too, not an error.
        assert_eq!(row.shipping_address, "");
        assert_eq!(row.order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_list_failure_fails_population() {
        let store = FakeStore::seeded();
        store.fail_path("products");

        let err = populate(&store).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_order_row_wire_shape() {
        let row = OrderRow {
            order: FakeStore::seeded().orders()[0].clone(),
            customer_name: "Ada Lovelace".to_string(),
            shipping_address: ShippingAddress::default().one_line(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["orderSk"], 1);
        assert_eq!(value["customerName"], "Ada Lovelace");
        assert!(value["shippingAddress"].is_string());
    }
}
