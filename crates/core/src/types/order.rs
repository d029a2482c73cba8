//! Orders and checkout order numbers.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{CustomerId, OrderSk, OrderStatus, ShippingId, Sku};

/// Identifier shared by every order row created in one checkout.
///
/// New numbers are random UUIDs. Rows written by older clients carry a
/// millisecond timestamp instead, so deserialization accepts a JSON number
/// as well as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a fresh order number for a checkout attempt.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The order number as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for OrderNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// One order row: a single SKU shipped to a single address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Assigned by the backend; absent on create.
    #[serde(default, alias = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_sk: Option<OrderSk>,
    pub sku: Sku,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_id: Option<ShippingId>,
    pub customer_id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<OrderNumber>,
}

impl Order {
    /// Build the create request for one cart line.
    #[must_use]
    pub const fn placed(
        order_number: OrderNumber,
        sku: Sku,
        shipping_id: ShippingId,
        customer_id: CustomerId,
    ) -> Self {
        Self {
            order_sk: None,
            sku,
            status: OrderStatus::Ordered,
            shipping_id: Some(shipping_id),
            customer_id,
            order_number: Some(order_number),
        }
    }
}
