//! Catalog products as returned by the backend.

use serde::{Deserialize, Serialize};

use super::{Price, ProductImageId, Sku};

/// A sellable product variant.
///
/// Each SKU is one name/color/size combination, so a catalog usually holds
/// several products sharing a `product_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: Sku,
    pub product_name: String,
    pub price: Price,
    #[serde(default)]
    pub product_image_id: Option<ProductImageId>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    /// Units in stock.
    #[serde(default)]
    pub quantity: i32,
}

impl Product {
    /// Whether this row carries the fields an operator may edit with
    /// different values than `other`.
    #[must_use]
    pub fn differs_in_editable_fields(&self, other: &Self) -> bool {
        self.price != other.price || self.quantity != other.quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "sku": 1001,
            "productName": "Canvas Tote",
            "price": 29.99,
            "productImageId": 4,
            "size": "Medium",
            "color": "Tan",
            "quantity": 12
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.sku, Sku::new(1001));
        assert_eq!(product.price.rounded(), Price::from_cents(2999));
        assert_eq!(product.product_image_id, Some(ProductImageId::new(4)));
    }

    #[test]
    fn test_editable_fields_are_price_and_quantity() {
        let json = r#"{"sku": 1, "productName": "Tee", "price": 10, "quantity": 5}"#;
        let base: Product = serde_json::from_str(json).unwrap();

        let mut renamed = base.clone();
        renamed.color = "Black".to_string();
        assert!(!base.differs_in_editable_fields(&renamed));

        let mut restocked = base.clone();
        restocked.quantity = 6;
        assert!(base.differs_in_editable_fields(&restocked));

        let mut repriced = base.clone();
        repriced.price = Price::from_cents(1500);
        assert!(base.differs_in_editable_fields(&repriced));
    }
}
