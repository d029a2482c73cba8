//! Shopping cart owned by a single shopper session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::CartTotals;
use crate::types::{Price, Product, ProductImageId, Sku};

/// Errors raised by cart operations before any backend call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Color or size was not chosen on the product page.
    #[error("Select a color, size, and quantity")]
    IncompleteSelection,

    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Removal index past the end of the cart.
    #[error("no cart line at index {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One product-size-color-quantity selection in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub sku: Sku,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub product_image_id: Option<ProductImageId>,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// What a shopper picked on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSelection {
    pub product_name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl ProductSelection {
    /// Check the selection is complete enough to resolve a SKU.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IncompleteSelection`] when color or size is blank
    /// and [`CartError::InvalidQuantity`] when quantity is zero.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.color.trim().is_empty() || self.size.trim().is_empty() {
            return Err(CartError::IncompleteSelection);
        }
        if self.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        Ok(())
    }

    /// Turn a validated selection into a cart line.
    ///
    /// `product` supplies the price and image; `sku` is the variant the
    /// backend resolved for this name, color, and size.
    #[must_use]
    pub fn into_line_item(self, product: &Product, sku: Sku) -> LineItem {
        LineItem {
            sku,
            product_name: self.product_name,
            unit_price: product.price,
            quantity: self.quantity,
            size: self.size,
            color: self.color,
            product_image_id: product.product_image_id,
        }
    }
}

/// Ordered list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append a line to the end of the cart.
    pub fn add(&mut self, line: LineItem) {
        self.lines.push(line);
    }

    /// Remove the line at `index`, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if there is no such line.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Current checkout totals for this cart.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::calculate(&self.lines)
    }
}
