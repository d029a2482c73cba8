//! Cart pricing: subtotal, shipping, tax, and final total.
//!
//! Orders over $100 ship free; everything else pays a flat $10. Tax is a
//! flat 7.5% of the subtotal and is never applied to shipping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::types::Price;

/// Subtotal above which shipping is free. The comparison is strict.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Flat fee charged when the subtotal does not clear the threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::TEN;

/// Sales tax rate (7.5%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(75, 3)
}

/// The figures shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub tax: Price,
    pub final_total: Price,
}

impl CartTotals {
    /// Price a list of cart lines.
    #[must_use]
    pub fn calculate(lines: &[LineItem]) -> Self {
        Self::from_subtotal(lines.iter().map(LineItem::line_total).sum())
    }

    /// Derive shipping, tax, and final total from a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        let shipping_fee = if subtotal.amount() > FREE_SHIPPING_THRESHOLD {
            Price::ZERO
        } else {
            Price::new(FLAT_SHIPPING_FEE)
        };
        let tax = subtotal * tax_rate();

        Self {
            subtotal,
            shipping_fee,
            tax,
            final_total: subtotal * (Decimal::ONE + tax_rate()) + shipping_fee,
        }
    }

    /// The same totals rounded to whole cents for display.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: self.subtotal.rounded(),
            shipping_fee: self.shipping_fee.rounded(),
            tax: self.tax.rounded(),
            final_total: self.final_total.rounded(),
        }
    }
}
