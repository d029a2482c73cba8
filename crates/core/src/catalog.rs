//! Catalog display list and shopper filters.
//!
//! The backend returns one row per SKU. The catalog page shows one card per
//! product name, and the filter panel narrows that list by color, price
//! range, and size.
//!
//! # Filter modes
//!
//! [`FilterMode::Legacy`] reproduces the storefront's historical behaviour
//! exactly: a color or price selection only applies when the selected string
//! is a single character long, which real option labels never are, and any
//! size selection containing `"XX-Large"` empties the list. Most selections
//! therefore return the full catalog.
//!
//! [`FilterMode::Corrected`] applies every non-empty selection.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Product};

/// Size label whose presence empties the list in legacy mode.
const LEGACY_EMPTYING_SIZE: &str = "XX-Large";

/// Collapse SKU rows to one product per name.
///
/// The last row for a name wins, but it takes the position where that name
/// first appeared.
#[must_use]
pub fn dedupe_by_name(products: impl IntoIterator<Item = Product>) -> Vec<Product> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Product> = Vec::new();

    for product in products {
        if let Some(slot) = positions
            .get(&product.product_name)
            .and_then(|&i| unique.get_mut(i))
        {
            *slot = product;
        } else {
            positions.insert(product.product_name.clone(), unique.len());
            unique.push(product);
        }
    }

    unique
}

/// How filter selections are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Historical single-character predicate.
    #[default]
    Legacy,
    /// Every non-empty selection narrows the list.
    Corrected,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Corrected => write!(f, "corrected"),
        }
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "corrected" => Ok(Self::Corrected),
            _ => Err(format!("invalid filter mode: {s}")),
        }
    }
}

/// The filter panel's current choices. Empty strings mean "no selection".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    pub color: String,
    pub price_range: String,
    pub size: String,
}

/// A price bracket parsed from a filter label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    /// `"Under $N"`: strictly below N.
    Under(Decimal),
    /// `"$A - $B"`: A through B inclusive.
    Between(Decimal, Decimal),
    /// `"Over $N"`: strictly above N.
    Over(Decimal),
    /// `"$N+"`: N or more.
    AtLeast(Decimal),
}

impl PriceRange {
    /// Parse a filter label such as `"Under $30"` or `"$30 - $50"`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        let lower = label.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("under") {
            return parse_amount(rest).map(Self::Under);
        }
        if let Some(rest) = lower.strip_prefix("over") {
            return parse_amount(rest).map(Self::Over);
        }
        if let Some(rest) = lower.strip_suffix('+') {
            return parse_amount(rest).map(Self::AtLeast);
        }
        let (low, high) = lower.split_once('-')?;
        let (low, high) = (parse_amount(low)?, parse_amount(high)?);
        (low <= high).then_some(Self::Between(low, high))
    }

    /// Whether `price` falls inside this bracket.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        let amount = price.amount();
        match *self {
            Self::Under(max) => amount < max,
            Self::Between(min, max) => amount >= min && amount <= max,
            Self::Over(min) => amount > min,
            Self::AtLeast(min) => amount >= min,
        }
    }
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(cleaned.trim()).ok()
}

/// The product list the catalog page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    /// True after any filter submission, even one that narrowed nothing.
    pub is_filtered: bool,
    pub products: Vec<Product>,
}

impl CatalogView {
    /// Apply `selection` to an already de-duplicated catalog.
    #[must_use]
    pub fn filtered(catalog: &[Product], selection: &FilterSelection, mode: FilterMode) -> Self {
        let mut products = catalog.to_vec();

        match mode {
            FilterMode::Legacy => {
                if is_single_char(&selection.color) {
                    products.retain(|p| p.color == selection.color);
                }
                if is_single_char(&selection.price_range)
                    && let Some(range) = PriceRange::parse(&selection.price_range)
                {
                    products.retain(|p| range.contains(p.price));
                }
                if selection.size.contains(LEGACY_EMPTYING_SIZE) {
                    products.clear();
                }
            }
            FilterMode::Corrected => {
                let color = selection.color.trim();
                if !color.is_empty() {
                    products.retain(|p| p.color.eq_ignore_ascii_case(color));
                }
                if let Some(range) = PriceRange::parse(&selection.price_range) {
                    products.retain(|p| range.contains(p.price));
                }
                let size = selection.size.trim();
                if !size.is_empty() {
                    products.retain(|p| p.size.eq_ignore_ascii_case(size));
                }
            }
        }

        Self {
            is_filtered: true,
            products,
        }
    }

    /// State after the shopper clears the filter panel.
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            is_filtered: false,
            products: Vec::new(),
        }
    }
}

fn is_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some() && chars.next().is_none()
}
