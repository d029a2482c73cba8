//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! # One product per name
//! tl-cli catalog list
//!
//! # Filter like the storefront panel does
//! tl-cli catalog list --color Black --size Medium --price "Under \$25" --corrected
//!
//! # Look up a product by name
//! tl-cli catalog search "Canvas Tote"
//! ```

use threadline_api::{ApiClient, CatalogApi};
use threadline_core::catalog::dedupe_by_name;
use threadline_core::{CatalogView, FilterMode, FilterSelection, Product};

use super::{CliError, print_json};

/// Filter flags for `catalog list`.
#[derive(Debug, Default)]
pub struct ListFilter {
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Option<String>,
    pub corrected: bool,
}

impl ListFilter {
    fn selection(&self) -> Option<FilterSelection> {
        if self.color.is_none() && self.size.is_none() && self.price.is_none() {
            return None;
        }
        Some(FilterSelection {
            color: self.color.clone().unwrap_or_default(),
            size: self.size.clone().unwrap_or_default(),
            price_range: self.price.clone().unwrap_or_default(),
        })
    }

    const fn mode(&self) -> FilterMode {
        if self.corrected {
            FilterMode::Corrected
        } else {
            FilterMode::Legacy
        }
    }

    /// De-duplicate, then filter when any flag was given.
    fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let catalog = dedupe_by_name(products);
        match self.selection() {
            Some(selection) => CatalogView::filtered(&catalog, &selection, self.mode()).products,
            None => catalog,
        }
    }
}

/// List the catalog.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached.
pub async fn list(api: &ApiClient, filter: &ListFilter) -> Result<(), CliError> {
    let products = filter.apply(api.get_products().await?);
    tracing::info!(count = products.len(), "Catalog listed");
    print_json(&products)
}

/// Search for a product by name.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached.
pub async fn search(api: &ApiClient, name: &str) -> Result<(), CliError> {
    match api.search_product(name.trim()).await? {
        Some(product) => print_json(&product),
        None => {
            tracing::warn!(name, "No products found");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use threadline_core::{Price, Sku};

    use super::*;

    fn row(sku: i32, name: &str, color: &str) -> Product {
        Product {
            sku: Sku::new(sku),
            product_name: name.to_string(),
            price: Price::from_cents(1_500),
            product_image_id: None,
            size: "Medium".to_string(),
            color: color.to_string(),
            quantity: 1,
        }
    }

    fn rows() -> Vec<Product> {
        vec![row(1, "Tee", "Tan"), row(2, "Tee", "Black"), row(3, "Cap", "Tan")]
    }

    #[test]
    fn test_no_flags_lists_deduplicated() {
        let products = ListFilter::default().apply(rows());
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_corrected_color_filter() {
        let filter = ListFilter {
            color: Some("Tan".to_string()),
            corrected: true,
            ..ListFilter::default()
        };
        let products = filter.apply(rows());
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_name, "Cap");
    }

    #[test]
    fn test_legacy_mode_is_default() {
        let filter = ListFilter {
            color: Some("Tan".to_string()),
            ..ListFilter::default()
        };
        assert_eq!(filter.mode(), FilterMode::Legacy);
        assert!(filter.selection().is_some());
    }
}
