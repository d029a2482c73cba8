//! Catalog listing, filtering, and product lookup.
//!
//! Every call reads the backend fresh. Nothing is cached between requests.

use threadline_api::{ApiError, CatalogApi};
use threadline_core::catalog::dedupe_by_name;
use threadline_core::{CatalogView, FilterMode, FilterSelection, PriceRange, Product, Sku};
use tracing::instrument;

/// One card per product name, in first-appearance order.
///
/// # Errors
///
/// Returns [`ApiError`] if the product list cannot be fetched.
#[instrument(skip(api))]
pub async fn list<A: CatalogApi>(api: &A) -> Result<Vec<Product>, ApiError> {
    let products = api.get_products().await?;
    Ok(dedupe_by_name(products))
}

/// Apply the shopper's filter selection to the de-duplicated catalog.
///
/// # Errors
///
/// Returns [`ApiError`] if the product list cannot be fetched.
#[instrument(skip(api))]
pub async fn filter<A: CatalogApi>(
    api: &A,
    selection: &FilterSelection,
    mode: FilterMode,
) -> Result<CatalogView, ApiError> {
    let catalog = list(api).await?;

    if !selection.price_range.trim().is_empty() && PriceRange::parse(&selection.price_range).is_none()
    {
        tracing::warn!(label = %selection.price_range, "Unrecognized price range label");
    }

    Ok(CatalogView::filtered(&catalog, selection, mode))
}

/// Find a product by name. `None` means nothing matched.
///
/// # Errors
///
/// Returns [`ApiError`] if the backend call fails.
#[instrument(skip(api))]
pub async fn search<A: CatalogApi>(api: &A, name: &str) -> Result<Option<Product>, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    api.search_product(name).await
}

/// Look up a single SKU.
///
/// # Errors
///
/// Returns [`ApiError`] if the backend call fails.
#[instrument(skip(api))]
pub async fn product<A: CatalogApi>(api: &A, sku: Sku) -> Result<Option<Product>, ApiError> {
    api.product_by_sku(sku).await
}
