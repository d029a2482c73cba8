//! Resolving a product-page selection into a cart line.

use thiserror::Error;
use threadline_api::{ApiError, CatalogApi};
use threadline_core::{CartError, LineItem, ProductSelection};
use tracing::instrument;

/// Errors adding a selection to the cart.
#[derive(Debug, Error)]
pub enum AddToCartError {
    /// The selection failed validation; no backend call was made.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The resolved SKU has no product record.
    #[error("No product for {name} in {color} / {size}")]
    UnknownVariant {
        name: String,
        color: String,
        size: String,
    },

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Validate `selection`, resolve its SKU, and build the cart line.
///
/// The cart itself is not touched, so callers can read the session cart
/// after the backend round trips rather than before them.
///
/// # Errors
///
/// Returns [`AddToCartError::Cart`] before any backend call when color or
/// size is missing, [`AddToCartError::UnknownVariant`] when the backend has
/// no product for the resolved SKU, and [`AddToCartError::Api`] otherwise.
#[instrument(skip(api))]
pub async fn resolve_selection<A: CatalogApi>(
    api: &A,
    selection: ProductSelection,
) -> Result<LineItem, AddToCartError> {
    selection.validate()?;

    let sku = api
        .resolve_sku(&selection.product_name, &selection.color, &selection.size)
        .await?;
    let Some(product) = api.product_by_sku(sku).await? else {
        return Err(AddToCartError::UnknownVariant {
            name: selection.product_name,
            color: selection.color,
            size: selection.size,
        });
    };

    tracing::debug!(sku = %sku, "Resolved cart line");
    Ok(selection.into_line_item(&product, sku))
}
