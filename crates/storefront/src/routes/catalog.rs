//! Catalog and product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use threadline_core::{CatalogView, FilterSelection, Product, Sku};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::catalog;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

/// List one product per name.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(catalog::list(state.api()).await?))
}

/// Apply a filter selection.
#[instrument(skip(state))]
pub async fn filter(
    State(state): State<AppState>,
    Json(selection): Json<FilterSelection>,
) -> Result<Json<CatalogView>> {
    let view = catalog::filter(state.api(), &selection, state.filter_mode()).await?;
    tracing::debug!(
        mode = %state.filter_mode(),
        matched = view.products.len(),
        "Catalog filtered"
    );
    Ok(Json(view))
}

/// Clear the filter panel.
pub async fn reset_filter() -> Json<CatalogView> {
    Json(CatalogView::reset())
}

/// Search by product name.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Product>> {
    catalog::search(state.api(), &query.name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No products found".to_string()))
}

/// Product detail by SKU.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(sku): Path<Sku>) -> Result<Json<Product>> {
    catalog::product(state.api(), sku)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No product with SKU {sku}")))
}
