//! Table listing and edit submission.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::{AdminTables, ReconcileOutcome, TableEdits, populate, reconcile};
use crate::state::AppState;

/// Products, customers, and enriched orders, fetched fresh.
#[instrument(skip_all, fields(username = %admin.username))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<AdminTables>> {
    Ok(Json(populate(state.api()).await?))
}

/// Apply edited product and order rows.
#[instrument(skip_all, fields(username = %admin.username))]
pub async fn submit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(edits): Json<TableEdits>,
) -> Result<Json<ReconcileOutcome>> {
    Ok(Json(reconcile(state.api(), &edits).await?))
}
