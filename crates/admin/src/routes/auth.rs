//! Operator login and logout.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::{AdminTables, populate};
use crate::state::AppState;

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// `POST /login` body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
}

/// Open the admin session and return the populated tables.
///
/// Wrong credentials are rejected before any backend call.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<AdminTables>> {
    state.gate().check(&form.username, &form.password)?;

    // Rotate the session ID on privilege change
    session.cycle_id().await?;
    set_current_admin(
        &session,
        &CurrentAdmin {
            username: form.username,
        },
    )
    .await?;
    tracing::info!("Admin session opened");

    Ok(Json(populate(state.api()).await?))
}

/// Close the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
