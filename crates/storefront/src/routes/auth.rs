//! Authentication route handlers.
//!
//! Credentials are checked by the backend; on success the customer record
//! is kept in the session until logout.

use axum::{Json, extract::State, http::StatusCode};
use threadline_core::Customer;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_customer, set_current_customer};
use crate::services::account::{self, LoginForm, RegistrationForm};
use crate::state::AppState;

/// Log in with a backend user ID and password.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<Customer>> {
    let customer = account::login(state.api(), form).await?;
    start_session(&session, &customer).await?;
    Ok(Json(customer))
}

/// Register a new user and customer profile, then log in as them.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegistrationForm>,
) -> Result<(StatusCode, Json<Customer>)> {
    let customer = account::register(state.api(), form).await?;
    start_session(&session, &customer).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Log out. The cart survives.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_customer(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

async fn start_session(session: &Session, customer: &Customer) -> Result<()> {
    // Rotate the session ID on privilege change
    session.cycle_id().await?;
    set_current_customer(session, customer).await?;
    set_sentry_user(&customer.customer_id, Some(&customer.email_address));
    tracing::info!(customer_id = %customer.customer_id, "Customer logged in");
    Ok(())
}
