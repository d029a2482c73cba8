//! Shopper login and registration against the backend user store.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use threadline_api::{ApiError, CustomerApi, LoginRequest, RegistrationRequest};
use threadline_core::{Customer, Email, EmailError};
use tracing::instrument;

/// Account operation errors.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Unknown user ID or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A registration field is missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The email address is malformed.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// `POST /auth/login` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub user_id: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
}

/// `POST /auth/register` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub user_id: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    #[serde(default)]
    pub phone_number: String,
}

/// Log in and fetch the customer the credentials belong to.
///
/// # Errors
///
/// Returns [`AccountError::InvalidCredentials`] when the backend rejects the
/// login, or [`AccountError::Api`] if a call fails in transit.
#[instrument(skip(api, form), fields(user_id = %form.user_id))]
pub async fn login<A: CustomerApi>(api: &A, form: LoginForm) -> Result<Customer, AccountError> {
    let request = LoginRequest {
        user_id: form.user_id.trim().to_string(),
        user_pass: form.password,
    };

    let customer_id = api.login(&request).await.map_err(|e| match e {
        ApiError::Status { .. } | ApiError::InvalidIdentifier(_) | ApiError::Decode { .. } => {
            tracing::info!(error = %e, "Login rejected");
            AccountError::InvalidCredentials
        }
        other => AccountError::Api(other),
    })?;

    Ok(api.get_customer(customer_id).await?)
}

/// Create a user, then its customer profile, then fetch the stored customer.
///
/// # Errors
///
/// Returns a validation error before any backend call if a field is
/// missing or the email is malformed, otherwise [`AccountError::Api`].
#[instrument(skip(api, form), fields(user_id = %form.user_id))]
pub async fn register<A: CustomerApi>(
    api: &A,
    form: RegistrationForm,
) -> Result<Customer, AccountError> {
    let user_id = form.user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(AccountError::MissingField("userId"));
    }
    if form.first_name.trim().is_empty() {
        return Err(AccountError::MissingField("firstName"));
    }
    if form.last_name.trim().is_empty() {
        return Err(AccountError::MissingField("lastName"));
    }
    let email = Email::parse(&form.email_address)?;
    let phone = form.phone_number.trim().to_string();

    let request = RegistrationRequest {
        user_id,
        user_pass: form.password,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email_address: email.as_str().to_string(),
        phone_number: phone.clone(),
    };
    let customer_id = api.register(&request).await?;

    let profile = Customer {
        customer_id,
        first_name: request.first_name,
        last_name: request.last_name,
        email_address: request.email_address,
        phone_number: (!phone.is_empty()).then_some(phone),
    };
    api.add_customer(&profile).await?;

    tracing::info!(customer_id = %customer_id, "Registered new customer");
    Ok(api.get_customer(customer_id).await?)
}
