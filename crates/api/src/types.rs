//! Request and response bodies for the backend contract.
//!
//! Shared records (products, orders, customers) live in `threadline-core`;
//! this module holds the shapes that only exist on the wire.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use threadline_core::{CustomerId, IdParseError};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "userPass", serialize_with = "expose")]
    pub user_pass: SecretString,
}

/// `POST /add/user` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(serialize_with = "expose")]
    pub user_pass: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,
}

/// `POST /add/payment` body.
///
/// Card number and CVV stay wrapped until serialization, so `Debug` output
/// and tracing fields never contain them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub customer_id: CustomerId,
    #[serde(serialize_with = "expose")]
    pub card_number: SecretString,
    /// `MM/YY`.
    pub expiration: String,
    #[serde(serialize_with = "expose")]
    pub cvv: SecretString,
}

/// `POST /add/shipping` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRequest {
    pub customer_id: CustomerId,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub address_line3: String,
    pub city: String,
    pub zip_code: String,
    pub state_abbr: String,
}

/// The backend's generic `{ "message": ... }` envelope.
///
/// Newly assigned keys arrive here as text, occasionally as a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub message: String,
}

impl MessageResponse {
    /// Parse the message as an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdParseError`] if the message is not an integer.
    pub fn parse_id<T>(&self) -> Result<T, IdParseError>
    where
        T: std::str::FromStr<Err = IdParseError>,
    {
        self.message.parse()
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
