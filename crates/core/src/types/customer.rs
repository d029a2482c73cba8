//! Customers and their shipping addresses.

use serde::{Deserialize, Serialize};

use super::CustomerId;

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Customer {
    /// Name shown in the admin order table.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// A customer's shipping address on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_line3: Option<String>,
    pub city: String,
    pub state_abbr: String,
    pub zip_code: String,
}

impl ShippingAddress {
    /// Single-line rendering used by the admin order table.
    ///
    /// Optional lines are included only when they hold text.
    #[must_use]
    pub fn one_line(&self) -> String {
        let mut out = format!("{}, ", self.address_line1);
        for line in [&self.address_line2, &self.address_line3]
            .into_iter()
            .flatten()
            .filter(|line| !line.trim().is_empty())
        {
            out.push_str(line);
            out.push_str(", ");
        }
        out.push_str(&format!(
            "{}, {}, {}",
            self.city, self.state_abbr, self.zip_code
        ));
        out
    }
}
