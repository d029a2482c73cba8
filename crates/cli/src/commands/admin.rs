//! Admin table commands.
//!
//! # Usage
//!
//! ```bash
//! # Print products, customers, and enriched orders
//! tl-cli admin tables -u ops
//!
//! # Apply edits from a YAML file
//! tl-cli admin reconcile -u ops --edits edits.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - The configured operator login
//! - `TL_ADMIN_PASSWORD` - Password supplied by the person running the command
//!
//! An edits file has the same shape as the `POST /tables/submit` body:
//!
//! ```yaml
//! products:
//!   - sku: 1001
//!     productName: Canvas Tote
//!     price: 24.99
//!     quantity: 30
//! orders:
//!   - orderSk: 7
//!     sku: 1001
//!     customerId: 12
//!     status: SHIPPED
//! ```

use std::path::Path;

use secrecy::SecretString;
use threadline_admin::config;
use threadline_admin::services::{CredentialGate, TableEdits, populate, reconcile};
use threadline_api::ApiClient;

use super::{CliError, print_json};

/// Check the operator's credentials against the configured pair.
///
/// # Errors
///
/// Returns an error if no admin login is configured or the credentials
/// do not match.
pub fn authorize(username: &str, password: &SecretString) -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let (configured_user, configured_password) =
        config::admin_credentials(&|key: &str| std::env::var(key).ok())?;
    CredentialGate::new(configured_user, configured_password).check(username, password)?;
    Ok(())
}

/// Print the admin tables.
///
/// # Errors
///
/// Returns an error if any table cannot be fetched.
pub async fn tables(api: &ApiClient) -> Result<(), CliError> {
    print_json(&populate(api).await?)
}

/// Apply the edits in `path` and print the report.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the baseline
/// cannot be fetched.
pub async fn reconcile_file(api: &ApiClient, path: &Path) -> Result<(), CliError> {
    let edits = load_edits(path).await?;
    tracing::info!(
        products = edits.products.len(),
        orders = edits.orders.len(),
        path = %path.display(),
        "Loaded edits"
    );

    let outcome = reconcile(api, &edits).await?;
    for failure in &outcome.report.failed {
        tracing::warn!(row = %failure.row, error = %failure.error, "Update failed");
    }
    print_json(&outcome.report)
}

async fn load_edits(path: &Path) -> Result<TableEdits, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::ReadEdits {
            path: path.to_path_buf(),
            source,
        })?;
    parse_edits(&content).map_err(|source| CliError::ParseEdits {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_edits(content: &str) -> Result<TableEdits, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use threadline_core::{OrderSk, OrderStatus, Price, Sku};

    use super::*;

    #[test]
    fn test_parse_edits_yaml() {
        let yaml = r"
products:
  - sku: 1001
    productName: Canvas Tote
    price: 24.99
    quantity: 30
orders:
  - orderSk: 7
    sku: 1001
    customerId: 12
    status: SHIPPED
";
        let edits = parse_edits(yaml).unwrap();

        assert_eq!(edits.products[0].sku, Sku::new(1001));
        assert_eq!(edits.products[0].price.rounded(), Price::from_cents(2_499));
        assert_eq!(edits.orders[0].order_sk, Some(OrderSk::new(7)));
        assert_eq!(edits.orders[0].status, OrderStatus::Shipped);
    }

    #[test]
    fn test_parse_edits_sections_are_optional() {
        let edits = parse_edits("orders: []\n").unwrap();
        assert!(edits.products.is_empty());
        assert!(edits.orders.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let err = load_edits(Path::new("/nonexistent/edits.yaml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/edits.yaml"));
    }
}
