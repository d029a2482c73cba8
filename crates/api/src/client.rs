//! `reqwest` implementation of the backend contract.

use std::time::Duration;

use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;
use threadline_core::{Customer, CustomerId, Order, Product, ShippingAddress, ShippingId, Sku};
use tracing::instrument;
use url::Url;

use crate::ApiError;
use crate::store::{CatalogApi, CustomerApi, OrderApi};
use crate::types::{
    LoginRequest, MessageResponse, PaymentRequest, RegistrationRequest, ShippingRequest,
};

/// Backend base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Always ends with `/` so endpoint paths join beneath it.
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Parse a base URL, keeping the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `raw` is not an absolute
    /// `http` or `https` URL.
    pub fn from_base_url(raw: &str) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        };

        let mut base_url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base_url.scheme())));
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Threadline backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The base URL every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = self.get_text(path, query).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// GET a single product, treating an empty answer as absence.
    ///
    /// The backend signals "no match" with an empty body, `null`, or a
    /// product-shaped object whose fields are all null.
    async fn get_optional_product(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<Product>, ApiError> {
        let body = self.get_text(path, query).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })?;
        if value.is_null() || value.get("sku").is_none_or(serde_json::Value::is_null) {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        let url = self.endpoint(path, query)?;
        let response = self.client.get(url).send().await?;
        let response = check_status(path, response).await?;
        Ok(response.text().await?)
    }

    /// POST a JSON body and discard the acknowledgement.
    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.endpoint(path, &[])?;
        let response = self.client.post(url).json(body).send().await?;
        check_status(path, response).await?;
        Ok(())
    }

    /// POST a JSON body and read the `{ "message": ... }` reply.
    async fn post_for_message<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(path, &[])?;
        let response = self.client.post(url).json(body).send().await?;
        let response = check_status(path, response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!(path, status = status.as_u16(), "Backend returned an error");
    Err(ApiError::Status {
        status: status.as_u16(),
        path: path.to_string(),
        message,
    })
}

impl CatalogApi for ApiClient {
    #[instrument(skip(self))]
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("products", &[]).await
    }

    #[instrument(skip(self))]
    async fn search_product(&self, name: &str) -> Result<Option<Product>, ApiError> {
        self.get_optional_product("product", &[("productName", name)])
            .await
    }

    #[instrument(skip(self))]
    async fn product_by_sku(&self, sku: Sku) -> Result<Option<Product>, ApiError> {
        let sku = sku.to_string();
        self.get_optional_product("product", &[("sku", &sku)]).await
    }

    #[instrument(skip(self))]
    async fn resolve_sku(&self, name: &str, color: &str, size: &str) -> Result<Sku, ApiError> {
        let message: MessageResponse = self
            .get_json(
                "product/sku",
                &[("name", name), ("color", color), ("size", size)],
            )
            .await?;
        Ok(message.parse_id()?)
    }

    #[instrument(skip(self, product), fields(sku = %product.sku))]
    async fn add_product(&self, product: &Product) -> Result<(), ApiError> {
        self.post_json("add/product", product).await
    }

    #[instrument(skip(self, product), fields(sku = %product.sku))]
    async fn update_product(&self, product: &Product) -> Result<(), ApiError> {
        self.post_json("update/product", product).await
    }
}

impl CustomerApi for ApiClient {
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    async fn login(&self, request: &LoginRequest) -> Result<CustomerId, ApiError> {
        let message = self.post_for_message("login", request).await?;
        Ok(message.parse_id()?)
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    async fn register(&self, request: &RegistrationRequest) -> Result<CustomerId, ApiError> {
        let message = self.post_for_message("add/user", request).await?;
        Ok(message.parse_id()?)
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.customer_id))]
    async fn add_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        self.post_json("add/customer", customer).await
    }

    #[instrument(skip(self))]
    async fn get_customer(&self, id: CustomerId) -> Result<Customer, ApiError> {
        let id = id.to_string();
        self.get_json("customer", &[("customerID", &id)]).await
    }

    #[instrument(skip(self))]
    async fn get_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.get_json("customers", &[]).await
    }

    #[instrument(skip(self))]
    async fn shipping_address(&self, id: CustomerId) -> Result<Option<ShippingAddress>, ApiError> {
        let id = id.to_string();
        let body = self
            .get_text("shippingAddressByCustomerId", &[("customerID", &id)])
            .await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: "shippingAddressByCustomerId".to_string(),
            source,
        })
    }
}

impl OrderApi for ApiClient {
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    async fn submit_payment(&self, request: &PaymentRequest) -> Result<(), ApiError> {
        self.post_json("add/payment", request).await
    }

    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    async fn submit_shipping(&self, request: &ShippingRequest) -> Result<ShippingId, ApiError> {
        let message = self.post_for_message("add/shipping", request).await?;
        Ok(message.parse_id()?)
    }

    #[instrument(skip(self, order), fields(sku = %order.sku))]
    async fn submit_order(&self, order: &Order) -> Result<(), ApiError> {
        self.post_json("add/order", order).await
    }

    #[instrument(skip(self))]
    async fn get_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json("ordersByParam", &[("status", "*")]).await
    }

    #[instrument(skip(self))]
    async fn orders_by_customer(&self, id: CustomerId) -> Result<Vec<Order>, ApiError> {
        let id = id.to_string();
        self.get_json("orders", &[("customerId", &id)]).await
    }

    #[instrument(skip(self, order), fields(sku = %order.sku))]
    async fn update_order(&self, order: &Order) -> Result<(), ApiError> {
        self.post_json("update/order", order).await
    }
}
