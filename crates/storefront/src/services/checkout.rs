//! Checkout: payment, then shipping, then one order row per cart line.
//!
//! The three steps are strictly ordered because the shipping response
//! carries the shipping ID every order row references. Order rows for the
//! lines of one cart are placed concurrently and share one order number.
//!
//! A failed payment or shipping call ends the checkout. A failed order row
//! does not stop its siblings and nothing already accepted is rolled back;
//! the [`Receipt`] reports each line's outcome.
//!
//! [`InFlightCheckouts`] keeps a customer to one running checkout at a time
//! across requests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use threadline_api::{ApiError, OrderApi, PaymentRequest, ShippingRequest};
use threadline_core::{
    Cart, CartTotals, CustomerId, LineItem, Order, OrderNumber, ShippingId, Sku,
};
use tracing::instrument;

/// Errors that end a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields are missing or malformed.
    #[error("Please fill in the required fields: {}", fields.join(", "))]
    InvalidForm { fields: Vec<&'static str> },

    /// There is nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The payment call failed; shipping and orders were not attempted.
    #[error("Payment submission failed: {0}")]
    Payment(#[source] ApiError),

    /// The shipping call failed; no orders were placed.
    #[error("Shipping submission failed: {0}")]
    Shipping(#[source] ApiError),

    /// A checkout for this customer or cart is running or already went through.
    #[error("Checkout already submitted")]
    AlreadyStarted,
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Card details entered at checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    #[serde(deserialize_with = "secret")]
    pub card_number: SecretString,
    /// `MM/YY`.
    #[serde(default)]
    pub expiration: String,
    #[serde(deserialize_with = "secret")]
    pub cvv: SecretString,
}

impl PaymentForm {
    /// Names of the fields that are missing or malformed.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();

        let digits: String = self
            .card_number
            .expose_secret()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            fields.push("cardNumber");
        }
        if !is_valid_expiration(&self.expiration) {
            fields.push("expiration");
        }
        let cvv = self.cvv.expose_secret().trim();
        if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            fields.push("cvv");
        }

        fields
    }

    fn to_request(&self, customer_id: CustomerId) -> PaymentRequest {
        let digits: String = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        PaymentRequest {
            customer_id,
            card_number: SecretString::from(digits),
            expiration: self.expiration.trim().to_string(),
            cvv: SecretString::from(self.cvv.expose_secret().trim()),
        }
    }
}

fn is_valid_expiration(value: &str) -> bool {
    let Some((month, year)) = value.trim().split_once('/') else {
        return false;
    };
    let month_ok = month.len() == 2 && matches!(month.parse::<u8>(), Ok(1..=12));
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}

/// Shipping address entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingForm {
    pub address_line1: String,
    pub address_line2: String,
    pub address_line3: String,
    pub city: String,
    pub state_abbr: String,
    pub zip_code: String,
}

impl ShippingForm {
    /// Names of the fields that are missing or malformed.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();

        if self.address_line1.trim().is_empty() {
            fields.push("addressLine1");
        }
        if self.city.trim().is_empty() {
            fields.push("city");
        }
        let state = self.state_abbr.trim();
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            fields.push("stateAbbr");
        }
        if self.zip_code.trim().is_empty() {
            fields.push("zipCode");
        }

        fields
    }

    fn to_request(&self, customer_id: CustomerId) -> ShippingRequest {
        ShippingRequest {
            customer_id,
            address_line1: self.address_line1.trim().to_string(),
            address_line2: self.address_line2.trim().to_string(),
            address_line3: self.address_line3.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            state_abbr: self.state_abbr.trim().to_ascii_uppercase(),
        }
    }
}

/// Both forms, as posted by the checkout page.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub payment: PaymentForm,
    pub shipping: ShippingForm,
}

impl CheckoutRequest {
    /// Check both forms before any backend call.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidForm`] naming every bad field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let mut fields = self.payment.invalid_fields();
        fields.extend(self.shipping.invalid_fields());
        if fields.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::InvalidForm { fields })
        }
    }
}

/// Outcome of one order row.
///
/// `error` is shopper-facing text; the backend's own message only goes to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResult {
    pub sku: Sku,
    pub product_name: String,
    pub quantity: u32,
    pub placed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the shopper sees once checkout finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order_number: OrderNumber,
    pub shipping_id: ShippingId,
    pub lines: Vec<OrderLineResult>,
    pub submitted_at: DateTime<Utc>,
    pub totals: CartTotals,
}

impl Receipt {
    /// Whether every order row was accepted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lines.iter().all(|line| line.placed)
    }
}

/// Customers with a checkout currently running.
#[derive(Clone, Default)]
pub struct InFlightCheckouts {
    customers: Arc<Mutex<HashSet<CustomerId>>>,
}

impl InFlightCheckouts {
    /// Reserve the checkout slot for `customer_id` until the guard drops.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyStarted`] while another checkout for
    /// the same customer holds the slot.
    pub fn claim(&self, customer_id: CustomerId) -> Result<CheckoutSlot, CheckoutError> {
        let inserted = self
            .customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(customer_id);
        if !inserted {
            return Err(CheckoutError::AlreadyStarted);
        }
        Ok(CheckoutSlot {
            customers: Arc::clone(&self.customers),
            customer_id,
        })
    }
}

/// Held for the duration of one checkout; releases the customer on drop.
#[must_use = "the slot is released as soon as it is dropped"]
pub struct CheckoutSlot {
    customers: Arc<Mutex<HashSet<CustomerId>>>,
    customer_id: CustomerId,
}

impl Drop for CheckoutSlot {
    fn drop(&mut self) {
        self.customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.customer_id);
    }
}

/// Runs a single checkout attempt against the backend.
///
/// [`Self::is_order_submitted`] turns true only once the last order row has
/// resolved.
pub struct CheckoutOrchestrator<A> {
    api: A,
    started: AtomicBool,
    submitted: AtomicBool,
}

impl<A: OrderApi> CheckoutOrchestrator<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            started: AtomicBool::new(false),
            submitted: AtomicBool::new(false),
        }
    }

    /// True after every order row of a submitted checkout has resolved.
    #[must_use]
    pub fn is_order_submitted(&self) -> bool {
        self.submitted.load(Ordering::Acquire)
    }

    /// Submit payment, shipping, and one order per cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidForm`] or [`CheckoutError::EmptyCart`]
    /// without calling the backend, [`CheckoutError::Payment`] or
    /// [`CheckoutError::Shipping`] when those steps fail, and
    /// [`CheckoutError::AlreadyStarted`] on a second call.
    #[instrument(skip(self, cart, request), fields(lines = cart.len()))]
    pub async fn submit(
        &self,
        customer_id: CustomerId,
        cart: &Cart,
        request: &CheckoutRequest,
    ) -> Result<Receipt, CheckoutError> {
        request.validate()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(CheckoutError::AlreadyStarted);
        }

        let totals = cart.totals().rounded();

        if let Err(e) = self
            .api
            .submit_payment(&request.payment.to_request(customer_id))
            .await
        {
            tracing::error!(error = %e, "Payment submission failed");
            return Err(CheckoutError::Payment(e));
        }

        let shipping_id = match self
            .api
            .submit_shipping(&request.shipping.to_request(customer_id))
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Shipping submission failed");
                return Err(CheckoutError::Shipping(e));
            }
        };

        let order_number = OrderNumber::generate();
        let lines = self
            .place_orders(&order_number, shipping_id, customer_id, cart.lines())
            .await;

        self.submitted.store(true, Ordering::Release);

        let receipt = Receipt {
            order_number,
            shipping_id,
            lines,
            submitted_at: Utc::now(),
            totals,
        };
        tracing::info!(
            order_number = %receipt.order_number,
            shipping_id = %shipping_id,
            complete = receipt.is_complete(),
            "Checkout submitted"
        );
        Ok(receipt)
    }

    async fn place_orders(
        &self,
        order_number: &OrderNumber,
        shipping_id: ShippingId,
        customer_id: CustomerId,
        lines: &[LineItem],
    ) -> Vec<OrderLineResult> {
        let calls = lines.iter().map(|line| async move {
            let order = Order::placed(order_number.clone(), line.sku, shipping_id, customer_id);
            let outcome = self.api.submit_order(&order).await;

            if let Err(e) = &outcome {
                tracing::error!(sku = %line.sku, error = %e, "Order row failed");
            }
            OrderLineResult {
                sku: line.sku,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                placed: outcome.is_ok(),
                error: outcome.as_ref().err().map(ApiError::client_message),
            }
        });

        join_all(calls).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use threadline_core::{OrderStatus, Price};
    use tokio::sync::Notify;

    use super::*;

    #[derive(Default)]
    struct FakeOrders {
        payments: Mutex<Vec<PaymentRequest>>,
        shipments: Mutex<Vec<ShippingRequest>>,
        orders: Mutex<Vec<Order>>,
        fail_payment: bool,
        fail_shipping: bool,
        fail_sku: Option<Sku>,
        hold_sku: Option<(Sku, Arc<Notify>)>,
    }

    fn backend_error(path: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            path: path.to_string(),
            message: "java.lang.IllegalStateException: duplicate key\n\tat com.shop.OrderDao.insert(OrderDao.java:88)".to_string(),
        }
    }

    impl OrderApi for FakeOrders {
        async fn submit_payment(&self, request: &PaymentRequest) -> Result<(), ApiError> {
            self.payments.lock().unwrap().push(request.clone());
            if self.fail_payment {
                return Err(backend_error("add/payment"));
            }
            Ok(())
        }

        async fn submit_shipping(&self, request: &ShippingRequest) -> Result<ShippingId, ApiError> {
            self.shipments.lock().unwrap().push(request.clone());
            if self.fail_shipping {
                return Err(backend_error("add/shipping"));
            }
            Ok(ShippingId::new(77))
        }

        async fn submit_order(&self, order: &Order) -> Result<(), ApiError> {
            if let Some((sku, notify)) = &self.hold_sku
                && *sku == order.sku
            {
                notify.notified().await;
            }
            self.orders.lock().unwrap().push(order.clone());
            if self.fail_sku == Some(order.sku) {
                return Err(backend_error("add/order"));
            }
            Ok(())
        }

        async fn get_orders(&self) -> Result<Vec<Order>, ApiError> {
            Ok(self.orders.lock().unwrap().clone())
        }

        async fn orders_by_customer(&self, _id: CustomerId) -> Result<Vec<Order>, ApiError> {
            Ok(Vec::new())
        }

        async fn update_order(&self, _order: &Order) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn line(sku: i32, cents: i64) -> LineItem {
        LineItem {
            sku: Sku::new(sku),
            product_name: format!("Product {sku}"),
            unit_price: Price::from_cents(cents),
            quantity: 1,
            size: "Medium".to_string(),
            color: "Black".to_string(),
            product_image_id: None,
        }
    }

    fn cart(skus: &[i32]) -> Cart {
        let mut cart = Cart::new();
        for sku in skus {
            cart.add(line(*sku, 2_000));
        }
        cart
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            payment: PaymentForm {
                card_number: SecretString::from("4111 1111 1111 1111"),
                expiration: "09/29".to_string(),
                cvv: SecretString::from("123"),
            },
            shipping: ShippingForm {
                address_line1: "200 Main St".to_string(),
                city: "Saint Paul".to_string(),
                state_abbr: "mn".to_string(),
                zip_code: "55105".to_string(),
                ..ShippingForm::default()
            },
        }
    }

    #[tokio::test]
    async fn test_two_line_cart_places_two_orders_with_shared_number() {
        let api = Arc::new(FakeOrders::default());
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));

        let receipt = checkout
            .submit(CustomerId::new(5), &cart(&[1, 2]), &request())
            .await
            .unwrap();

        assert_eq!(api.payments.lock().unwrap().len(), 1);
        assert_eq!(api.shipments.lock().unwrap().len(), 1);
        let orders = api.orders.lock().unwrap().clone();
        assert_eq!(orders.len(), 2);
        for order in &orders {
            assert_eq!(order.order_number.as_ref(), Some(&receipt.order_number));
            assert_eq!(order.status, OrderStatus::Ordered);
            assert_eq!(order.shipping_id, Some(ShippingId::new(77)));
            assert_eq!(order.customer_id, CustomerId::new(5));
        }
        let mut skus: Vec<_> = orders.iter().map(|o| o.sku).collect();
        skus.sort();
        assert_eq!(skus, [Sku::new(1), Sku::new(2)]);

        assert!(checkout.is_order_submitted());
        assert!(receipt.is_complete());
        assert_eq!(receipt.shipping_id, ShippingId::new(77));
        assert_eq!(receipt.totals.subtotal, Price::from_cents(4_000));
    }

    #[tokio::test]
    async fn test_forms_are_normalized_before_sending() {
        let api = Arc::new(FakeOrders::default());
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));
        checkout
            .submit(CustomerId::new(5), &cart(&[1]), &request())
            .await
            .unwrap();

        let payment = api.payments.lock().unwrap()[0].clone();
        assert_eq!(payment.card_number.expose_secret(), "4111111111111111");
        let shipping = api.shipments.lock().unwrap()[0].clone();
        assert_eq!(shipping.state_abbr, "MN");
        assert_eq!(shipping.address_line2, "");
    }

    #[tokio::test]
    async fn test_submitted_flag_waits_for_last_order() {
        let notify = Arc::new(Notify::new());
        let api = Arc::new(FakeOrders {
            hold_sku: Some((Sku::new(2), Arc::clone(&notify))),
            ..FakeOrders::default()
        });
        let checkout = Arc::new(CheckoutOrchestrator::new(Arc::clone(&api)));

        let task = tokio::spawn({
            let checkout = Arc::clone(&checkout);
            async move {
                checkout
                    .submit(CustomerId::new(5), &cart(&[1, 2]), &request())
                    .await
            }
        });

        while api.orders.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(!checkout.is_order_submitted());

        notify.notify_one();
        let receipt = task.await.unwrap().unwrap();

        assert!(checkout.is_order_submitted());
        assert_eq!(receipt.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_calls() {
        let api = Arc::new(FakeOrders::default());
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));
        let mut bad = request();
        bad.payment.cvv = SecretString::from("");
        bad.shipping.city = String::new();

        let err = checkout
            .submit(CustomerId::new(5), &cart(&[1]), &bad)
            .await
            .unwrap_err();

        match err {
            CheckoutError::InvalidForm { fields } => assert_eq!(fields, ["cvv", "city"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(api.payments.lock().unwrap().is_empty());
        assert!(api.shipments.lock().unwrap().is_empty());
        assert!(!checkout.is_order_submitted());
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_calls() {
        let api = Arc::new(FakeOrders::default());
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));

        let err = checkout
            .submit(CustomerId::new(5), &Cart::new(), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(api.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_failure_stops_chain() {
        let api = Arc::new(FakeOrders {
            fail_payment: true,
            ..FakeOrders::default()
        });
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));

        let err = checkout
            .submit(CustomerId::new(5), &cart(&[1, 2]), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Payment(_)));
        assert_eq!(api.payments.lock().unwrap().len(), 1);
        assert!(api.shipments.lock().unwrap().is_empty());
        assert!(api.orders.lock().unwrap().is_empty());
        assert!(!checkout.is_order_submitted());
    }

    #[tokio::test]
    async fn test_shipping_failure_places_no_orders() {
        let api = Arc::new(FakeOrders {
            fail_shipping: true,
            ..FakeOrders::default()
        });
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));

        let err = checkout
            .submit(CustomerId::new(5), &cart(&[1]), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Shipping(_)));
        assert!(api.orders.lock().unwrap().is_empty());
        assert!(!checkout.is_order_submitted());
    }

    #[tokio::test]
    async fn test_failed_order_row_does_not_block_siblings() {
        let api = Arc::new(FakeOrders {
            fail_sku: Some(Sku::new(1)),
            ..FakeOrders::default()
        });
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));

        let receipt = checkout
            .submit(CustomerId::new(5), &cart(&[1, 2, 3]), &request())
            .await
            .unwrap();

        assert_eq!(api.orders.lock().unwrap().len(), 3);
        assert!(!receipt.is_complete());
        let failed: Vec<_> = receipt.lines.iter().filter(|l| !l.placed).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].sku, Sku::new(1));
        assert!(checkout.is_order_submitted());
    }

    #[tokio::test]
    async fn test_failed_order_row_hides_backend_message() {
        let api = Arc::new(FakeOrders {
            fail_sku: Some(Sku::new(1)),
            ..FakeOrders::default()
        });
        let receipt = CheckoutOrchestrator::new(Arc::clone(&api))
            .submit(CustomerId::new(5), &cart(&[1]), &request())
            .await
            .unwrap();

        assert_eq!(
            receipt.lines[0].error.as_deref(),
            Some("Backend returned 500")
        );
        let body = serde_json::to_string(&receipt).unwrap();
        assert!(!body.contains("IllegalStateException"));
        assert!(!body.contains("OrderDao"));
    }

    #[tokio::test]
    async fn test_second_submit_is_rejected() {
        let api = Arc::new(FakeOrders::default());
        let checkout = CheckoutOrchestrator::new(Arc::clone(&api));
        checkout
            .submit(CustomerId::new(5), &cart(&[1]), &request())
            .await
            .unwrap();

        let err = checkout
            .submit(CustomerId::new(5), &cart(&[1]), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::AlreadyStarted));
        assert_eq!(api.payments.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_in_flight_claim_is_exclusive_per_customer() {
        let checkouts = InFlightCheckouts::default();

        let slot = checkouts.claim(CustomerId::new(5)).unwrap();
        assert!(matches!(
            checkouts.claim(CustomerId::new(5)),
            Err(CheckoutError::AlreadyStarted)
        ));
        let other = checkouts.claim(CustomerId::new(6)).unwrap();

        drop(slot);
        let again = checkouts.claim(CustomerId::new(5));
        assert!(again.is_ok());
        drop(other);
    }

    #[test]
    fn test_payment_field_rules() {
        let mut form = request().payment;
        assert!(form.invalid_fields().is_empty());

        form.card_number = SecretString::from("4111-1111-1111");
        assert!(form.invalid_fields().is_empty());

        form.card_number = SecretString::from("4111");
        form.expiration = "13/29".to_string();
        assert_eq!(form.invalid_fields(), ["cardNumber", "expiration"]);

        form.card_number = SecretString::from("4111111111111111");
        form.expiration = "1/29".to_string();
        form.cvv = SecretString::from("12a");
        assert_eq!(form.invalid_fields(), ["expiration", "cvv"]);
    }

    #[test]
    fn test_shipping_field_rules() {
        let mut form = request().shipping;
        assert!(form.invalid_fields().is_empty());

        form.state_abbr = "Minnesota".to_string();
        form.zip_code = "  ".to_string();
        assert_eq!(form.invalid_fields(), ["stateAbbr", "zipCode"]);
    }

    #[test]
    fn test_invalid_form_message_names_fields() {
        let err = CheckoutError::InvalidForm {
            fields: vec!["cardNumber", "city"],
        };
        assert_eq!(
            err.to_string(),
            "Please fill in the required fields: cardNumber, city"
        );
    }

    #[test]
    fn test_payment_form_debug_redacts_card() {
        let form: PaymentForm = serde_json::from_str(
            r#"{"cardNumber": "4111111111111111", "expiration": "09/29", "cvv": "987"}"#,
        )
        .unwrap();
        let debug = format!("{form:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("987"));
    }
}
