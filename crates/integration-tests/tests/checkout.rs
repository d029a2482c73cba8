//! Checkout against the in-process backend, directly and through the
//! storefront's HTTP routes.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::{Value, json};
use threadline_api::CatalogApi;
use threadline_core::{Cart, CustomerId, ProductSelection, Sku};
use threadline_integration_tests::{FakeBackend, serve};
use threadline_storefront::config::StorefrontConfig;
use threadline_storefront::services::checkout::{
    CheckoutError, CheckoutOrchestrator, CheckoutRequest,
};
use threadline_storefront::state::AppState;

fn checkout_body() -> Value {
    json!({
        "payment": {
            "cardNumber": "4111 1111 1111 1111",
            "expiration": "08/29",
            "cvv": "123"
        },
        "shipping": {
            "addressLine1": "1 Harbor Rd",
            "city": "Arlington",
            "stateAbbr": "va",
            "zipCode": "22201"
        }
    })
}

fn checkout_request() -> CheckoutRequest {
    serde_json::from_value(checkout_body()).unwrap()
}

async fn cart_of(backend: &FakeBackend, picks: &[(&str, &str, &str, u32)]) -> Cart {
    let client = backend.client();
    let mut cart = Cart::new();
    for (name, color, size, quantity) in picks {
        let sku = client.resolve_sku(name, color, size).await.unwrap();
        let product = client.product_by_sku(sku).await.unwrap().unwrap();
        let selection = ProductSelection {
            product_name: (*name).to_string(),
            color: (*color).to_string(),
            size: (*size).to_string(),
            quantity: *quantity,
        };
        cart.add(selection.into_line_item(&product, sku));
    }
    cart
}

#[tokio::test]
async fn test_checkout_places_one_order_per_line() {
    let backend = FakeBackend::start().await;
    let cart = cart_of(
        &backend,
        &[
            ("Canvas Tote", "Tan", "Medium", 1),
            ("Wool Beanie", "Grey", "One Size", 2),
        ],
    )
    .await;
    backend.state().clear_calls();

    let checkout = CheckoutOrchestrator::new(backend.client());
    let receipt = checkout
        .submit(CustomerId::new(2), &cart, &checkout_request())
        .await
        .unwrap();

    assert!(receipt.is_complete());
    assert!(checkout.is_order_submitted());

    let state = backend.state();
    assert_eq!(state.payments().len(), 1);
    assert_eq!(state.payments()[0]["cardNumber"], "4111111111111111");
    assert_eq!(state.shipments().len(), 1);
    assert_eq!(state.shipments()[0]["stateAbbr"], "VA");

    // Payment strictly before shipping, both before any order row.
    let paths: Vec<String> = state.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths[0], "add/payment");
    assert_eq!(paths[1], "add/shipping");
    assert!(paths[2..].iter().all(|p| p == "add/order"));
    assert_eq!(paths.len(), 4);

    let placed: Vec<_> = state
        .orders()
        .into_iter()
        .filter(|o| o.order_number.as_ref() == Some(&receipt.order_number))
        .collect();
    assert_eq!(placed.len(), 2);
    assert!(placed.iter().all(|o| o.shipping_id == Some(receipt.shipping_id)));
    assert!(placed.iter().all(|o| o.customer_id == CustomerId::new(2)));
    assert!(placed.iter().all(|o| o.order_sk.is_some()));
}

#[tokio::test]
async fn test_failed_payment_places_nothing() {
    let backend = FakeBackend::start().await;
    let cart = cart_of(&backend, &[("Canvas Tote", "Tan", "Medium", 1)]).await;
    backend.state().fail("add/payment", 500);
    let orders_before = backend.state().orders().len();

    let err = CheckoutOrchestrator::new(backend.client())
        .submit(CustomerId::new(1), &cart, &checkout_request())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Payment(_)));
    assert!(backend.state().calls_to("add/shipping").is_empty());
    assert!(backend.state().calls_to("add/order").is_empty());
    assert_eq!(backend.state().orders().len(), orders_before);
}

#[tokio::test]
async fn test_failed_shipping_places_no_orders() {
    let backend = FakeBackend::start().await;
    let cart = cart_of(&backend, &[("Canvas Tote", "Tan", "Medium", 1)]).await;
    backend.state().fail("add/shipping", 502);

    let err = CheckoutOrchestrator::new(backend.client())
        .submit(CustomerId::new(1), &cart, &checkout_request())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Shipping(_)));
    assert_eq!(backend.state().payments().len(), 1);
    assert!(backend.state().calls_to("add/order").is_empty());
}

#[tokio::test]
async fn test_failed_order_rows_are_reported_per_line() {
    let backend = FakeBackend::start().await;
    let cart = cart_of(
        &backend,
        &[
            ("Canvas Tote", "Tan", "Medium", 1),
            ("Wool Beanie", "Grey", "One Size", 1),
        ],
    )
    .await;
    backend.state().fail("add/order", 500);

    let receipt = CheckoutOrchestrator::new(backend.client())
        .submit(CustomerId::new(1), &cart, &checkout_request())
        .await
        .unwrap();

    assert!(!receipt.is_complete());
    assert_eq!(receipt.lines.len(), 2);
    assert!(receipt.lines.iter().all(|l| !l.placed));
    for line in &receipt.lines {
        assert_eq!(line.error.as_deref(), Some("Backend returned 500"));
    }
    let body = serde_json::to_string(&receipt).unwrap();
    assert!(!body.contains("injected failure"));
    assert_eq!(backend.state().calls_to("add/order").len(), 2);
}

// =============================================================================
// Through the storefront
// =============================================================================

async fn storefront(backend: &FakeBackend) -> (String, reqwest::Client) {
    let api_base = backend.base_url();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_string()),
        "THREADLINE_API_BASE_URL" => Some(api_base.clone()),
        _ => None,
    })
    .unwrap();
    let app = threadline_storefront::routes::app(AppState::new(config).unwrap());
    let (base, _task) = serve(app).await;

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();
    (base, client)
}

#[tokio::test]
async fn test_storefront_login_cart_checkout() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;

    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"userId": "ada", "password": "engine"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let customer: Value = response.json().await.unwrap();
    assert_eq!(customer["firstName"], "Ada");

    let response = client
        .post(format!("{base}/cart"))
        .json(&json!({
            "productName": "Canvas Tote",
            "color": "Black",
            "size": "Large",
            "quantity": 2
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cart: Value = response.json().await.unwrap();
    assert_eq!(cart["itemCount"], 2);
    assert_eq!(cart["lines"][0]["sku"], 1003);

    let response = client
        .post(format!("{base}/checkout"))
        .json(&checkout_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let receipt: Value = response.json().await.unwrap();
    assert_eq!(receipt["lines"][0]["placed"], true);

    let placed = backend
        .state()
        .orders()
        .into_iter()
        .filter(|o| o.sku == Sku::new(1003))
        .count();
    assert_eq!(placed, 1);
}

async fn login_with_cart(base: &str, client: &reqwest::Client) {
    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"userId": "ada", "password": "engine"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{base}/cart"))
        .json(&json!({
            "productName": "Canvas Tote",
            "color": "Tan",
            "size": "Medium",
            "quantity": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_storefront_same_cart_is_not_checked_out_twice() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;
    login_with_cart(&base, &client).await;

    let response = client
        .post(format!("{base}/checkout"))
        .json(&checkout_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(backend.state().calls_to("add/order").len(), 1);

    let response = client
        .post(format!("{base}/checkout"))
        .json(&checkout_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    assert_eq!(backend.state().calls_to("add/order").len(), 1);
    assert_eq!(backend.state().payments().len(), 1);

    // Changing the cart allows a new checkout.
    let response = client
        .post(format!("{base}/cart"))
        .json(&json!({
            "productName": "Wool Beanie",
            "color": "Grey",
            "size": "One Size",
            "quantity": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{base}/checkout"))
        .json(&checkout_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(backend.state().payments().len(), 2);
}

#[tokio::test]
async fn test_storefront_concurrent_checkout_is_refused() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;
    login_with_cart(&base, &client).await;
    let release = backend.state().hold_next("add/payment");

    let first = tokio::spawn({
        let client = client.clone();
        let url = format!("{base}/checkout");
        async move { client.post(url).json(&checkout_body()).send().await }
    });
    while backend.state().calls_to("add/payment").is_empty() {
        tokio::task::yield_now().await;
    }

    let response = client
        .post(format!("{base}/checkout"))
        .json(&checkout_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    release.notify_one();
    assert_eq!(first.await.unwrap().unwrap().status(), 200);
    assert_eq!(backend.state().payments().len(), 1);
    assert_eq!(backend.state().calls_to("add/order").len(), 1);
}

#[tokio::test]
async fn test_storefront_concurrent_adds_keep_both_lines() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;
    login_with_cart(&base, &client).await;
    let release = backend.state().hold_next("product/sku");

    // The first add stalls on its SKU lookup while the second one finishes.
    let slow = tokio::spawn({
        let client = client.clone();
        let url = format!("{base}/cart");
        async move {
            client
                .post(url)
                .json(&json!({
                    "productName": "Canvas Tote",
                    "color": "Black",
                    "size": "Large",
                    "quantity": 1
                }))
                .send()
                .await
        }
    });
    while backend.state().calls_to("product/sku").len() < 2 {
        tokio::task::yield_now().await;
    }

    let response = client
        .post(format!("{base}/cart"))
        .json(&json!({
            "productName": "Wool Beanie",
            "color": "Grey",
            "size": "One Size",
            "quantity": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    release.notify_one();
    assert_eq!(slow.await.unwrap().unwrap().status(), 200);

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut skus: Vec<i64> = cart["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["sku"].as_i64().unwrap())
        .collect();
    skus.sort_unstable();
    assert_eq!(skus, [1001, 1003, 2001]);
}

#[tokio::test]
async fn test_storefront_checkout_requires_login() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;

    let response = client
        .post(format!("{base}/checkout"))
        .json(&checkout_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    assert!(backend.state().payments().is_empty());
}

#[tokio::test]
async fn test_storefront_wrong_password_is_unauthorized() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;

    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"userId": "ada", "password": "babbage"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    assert!(backend.state().calls_to("customer").is_empty());
}

#[tokio::test]
async fn test_storefront_unknown_variant_is_not_added() {
    let backend = FakeBackend::start().await;
    let (base, client) = storefront(&backend).await;

    let response = client
        .post(format!("{base}/cart"))
        .json(&json!({
            "productName": "Canvas Tote",
            "color": "Purple",
            "size": "Small",
            "quantity": 1
        }))
        .send()
        .await
        .unwrap();
    assert!(!response.status().is_success());

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["itemCount"], 0);
}
