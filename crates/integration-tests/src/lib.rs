//! Integration tests for Threadline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```
//!
//! No external services are needed. [`FakeBackend`] serves the backend REST
//! contract from memory on an ephemeral port and records every call, so
//! tests can drive the real `reqwest` client, the storefront, and the admin
//! panel against it and then inspect what reached the backend.
//!
//! # Test Categories
//!
//! - `api_client` - Wire contract of the REST client
//! - `checkout` - Checkout sequence, directly and through the storefront
//! - `admin` - Credential gate, table population, and reconciliation

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use threadline_api::{ApiClient, ApiConfig};
use threadline_core::{
    Customer, CustomerId, Order, OrderSk, OrderStatus, Price, Product, ProductImageId,
    ShippingAddress, ShippingId, Sku,
};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// A request the backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    /// Path below `/api/`, e.g. `product/sku`.
    pub path: String,
    pub query: Option<String>,
}

#[derive(Default)]
struct Store {
    products: Vec<Product>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    addresses: HashMap<CustomerId, ShippingAddress>,
    users: HashMap<String, (String, CustomerId)>,
    payments: Vec<Value>,
    shipments: Vec<Value>,
    calls: Vec<RecordedCall>,
    failing_paths: HashMap<String, u16>,
    held_paths: HashMap<String, Arc<Notify>>,
    rejected_skus: HashSet<Sku>,
    next_id: i32,
}

impl Store {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared, inspectable backend data.
#[derive(Clone, Default)]
pub struct BackendState {
    inner: Arc<Mutex<Store>>,
}

impl BackendState {
    /// A small catalog, two customers with logins, and two orders.
    ///
    /// | user    | password | customer |
    /// |---------|----------|----------|
    /// | `ada`   | `engine` | 1        |
    /// | `grace` | `cobol`  | 2        |
    #[must_use]
    pub fn seeded() -> Self {
        let state = Self::default();
        {
            let mut store = state.lock();
            store.products = vec![
                product(1001, "Canvas Tote", "Tan", "Medium", 2_999, 12),
                product(1002, "Canvas Tote", "Black", "Medium", 2_999, 4),
                product(1003, "Canvas Tote", "Black", "Large", 3_499, 2),
                product(2001, "Wool Beanie", "Grey", "One Size", 1_800, 30),
            ];
            store.customers = vec![
                customer(1, "Ada", "Lovelace"),
                customer(2, "Grace", "Hopper"),
            ];
            store
                .users
                .insert("ada".to_string(), ("engine".to_string(), CustomerId::new(1)));
            store
                .users
                .insert("grace".to_string(), ("cobol".to_string(), CustomerId::new(2)));
            store.addresses.insert(
                CustomerId::new(1),
                ShippingAddress {
                    address_line1: "12 Analytical Way".to_string(),
                    address_line2: Some("Apt 2".to_string()),
                    address_line3: None,
                    city: "Portland".to_string(),
                    state_abbr: "OR".to_string(),
                    zip_code: "97201".to_string(),
                },
            );
            store.orders = vec![
                order(1, 1001, 1, OrderStatus::Ordered),
                order(2, 2001, 2, OrderStatus::Shipped),
            ];
            store.next_id = 100;
        }
        state
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls to exactly `path`.
    #[must_use]
    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    #[must_use]
    pub fn payments(&self) -> Vec<Value> {
        self.lock().payments.clone()
    }

    #[must_use]
    pub fn shipments(&self) -> Vec<Value> {
        self.lock().shipments.clone()
    }

    /// Answer every request to `path` with `status`.
    pub fn fail(&self, path: &str, status: u16) {
        self.lock().failing_paths.insert(path.to_string(), status);
    }

    /// Park the next request to `path` until the returned handle is notified.
    ///
    /// Only the first matching request waits; later ones pass straight through.
    #[must_use]
    pub fn hold_next(&self, path: &str) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.lock()
            .held_paths
            .insert(path.to_string(), Arc::clone(&release));
        release
    }

    /// Refuse `update/product` for this SKU.
    pub fn reject_update(&self, sku: Sku) {
        self.lock().rejected_skus.insert(sku);
    }

    /// Remove a customer record, leaving their orders in place.
    pub fn forget_customer(&self, id: CustomerId) {
        self.lock().customers.retain(|c| c.customer_id != id);
    }
}

fn product(sku: i32, name: &str, color: &str, size: &str, cents: i64, quantity: i32) -> Product {
    Product {
        sku: Sku::new(sku),
        product_name: name.to_string(),
        price: Price::from_cents(cents),
        product_image_id: Some(ProductImageId::new(sku)),
        size: size.to_string(),
        color: color.to_string(),
        quantity,
    }
}

fn customer(id: i32, first: &str, last: &str) -> Customer {
    Customer {
        customer_id: CustomerId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email_address: format!("{}@example.com", first.to_lowercase()),
        phone_number: None,
    }
}

fn order(order_sk: i32, sku: i32, customer_id: i32, status: OrderStatus) -> Order {
    Order {
        order_sk: Some(OrderSk::new(order_sk)),
        sku: Sku::new(sku),
        status,
        shipping_id: Some(ShippingId::new(order_sk)),
        customer_id: CustomerId::new(customer_id),
        order_number: None,
    }
}

/// An in-process backend bound to `127.0.0.1` on an ephemeral port.
///
/// The server task is aborted on drop.
pub struct FakeBackend {
    addr: SocketAddr,
    state: BackendState,
    task: JoinHandle<()>,
}

impl FakeBackend {
    /// Start with [`BackendState::seeded`] data.
    pub async fn start() -> Self {
        Self::start_with(BackendState::seeded()).await
    }

    pub async fn start_with(state: BackendState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");
        let app = router(state.clone());
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    /// Base URL including the `/api` prefix.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::from_base_url(&self.base_url()).expect("Fake backend URL is valid")
    }

    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.api_config()).expect("Failed to build API client")
    }

    #[must_use]
    pub const fn state(&self) -> &BackendState {
        &self.state
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Serve `app` on an ephemeral port and return its base URL.
///
/// Used to run the real storefront and admin routers in tests.
pub async fn serve(app: Router) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Test server has no address");
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), task)
}

// =============================================================================
// Backend routes
// =============================================================================

fn router(state: BackendState) -> Router {
    let api = Router::new()
        .route("/products", get(get_products))
        .route("/product", get(get_product))
        .route("/product/sku", get(resolve_sku))
        .route("/add/product", post(add_product))
        .route("/update/product", post(update_product))
        .route("/login", post(login))
        .route("/add/user", post(add_user))
        .route("/add/customer", post(add_customer))
        .route("/customer", get(get_customer))
        .route("/customers", get(get_customers))
        .route("/shippingAddressByCustomerId", get(get_shipping_address))
        .route("/add/payment", post(add_payment))
        .route("/add/shipping", post(add_shipping))
        .route("/add/order", post(add_order))
        .route("/ordersByParam", get(orders_by_param))
        .route("/orders", get(orders_by_customer))
        .route("/update/order", post(update_order));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<BackendState>, request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path()
        .trim_start_matches("/api/")
        .to_string();
    let call = RecordedCall {
        method: request.method().to_string(),
        path: path.clone(),
        query: request.uri().query().map(String::from),
    };

    let (failure, hold) = {
        let mut store = state.lock();
        store.calls.push(call);
        let hold = store.held_paths.remove(&path);
        (store.failing_paths.get(&path).copied(), hold)
    };
    if let Some(release) = hold {
        release.notified().await;
    }
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "injected failure").into_response();
    }

    next.run(request).await
}

type Params = Query<HashMap<String, String>>;

/// What the backend sends when an `Optional` lookup comes up empty.
fn no_value() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "No value present").into_response()
}

fn message(id: impl ToString) -> Json<Value> {
    Json(json!({ "message": id.to_string() }))
}

fn param_id(params: &HashMap<String, String>, key: &str) -> Option<i32> {
    params.get(key).and_then(|v| v.parse().ok())
}

async fn get_products(State(state): State<BackendState>) -> Json<Vec<Product>> {
    Json(state.products())
}

async fn get_product(State(state): State<BackendState>, Query(params): Params) -> Response {
    let products = state.products();
    let found = if let Some(name) = params.get("productName") {
        products.into_iter().find(|p| &p.product_name == name)
    } else if let Some(sku) = param_id(&params, "sku") {
        products.into_iter().find(|p| p.sku == Sku::new(sku))
    } else {
        None
    };

    // Absence is an empty 200, not a 404.
    found.map_or_else(|| StatusCode::OK.into_response(), |p| Json(p).into_response())
}

async fn resolve_sku(State(state): State<BackendState>, Query(params): Params) -> Response {
    let field = |key: &str| params.get(key).cloned().unwrap_or_default();
    let (name, color, size) = (field("name"), field("color"), field("size"));

    state
        .products()
        .into_iter()
        .find(|p| p.product_name == name && p.color == color && p.size == size)
        .map_or_else(no_value, |p| message(p.sku).into_response())
}

async fn add_product(State(state): State<BackendState>, Json(product): Json<Product>) -> StatusCode {
    state.lock().products.push(product);
    StatusCode::OK
}

async fn update_product(
    State(state): State<BackendState>,
    Json(product): Json<Product>,
) -> StatusCode {
    let mut store = state.lock();
    if store.rejected_skus.contains(&product.sku) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match store.products.iter_mut().find(|p| p.sku == product.sku) {
        Some(row) => {
            *row = product;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn login(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    let user_id = body["userID"].as_str().unwrap_or_default();
    let password = body["userPass"].as_str().unwrap_or_default();

    let store = state.lock();
    match store.users.get(user_id) {
        Some((expected, customer_id)) if expected == password => {
            message(customer_id).into_response()
        }
        _ => no_value(),
    }
}

async fn add_user(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    let user_id = body["userID"].as_str().unwrap_or_default().to_string();
    let password = body["userPass"].as_str().unwrap_or_default().to_string();

    let mut store = state.lock();
    if user_id.is_empty() || store.users.contains_key(&user_id) {
        return (StatusCode::CONFLICT, "User exists").into_response();
    }
    let customer_id = CustomerId::new(store.allocate_id());
    store.users.insert(user_id, (password, customer_id));
    message(customer_id).into_response()
}

async fn add_customer(
    State(state): State<BackendState>,
    Json(customer): Json<Customer>,
) -> StatusCode {
    let mut store = state.lock();
    store
        .customers
        .retain(|c| c.customer_id != customer.customer_id);
    store.customers.push(customer);
    StatusCode::OK
}

async fn get_customer(State(state): State<BackendState>, Query(params): Params) -> Response {
    let Some(id) = param_id(&params, "customerID") else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    state
        .lock()
        .customers
        .iter()
        .find(|c| c.customer_id == CustomerId::new(id))
        .cloned()
        .map_or_else(no_value, |c| Json(c).into_response())
}

async fn get_customers(State(state): State<BackendState>) -> Json<Vec<Customer>> {
    Json(state.lock().customers.clone())
}

async fn get_shipping_address(
    State(state): State<BackendState>,
    Query(params): Params,
) -> Response {
    let Some(id) = param_id(&params, "customerID") else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    state
        .lock()
        .addresses
        .get(&CustomerId::new(id))
        .cloned()
        .map_or_else(|| StatusCode::OK.into_response(), |a| Json(a).into_response())
}

async fn add_payment(State(state): State<BackendState>, Json(body): Json<Value>) -> StatusCode {
    state.lock().payments.push(body);
    StatusCode::OK
}

async fn add_shipping(State(state): State<BackendState>, Json(body): Json<Value>) -> Json<Value> {
    let mut store = state.lock();
    let shipping_id = store.allocate_id();

    if let Some(customer_id) = body["customerId"].as_i64().and_then(|id| i32::try_from(id).ok()) {
        let text = |key: &str| body[key].as_str().unwrap_or_default().to_string();
        let optional = |key: &str| Some(text(key)).filter(|s| !s.is_empty());
        store.addresses.insert(
            CustomerId::new(customer_id),
            ShippingAddress {
                address_line1: text("addressLine1"),
                address_line2: optional("addressLine2"),
                address_line3: optional("addressLine3"),
                city: text("city"),
                state_abbr: text("stateAbbr"),
                zip_code: text("zipCode"),
            },
        );
    }

    store.shipments.push(body);
    message(shipping_id)
}

async fn add_order(State(state): State<BackendState>, Json(mut order): Json<Order>) -> StatusCode {
    let mut store = state.lock();
    order.order_sk = Some(OrderSk::new(store.allocate_id()));
    store.orders.push(order);
    StatusCode::OK
}

async fn orders_by_param(
    State(state): State<BackendState>,
    Query(params): Params,
) -> Json<Vec<Order>> {
    let status = params.get("status").map_or("*", String::as_str);
    let orders = state
        .orders()
        .into_iter()
        .filter(|o| status == "*" || o.status.as_str() == status)
        .collect();
    Json(orders)
}

async fn orders_by_customer(
    State(state): State<BackendState>,
    Query(params): Params,
) -> Json<Vec<Order>> {
    let id = param_id(&params, "customerId").map(CustomerId::new);
    let orders = state
        .orders()
        .into_iter()
        .filter(|o| Some(o.customer_id) == id)
        .collect();
    Json(orders)
}

async fn update_order(State(state): State<BackendState>, Json(order): Json<Order>) -> StatusCode {
    let mut store = state.lock();
    match store
        .orders
        .iter_mut()
        .find(|o| o.order_sk.is_some() && o.order_sk == order.order_sk)
    {
        Some(row) => {
            *row = order;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}
