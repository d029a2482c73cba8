//! In-memory backend for admin service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use threadline_api::{
    ApiError, CatalogApi, CustomerApi, LoginRequest, OrderApi, PaymentRequest,
    RegistrationRequest, ShippingRequest,
};
use threadline_core::{
    Customer, CustomerId, Order, OrderSk, OrderStatus, Price, Product, ShippingAddress,
    ShippingId, Sku,
};

#[derive(Default)]
pub struct FakeStore {
    products: Mutex<Vec<Product>>,
    customers: Mutex<Vec<Customer>>,
    orders: Mutex<Vec<Order>>,
    addresses: Mutex<HashMap<CustomerId, ShippingAddress>>,
    failing_paths: Mutex<HashSet<String>>,
    failing_customers: Mutex<HashSet<CustomerId>>,
    failing_skus: Mutex<HashSet<Sku>>,
    calls: Mutex<Vec<String>>,
}

#[allow(clippy::unwrap_used)]
impl FakeStore {
    pub fn seeded() -> Self {
        let store = Self::default();
        *store.products.lock().unwrap() = vec![
            product(1001, "Tan", 12),
            product(1002, "Black", 4),
        ];
        *store.customers.lock().unwrap() = vec![
            customer(1, "Ada", "Lovelace"),
            customer(2, "Grace", "Hopper"),
        ];
        *store.orders.lock().unwrap() = vec![
            order(1, 1001, 1, OrderStatus::Ordered),
            order(2, 1002, 2, OrderStatus::Shipped),
        ];
        store.addresses.lock().unwrap().insert(
            CustomerId::new(1),
            ShippingAddress {
                address_line1: "12 Analytical Way".to_string(),
                address_line2: Some("Apt 2".to_string()),
                address_line3: None,
                city: "London".to_string(),
                state_abbr: "NY".to_string(),
                zip_code: "10001".to_string(),
            },
        );
        store
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose path starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    pub fn fail_path(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_customer(&self, id: CustomerId) {
        self.failing_customers.lock().unwrap().insert(id);
    }

    pub fn fail_update(&self, sku: Sku) {
        self.failing_skus.lock().unwrap().insert(sku);
    }

    fn call(&self, path: &str, detail: &str) -> Result<(), ApiError> {
        let entry = if detail.is_empty() {
            path.to_string()
        } else {
            format!("{path}:{detail}")
        };
        self.calls.lock().unwrap().push(entry);

        if self.failing_paths.lock().unwrap().contains(path) {
            return Err(server_error(path));
        }
        Ok(())
    }
}

pub fn server_error(path: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        path: path.to_string(),
        message: "Internal Server Error".to_string(),
    }
}

pub fn product(sku: i32, color: &str, quantity: i32) -> Product {
    Product {
        sku: Sku::new(sku),
        product_name: "Canvas Tote".to_string(),
        price: Price::from_cents(2_999),
        product_image_id: None,
        size: "Medium".to_string(),
        color: color.to_string(),
        quantity,
    }
}

pub fn customer(id: i32, first: &str, last: &str) -> Customer {
    Customer {
        customer_id: CustomerId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email_address: format!("{}@example.com", first.to_lowercase()),
        phone_number: None,
    }
}

pub fn order(order_sk: i32, sku: i32, customer_id: i32, status: OrderStatus) -> Order {
    Order {
        order_sk: Some(OrderSk::new(order_sk)),
        sku: Sku::new(sku),
        status,
        shipping_id: Some(ShippingId::new(order_sk)),
        customer_id: CustomerId::new(customer_id),
        order_number: None,
    }
}

#[allow(clippy::unwrap_used)]
impl CatalogApi for FakeStore {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.call("products", "")?;
        Ok(self.products())
    }

    async fn search_product(&self, name: &str) -> Result<Option<Product>, ApiError> {
        self.call("product", name)?;
        Ok(self.products().into_iter().find(|p| p.product_name == name))
    }

    async fn product_by_sku(&self, sku: Sku) -> Result<Option<Product>, ApiError> {
        self.call("product", &sku.to_string())?;
        Ok(self.products().into_iter().find(|p| p.sku == sku))
    }

    async fn resolve_sku(&self, _name: &str, _color: &str, _size: &str) -> Result<Sku, ApiError> {
        self.call("product/sku", "")?;
        Ok(Sku::new(1001))
    }

    async fn add_product(&self, product: &Product) -> Result<(), ApiError> {
        self.call("add/product", &product.sku.to_string())?;
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), ApiError> {
        self.call("update/product", &product.sku.to_string())?;
        if self.failing_skus.lock().unwrap().contains(&product.sku) {
            return Err(server_error("update/product"));
        }
        let mut products = self.products.lock().unwrap();
        if let Some(row) = products.iter_mut().find(|p| p.sku == product.sku) {
            *row = product.clone();
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
impl CustomerApi for FakeStore {
    async fn login(&self, _request: &LoginRequest) -> Result<CustomerId, ApiError> {
        self.call("login", "")?;
        Ok(CustomerId::new(1))
    }

    async fn register(&self, _request: &RegistrationRequest) -> Result<CustomerId, ApiError> {
        self.call("add/user", "")?;
        Ok(CustomerId::new(3))
    }

    async fn add_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        self.call("add/customer", "")?;
        self.customers.lock().unwrap().push(customer.clone());
        Ok(())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, ApiError> {
        self.call("customer", &id.to_string())?;
        if self.failing_customers.lock().unwrap().contains(&id) {
            return Err(server_error("customer"));
        }
        self.customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.customer_id == id)
            .cloned()
            .ok_or_else(|| server_error("customer"))
    }

    async fn get_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.call("customers", "")?;
        Ok(self.customers.lock().unwrap().clone())
    }

    async fn shipping_address(&self, id: CustomerId) -> Result<Option<ShippingAddress>, ApiError> {
        self.call("shippingAddressByCustomerId", &id.to_string())?;
        Ok(self.addresses.lock().unwrap().get(&id).cloned())
    }
}

#[allow(clippy::unwrap_used)]
impl OrderApi for FakeStore {
    async fn submit_payment(&self, _request: &PaymentRequest) -> Result<(), ApiError> {
        self.call("add/payment", "")
    }

    async fn submit_shipping(&self, _request: &ShippingRequest) -> Result<ShippingId, ApiError> {
        self.call("add/shipping", "")?;
        Ok(ShippingId::new(1))
    }

    async fn submit_order(&self, order: &Order) -> Result<(), ApiError> {
        self.call("add/order", "")?;
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn get_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.call("ordersByParam", "")?;
        Ok(self.orders())
    }

    async fn orders_by_customer(&self, id: CustomerId) -> Result<Vec<Order>, ApiError> {
        self.call("orders", &id.to_string())?;
        Ok(self
            .orders()
            .into_iter()
            .filter(|o| o.customer_id == id)
            .collect())
    }

    async fn update_order(&self, order: &Order) -> Result<(), ApiError> {
        let key = order.order_sk.map(|sk| sk.to_string()).unwrap_or_default();
        self.call("update/order", &key)?;
        let mut orders = self.orders.lock().unwrap();
        if let Some(row) = orders.iter_mut().find(|o| o.order_sk == order.order_sk) {
            *row = order.clone();
        }
        Ok(())
    }
}
