//! Trait seams over the backend contract.
//!
//! Services depend on these traits rather than on [`crate::ApiClient`]
//! directly. Each trait groups the endpoints one area of the storefront
//! uses, so a test fake only implements what its subject calls.

use std::future::Future;
use std::sync::Arc;

use threadline_core::{Customer, CustomerId, Order, Product, ShippingAddress, ShippingId, Sku};

use crate::ApiError;
use crate::types::{LoginRequest, PaymentRequest, RegistrationRequest, ShippingRequest};

/// Product endpoints.
pub trait CatalogApi: Send + Sync {
    /// `GET /products`
    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// `GET /product?productName=`; `None` when nothing matches.
    fn search_product(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;

    /// `GET /product?sku=`; `None` when nothing matches.
    fn product_by_sku(
        &self,
        sku: Sku,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;

    /// `GET /product/sku?name=&color=&size=`
    fn resolve_sku(
        &self,
        name: &str,
        color: &str,
        size: &str,
    ) -> impl Future<Output = Result<Sku, ApiError>> + Send;

    /// `POST /add/product`
    fn add_product(&self, product: &Product)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /update/product`
    fn update_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Login, registration, and customer endpoints.
pub trait CustomerApi: Send + Sync {
    /// `POST /login`; returns the customer the credentials belong to.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<CustomerId, ApiError>> + Send;

    /// `POST /add/user`; returns the new user's customer ID.
    fn register(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<CustomerId, ApiError>> + Send;

    /// `POST /add/customer`
    fn add_customer(
        &self,
        customer: &Customer,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /customer?customerID=`
    fn get_customer(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Customer, ApiError>> + Send;

    /// `GET /customers`
    fn get_customers(&self) -> impl Future<Output = Result<Vec<Customer>, ApiError>> + Send;

    /// `GET /shippingAddressByCustomerId?customerID=`; `None` if none on file.
    fn shipping_address(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<ShippingAddress>, ApiError>> + Send;
}

/// Checkout and order endpoints.
pub trait OrderApi: Send + Sync {
    /// `POST /add/payment`
    fn submit_payment(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /add/shipping`; returns the new shipping record's ID.
    fn submit_shipping(
        &self,
        request: &ShippingRequest,
    ) -> impl Future<Output = Result<ShippingId, ApiError>> + Send;

    /// `POST /add/order`
    fn submit_order(&self, order: &Order) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /ordersByParam?status=*`
    fn get_orders(&self) -> impl Future<Output = Result<Vec<Order>, ApiError>> + Send;

    /// `GET /orders?customerId=`
    fn orders_by_customer(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Vec<Order>, ApiError>> + Send;

    /// `POST /update/order`
    fn update_order(&self, order: &Order) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// The whole backend contract.
pub trait StoreApi: CatalogApi + CustomerApi + OrderApi {}

impl<T: CatalogApi + CustomerApi + OrderApi> StoreApi for T {}

impl<T: CatalogApi> CatalogApi for Arc<T> {
    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        (**self).get_products()
    }

    fn search_product(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send {
        (**self).search_product(name)
    }

    fn product_by_sku(
        &self,
        sku: Sku,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send {
        (**self).product_by_sku(sku)
    }

    fn resolve_sku(
        &self,
        name: &str,
        color: &str,
        size: &str,
    ) -> impl Future<Output = Result<Sku, ApiError>> + Send {
        (**self).resolve_sku(name, color, size)
    }

    fn add_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).add_product(product)
    }

    fn update_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).update_product(product)
    }
}

impl<T: CustomerApi> CustomerApi for Arc<T> {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<CustomerId, ApiError>> + Send {
        (**self).login(request)
    }

    fn register(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<CustomerId, ApiError>> + Send {
        (**self).register(request)
    }

    fn add_customer(
        &self,
        customer: &Customer,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).add_customer(customer)
    }

    fn get_customer(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Customer, ApiError>> + Send {
        (**self).get_customer(id)
    }

    fn get_customers(&self) -> impl Future<Output = Result<Vec<Customer>, ApiError>> + Send {
        (**self).get_customers()
    }

    fn shipping_address(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<ShippingAddress>, ApiError>> + Send {
        (**self).shipping_address(id)
    }
}

impl<T: OrderApi> OrderApi for Arc<T> {
    fn submit_payment(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).submit_payment(request)
    }

    fn submit_shipping(
        &self,
        request: &ShippingRequest,
    ) -> impl Future<Output = Result<ShippingId, ApiError>> + Send {
        (**self).submit_shipping(request)
    }

    fn submit_order(&self, order: &Order) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).submit_order(order)
    }

    fn get_orders(&self) -> impl Future<Output = Result<Vec<Order>, ApiError>> + Send {
        (**self).get_orders()
    }

    fn orders_by_customer(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Vec<Order>, ApiError>> + Send {
        (**self).orders_by_customer(id)
    }

    fn update_order(&self, order: &Order) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).update_order(order)
    }
}
