//! Core types for Threadline.
//!
//! This module provides type-safe wrappers for domain concepts and the
//! records exchanged with the backend.

pub mod customer;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use customer::{Customer, ShippingAddress};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderNumber};
pub use price::Price;
pub use product::Product;
pub use status::OrderStatus;
