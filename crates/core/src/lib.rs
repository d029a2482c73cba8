//! Threadline Core - Shared types and business rules.
//!
//! This crate provides the domain model used across all Threadline components:
//! - `storefront` - Shopper-facing JSON service (cart, catalog, checkout)
//! - `admin` - Operator-facing JSON service (tables, reconciliation)
//! - `cli` - Command-line access to the backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no sessions. Everything here can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, order status, and the wire records
//! - [`pricing`] - Cart subtotal, shipping, tax, and final total
//! - [`cart`] - Session-owned cart of line items
//! - [`catalog`] - Product de-duplication and shopper filters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartError, LineItem, ProductSelection};
pub use catalog::{CatalogView, FilterMode, FilterSelection, PriceRange};
pub use pricing::CartTotals;
pub use types::*;
