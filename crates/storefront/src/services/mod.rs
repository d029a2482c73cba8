//! Business logic services for storefront.
//!
//! # Services
//!
//! - `account` - Login and registration against the backend user store
//! - `cart` - Resolving product selections into cart lines
//! - `catalog` - Listing, filtering, and product lookup
//! - `checkout` - Payment, shipping, and order submission
//!
//! Services are generic over the `threadline-api` traits so they can be
//! exercised against in-memory fakes.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
