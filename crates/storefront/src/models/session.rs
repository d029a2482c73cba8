//! Session-related types.
//!
//! The cart and the logged-in customer live in the shopper's session. Both
//! are stored as JSON under the keys below.

/// Session keys for shopper state.
pub mod keys {
    /// Key for the logged-in [`threadline_core::Customer`].
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for the shopper's [`threadline_core::Cart`].
    pub const CART: &str = "cart";

    /// Order number of the checkout that went through for the current cart.
    ///
    /// Cleared whenever the cart changes.
    pub const SUBMITTED_ORDER: &str = "submitted_order";
}
