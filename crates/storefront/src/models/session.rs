//! Session-related types.
//!
//! Only small values live in the session: the id of the shopper context
//! and the applied discount. Cart and wishlist contents are held in
//! memory by the shopper registry.

/// Session keys.
pub mod keys {
    /// Key for the shopper context id (`Uuid`).
    pub const SHOPPER_ID: &str = "shopper_id";

    /// Key for the session-scoped discount amount.
    pub const APPLIED_DISCOUNT: &str = "applied_discount";
}
