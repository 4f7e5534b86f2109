//! Values stored outside the shopper context.

pub mod session;

pub use session::keys as session_keys;
