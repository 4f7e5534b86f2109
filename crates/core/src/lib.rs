//! Comforty Core - Shared domain types.
//!
//! This crate provides the types used across all Comforty components:
//! - `storefront` - Catalog reader, cart/wishlist stores, checkout and HTTP API
//! - `cli` - Command-line catalog inspection and checkout quotes
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. Invariants that can be carried by a type (non-negative prices,
//! non-negative inventory, distinct id types) are enforced here so that the
//! rest of the workspace never sees a malformed record.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, order status, product and category records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
