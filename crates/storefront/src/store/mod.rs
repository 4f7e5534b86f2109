//! Per-shopper stores: cart, wishlist and the "added to cart" notice.
//!
//! Stores are plain owned values. Every state-changing call publishes a
//! summary on a `tokio::sync::watch` channel; calls that change nothing
//! publish nothing.

mod cart;
mod notice;
mod wishlist;

pub use cart::{CartItem, CartStore, CartSummary};
pub use notice::{DEFAULT_NOTICE_DURATION, Notice, NoticeTimer};
pub use wishlist::WishlistStore;

#[cfg(test)]
pub(crate) use cart::tests::product as sample_product;
