//! Wishlist store.

use comforty_core::{Product, ProductId};
use tokio::sync::watch;

use super::CartStore;

/// Saved products, without quantities and without duplicates.
#[derive(Debug)]
pub struct WishlistStore {
    items: Vec<Product>,
    count: watch::Sender<usize>,
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            count: watch::Sender::new(0),
        }
    }

    /// Save `product`. Adding a product that is already saved does nothing.
    pub fn add_item(&mut self, product: Product) {
        if self.contains(&product.id) {
            return;
        }
        self.items.push(product);
        self.publish();
    }

    /// Remove and return the saved product for `id`.
    pub fn remove_item(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.items.iter().position(|p| &p.id == id)?;
        let product = self.items.remove(index);
        self.publish();
        Some(product)
    }

    /// Move a saved product into `cart` with quantity 1.
    ///
    /// Returns the moved product, or `None` if it was not saved.
    pub fn move_to_cart(&mut self, id: &ProductId, cart: &mut CartStore) -> Option<Product> {
        let product = self.remove_item(id)?;
        cart.add_item(product.clone(), 1);
        Some(product)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Receiver that observes the wishlist count after each change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    fn publish(&self) {
        self.count.send_replace(self.items.len());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::sample_product as product;

    #[test]
    fn test_add_twice_keeps_one() {
        let mut wishlist = WishlistStore::new();
        wishlist.add_item(product("a", 1000));
        let mut rx = wishlist.subscribe();
        rx.mark_unchanged();
        wishlist.add_item(product("a", 1000));

        assert_eq!(wishlist.count(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_remove() {
        let mut wishlist = WishlistStore::new();
        wishlist.add_item(product("a", 1000));
        wishlist.add_item(product("b", 1000));

        assert!(wishlist.remove_item(&ProductId::new("a")).is_some());
        assert!(wishlist.remove_item(&ProductId::new("a")).is_none());
        assert!(!wishlist.contains(&ProductId::new("a")));
        assert_eq!(*wishlist.subscribe().borrow(), 1);
    }

    #[test]
    fn test_move_to_cart() {
        let mut wishlist = WishlistStore::new();
        let mut cart = CartStore::new();
        wishlist.add_item(product("a", 1000));
        cart.add_item(product("a", 1000), 2);

        let moved = wishlist.move_to_cart(&ProductId::new("a"), &mut cart);

        assert_eq!(moved.unwrap().id.as_str(), "a");
        assert_eq!(wishlist.count(), 0);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_move_unknown_leaves_cart_alone() {
        let mut wishlist = WishlistStore::new();
        let mut cart = CartStore::new();

        assert!(wishlist.move_to_cart(&ProductId::new("a"), &mut cart).is_none());
        assert!(cart.is_empty());
    }
}
