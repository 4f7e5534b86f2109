//! Cart store.

use comforty_core::{Price, Product, ProductId};
use serde::Serialize;
use tokio::sync::watch;

use crate::checkout::{CheckoutTotals, calculate};

/// A product in the cart with its quantity.
///
/// Identity is the product id: the cart never holds two items for the
/// same product, and `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// What cart subscribers observe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of quantities, shown on the cart badge.
    pub item_count: u32,
    /// Number of distinct products.
    pub line_count: usize,
    pub subtotal: Price,
}

/// The items a shopper intends to purchase.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartItem>,
    summary: watch::Sender<CartSummary>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            summary: watch::Sender::new(CartSummary::default()),
        }
    }

    /// Add `quantity` units of `product`, merging with an existing item.
    ///
    /// A quantity of zero leaves the cart untouched.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(item) = self.find_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product, quantity });
        }
        self.publish();
    }

    /// Remove the item for `id`, if present.
    pub fn remove_item(&mut self, id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != id);
        if self.items.len() != before {
            self.publish();
        }
    }

    /// Set the quantity for `id`. Zero removes the item; unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        let Some(item) = self.find_mut(id) else {
            return;
        };
        if item.quantity != quantity {
            item.quantity = quantity;
            self.publish();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.publish();
        }
    }

    /// Sum of quantities over all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checkout totals for the current contents with `discount` applied.
    #[must_use]
    pub fn totals(&self, discount: Price) -> CheckoutTotals {
        calculate(&self.items, discount)
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count(),
            line_count: self.items.len(),
            subtotal: self.subtotal(),
        }
    }

    /// Receiver that observes the cart summary after each change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary.subscribe()
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.product.id == id)
    }

    fn publish(&self) {
        self.summary.send_replace(self.summary());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents).unwrap(),
            price_without_discount: None,
            badge: None,
            image: None,
            category: None,
            description: None,
            inventory: 10,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_item_count_sums_merged_quantities() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1000), 1);
        cart.add_item(product("b", 500), 3);
        cart.add_item(product("a", 1000), 2);

        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = CartStore::new();
        let rx = cart.subscribe();
        cart.add_item(product("a", 1000), 0);

        assert!(cart.is_empty());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1000), 4);
        cart.update_quantity(&ProductId::new("a"), 0);

        assert!(cart.get(&ProductId::new("a")).is_none());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_update_and_remove_unknown_ids_are_noops() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1000), 1);
        let mut rx = cart.subscribe();
        rx.mark_unchanged();

        cart.update_quantity(&ProductId::new("zzz"), 5);
        cart.remove_item(&ProductId::new("zzz"));
        cart.update_quantity(&ProductId::new("a"), 1);

        assert!(!rx.has_changed().unwrap());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let mut cart = CartStore::new();
        let mut rx = cart.subscribe();

        cart.add_item(product("a", 1250), 2);
        assert!(rx.has_changed().unwrap());
        let summary = *rx.borrow_and_update();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.line_count, 1);
        assert_eq!(summary.subtotal, Price::from_cents(2500).unwrap());

        cart.clear();
        assert_eq!(*rx.borrow_and_update(), CartSummary::default());
    }

    #[test]
    fn test_clear_empty_cart_does_not_notify() {
        let mut cart = CartStore::new();
        let rx = cart.subscribe();
        cart.clear();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_totals() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 2000), 2);
        cart.add_item(product("b", 1000), 6);

        let totals = cart.totals(Price::from_cents(2000).unwrap());
        assert_eq!(totals.subtotal, Price::from_cents(10000).unwrap());
        assert_eq!(totals.total, Price::from_cents(8000).unwrap());
    }

    #[test]
    fn test_oversized_line_saturates_instead_of_panicking() {
        let mut huge = product("a", 0);
        huge.price = Price::from_f64(1e20).unwrap();

        let mut cart = CartStore::new();
        let rx = cart.subscribe();
        cart.add_item(huge, 1_000_000_000);

        assert_eq!(rx.borrow().subtotal, Price::MAX);
        assert_eq!(cart.totals(Price::from_cents(500).unwrap()).subtotal, Price::MAX);

        cart.add_item(product("b", 1000), 1);
        assert_eq!(cart.subtotal(), Price::MAX);
        assert_eq!(cart.item_count(), 1_000_000_001);
    }

    mod properties {
        use std::collections::HashMap;

        use proptest::prelude::*;

        use super::*;

        fn arb_adds() -> impl Strategy<Value = Vec<(u8, u32)>> {
            prop::collection::vec((0u8..6, 0u32..50), 0..40)
        }

        proptest! {
            /// Item count is the sum of all added quantities, merged by id.
            #[test]
            fn prop_item_count_is_sum_of_adds(adds in arb_adds()) {
                let mut cart = CartStore::new();
                let mut expected: HashMap<u8, u32> = HashMap::new();
                for &(id, quantity) in &adds {
                    cart.add_item(product(&format!("p{id}"), 1000), quantity);
                    if quantity > 0 {
                        *expected.entry(id).or_default() += quantity;
                    }
                }

                prop_assert_eq!(cart.item_count(), adds.iter().map(|(_, q)| q).sum::<u32>());
                prop_assert_eq!(cart.items().len(), expected.len());
                for (id, quantity) in &expected {
                    let item = cart.get(&ProductId::new(format!("p{id}"))).unwrap();
                    prop_assert_eq!(item.quantity, *quantity);
                }
            }

            /// Setting a quantity of zero always removes the id.
            #[test]
            fn prop_update_to_zero_removes(adds in arb_adds(), target in 0u8..6) {
                let mut cart = CartStore::new();
                for &(id, quantity) in &adds {
                    cart.add_item(product(&format!("p{id}"), 1000), quantity);
                }
                let target = ProductId::new(format!("p{target}"));
                let others: u32 = cart
                    .items()
                    .iter()
                    .filter(|item| item.product.id != target)
                    .map(|item| item.quantity)
                    .sum();

                cart.update_quantity(&target, 0);

                prop_assert!(cart.get(&target).is_none());
                prop_assert_eq!(cart.item_count(), others);
            }
        }
    }
}
