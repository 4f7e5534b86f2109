//! Checkout calculator.

use comforty_core::Price;
use serde::Serialize;

use crate::store::CartItem;

/// Subtotal, applied discount and total for a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutTotals {
    pub subtotal: Price,
    /// The discount actually applied, never more than the subtotal.
    pub discount: Price,
    pub total: Price,
}

impl CheckoutTotals {
    /// Apply `discount` to `subtotal`. The total never goes below zero.
    #[must_use]
    pub fn from_subtotal(subtotal: Price, discount: Price) -> Self {
        let applied = discount.min(subtotal);
        Self {
            subtotal,
            discount: applied,
            total: subtotal.saturating_sub(applied),
        }
    }
}

/// Totals for `items` with `discount` applied.
#[must_use]
pub fn calculate(items: &[CartItem], discount: Price) -> CheckoutTotals {
    let subtotal = items.iter().map(CartItem::line_total).sum();
    CheckoutTotals::from_subtotal(subtotal, discount)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::CartStore;
    use crate::store::sample_product as product;

    fn dollars(amount: i64) -> Price {
        Price::from_cents(amount * 100).unwrap()
    }

    #[test]
    fn test_discount_subtracted() {
        let totals = CheckoutTotals::from_subtotal(dollars(100), dollars(20));
        assert_eq!(totals.total, dollars(80));
        assert_eq!(totals.discount, dollars(20));
    }

    #[test]
    fn test_total_never_negative() {
        let totals = CheckoutTotals::from_subtotal(dollars(50), dollars(1000));
        assert_eq!(totals.total, Price::ZERO);
        assert_eq!(totals.discount, dollars(50));
    }

    #[test]
    fn test_calculate_sums_lines() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1999), 3);
        cart.add_item(product("b", 1), 1);

        let totals = calculate(cart.items(), Price::ZERO);
        assert_eq!(totals.subtotal, Price::from_cents(5998).unwrap());
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(calculate(&[], dollars(10)), CheckoutTotals::default());
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Total is max(subtotal - discount, 0) and never negative.
            #[test]
            fn prop_total_never_negative(
                subtotal in 0i64..10_000_000_000,
                discount in 0i64..10_000_000_000,
            ) {
                let subtotal = Price::from_cents(subtotal).unwrap();
                let discount = Price::from_cents(discount).unwrap();
                let totals = CheckoutTotals::from_subtotal(subtotal, discount);

                prop_assert!(!totals.total.amount().is_sign_negative());
                prop_assert!(totals.discount <= subtotal);
                prop_assert_eq!(totals.total + totals.discount, subtotal);
                if discount >= subtotal {
                    prop_assert_eq!(totals.total, Price::ZERO);
                } else {
                    prop_assert_eq!(totals.total.amount(), subtotal.amount() - discount.amount());
                }
            }
        }
    }
}
