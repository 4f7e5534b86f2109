//! Checkout quote command.
//!
//! Builds a throwaway cart from the given line items and prints the same
//! totals the storefront would show at checkout.

use std::io::Write;
use std::str::FromStr;

use comforty_core::{Price, ProductId};
use comforty_storefront::store::CartStore;
use rust_decimal::Decimal;

use super::{CatalogSource, CliError};

/// A requested cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl FromStr for LineItem {
    type Err = CliError;

    /// `chair-1` or `chair-1:3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidLine(s.to_string());

        let (id, quantity) = match s.rsplit_once(':') {
            Some((id, quantity)) => (id, quantity.parse::<u32>().map_err(|_| invalid())?),
            None => (s, 1),
        };
        if id.trim().is_empty() || quantity == 0 {
            return Err(invalid());
        }

        Ok(Self {
            product_id: ProductId::new(id.trim()),
            quantity,
        })
    }
}

/// Parse a discount amount such as `20` or `12.50`.
pub fn parse_discount(raw: &str) -> Result<Price, CliError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|e| CliError::InvalidDiscount(raw.to_string(), e.to_string()))?;
    Price::new(amount.round_dp(2))
        .map_err(|e| CliError::InvalidDiscount(raw.to_string(), e.to_string()))
}

/// Print line totals, subtotal, discount and total for `items`.
pub async fn quote(
    source: &CatalogSource,
    discount: &str,
    items: &[String],
) -> Result<(), CliError> {
    let discount = parse_discount(discount)?;
    let lines = items
        .iter()
        .map(|item| item.parse::<LineItem>())
        .collect::<Result<Vec<_>, _>>()?;

    let catalog = source.catalog().await?;
    let mut cart = CartStore::new();
    for line in lines {
        let product = catalog
            .product(&line.product_id)
            .await?
            .ok_or_else(|| CliError::UnknownProduct(line.product_id.to_string()))?;
        cart.add_item(product, line.quantity);
    }

    let totals = cart.totals(discount);
    let mut out = std::io::stdout().lock();
    for item in cart.items() {
        writeln!(
            out,
            "{:<32} {:>3} x {:>10} = {:>10}",
            item.product.title,
            item.quantity,
            item.product.price.to_string(),
            item.line_total().to_string()
        )?;
    }
    writeln!(out, "{:<32} {:>29}", "Subtotal", totals.subtotal.to_string())?;
    writeln!(out, "{:<32} {:>29}", "Discount", totals.discount.to_string())?;
    writeln!(out, "{:<32} {:>29}", "Total", totals.total.to_string())?;
    Ok(())
}
