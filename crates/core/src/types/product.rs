//! Catalog records.
//!
//! These are validated records: they are only built at the catalog ingestion
//! boundary, after the raw CMS document has been checked. Once built they
//! are immutable and shared by the cart, wishlist and checkout.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Reference to an image asset stored in the CMS.
///
/// The reference has the form `image-<hash>-<width>x<height>-<format>`;
/// turning it into a URL is the job of an image URL builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an asset reference.
    #[must_use]
    pub fn new(asset_ref: impl Into<String>) -> Self {
        Self(asset_ref.into())
    }

    /// The raw asset reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dereferenced category attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub title: Option<String>,
}

/// A product offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Price before discount, shown struck through when present.
    pub price_without_discount: Option<Price>,
    /// Short badge text (e.g. "New", "Sale").
    pub badge: Option<String>,
    pub image: Option<ImageRef>,
    pub category: Option<CategoryRef>,
    pub description: Option<String>,
    /// Units in stock.
    pub inventory: u32,
    /// Placement tags such as `featured`, `instagram` or `gallery`.
    pub tags: Vec<String>,
}

impl Product {
    /// Whether the product carries `tag` (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the title contains `query`, ignoring case.
    ///
    /// An empty query matches every product.
    #[must_use]
    pub fn title_matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }

    /// Whether the product is currently priced below its pre-discount price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.price_without_discount
            .is_some_and(|before| before > self.price)
    }

    /// Whether any units are in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.inventory > 0
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub image: Option<ImageRef>,
    /// Number of products the editors attached to this category.
    pub product_count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn chair() -> Product {
        Product {
            id: ProductId::new("p-1"),
            title: "Library Stool Chair".to_string(),
            price: Price::from_cents(2000).unwrap(),
            price_without_discount: Some(Price::from_cents(3000).unwrap()),
            badge: Some("Sale".to_string()),
            image: None,
            category: None,
            description: None,
            inventory: 4,
            tags: vec!["Featured".to_string()],
        }
    }

    #[test]
    fn test_title_matches_ignores_case() {
        let product = chair();
        assert!(product.title_matches("stool"));
        assert!(product.title_matches("LIBRARY"));
        assert!(product.title_matches("  "));
        assert!(!product.title_matches("sofa"));
    }

    #[test]
    fn test_has_tag() {
        let product = chair();
        assert!(product.has_tag("featured"));
        assert!(!product.has_tag("gallery"));
    }

    #[test]
    fn test_is_on_sale() {
        let mut product = chair();
        assert!(product.is_on_sale());

        product.price_without_discount = Some(product.price);
        assert!(!product.is_on_sale());

        product.price_without_discount = None;
        assert!(!product.is_on_sale());
    }
}
