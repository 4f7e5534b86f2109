//! Catalog reader.
//!
//! Products and categories come either from the Sanity query API or from a
//! local JSON export of raw documents (used for development and tests).
//! Both sources go through the same ingestion checks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use comforty_core::{Category, Product, ProductId};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::sanity::conversions::catalog_from_values;
use crate::sanity::{SanityClient, SanityError};

/// Tag marking products shown in the home page's featured section.
pub const FEATURED_TAG: &str = "featured";

/// Errors from reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog fetch failed: {0}")]
    Sanity(#[from] SanityError),

    #[error("failed to read catalog fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog fixture is not a JSON array of documents: {0}")]
    FixtureFormat(#[from] serde_json::Error),
}

/// Where catalog records are read from.
#[derive(Clone)]
pub enum Catalog {
    Sanity(SanityClient),
    Fixture(FixtureCatalog),
}

impl Catalog {
    /// All products that passed ingestion.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store cannot be reached.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        match self {
            Self::Sanity(client) => Ok(client.get_products().await?),
            Self::Fixture(fixture) => Ok(Arc::clone(&fixture.products)),
        }
    }

    /// All categories that passed ingestion.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store cannot be reached.
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, CatalogError> {
        match self {
            Self::Sanity(client) => Ok(client.get_categories().await?),
            Self::Fixture(fixture) => Ok(Arc::clone(&fixture.categories)),
        }
    }

    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store cannot be reached.
    pub async fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    /// Products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store cannot be reached.
    pub async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(filter.apply(&products))
    }

    /// Product listing for display.
    ///
    /// A fetch failure yields an empty listing carrying the error message,
    /// so the page still renders.
    #[instrument(skip(self))]
    pub async fn listing(&self, filter: &ProductFilter) -> Listing<Product> {
        match self.search(filter).await {
            Ok(items) => Listing::ok(items),
            Err(e) => {
                warn!(error = %e, "Product listing unavailable");
                Listing::failed(&e)
            }
        }
    }

    /// Category listing for display, with the same fallback as [`Self::listing`].
    #[instrument(skip(self))]
    pub async fn category_listing(&self) -> Listing<Category> {
        match self.categories().await {
            Ok(items) => Listing::ok(items.as_ref().clone()),
            Err(e) => {
                warn!(error = %e, "Category listing unavailable");
                Listing::failed(&e)
            }
        }
    }
}

/// Filter applied to the product listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive title search.
    #[serde(default)]
    pub search: Option<String>,
    /// Required tag.
    #[serde(default)]
    pub tag: Option<String>,
}

impl ProductFilter {
    /// Filter for the featured section.
    #[must_use]
    pub fn featured() -> Self {
        Self {
            search: None,
            tag: Some(FEATURED_TAG.to_string()),
        }
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let title_ok = self
            .search
            .as_deref()
            .is_none_or(|query| product.title_matches(query));
        let tag_ok = self
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .is_none_or(|tag| product.has_tag(tag));
        title_ok && tag_ok
    }

    /// Matching products, in catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// A listing that may have fallen back to empty.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Message describing why the catalog could not be read.
    pub error: Option<String>,
}

impl<T> Listing<T> {
    const fn ok(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    fn failed(error: &CatalogError) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

// =============================================================================
// Fixture Catalog
// =============================================================================

/// In-memory catalog built from raw documents.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    products: Arc<Vec<Product>>,
    categories: Arc<Vec<Category>>,
}

impl FixtureCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    /// Build a catalog from raw documents, skipping rejected ones.
    #[must_use]
    pub fn from_documents(documents: Vec<Value>) -> Self {
        let (products, categories) = catalog_from_values(documents);
        Self::new(products.records, categories.records)
    }

    /// Load a JSON array of raw documents from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        Ok(Self::from_documents(Self::read_documents(path).await?))
    }

    /// Read the raw documents of a fixture file without ingesting them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub async fn read_documents(path: &Path) -> Result<Vec<Value>, CatalogError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Fixture {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }
}
