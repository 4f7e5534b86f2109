//! Ingestion boundary: raw documents into catalog records.
//!
//! A document is rejected when a required field is missing, a price is
//! negative or not a number, or inventory is negative. Rejection is per
//! record: one bad product never blanks the whole catalog.

use comforty_core::{Category, CategoryId, CategoryRef, ImageRef, Price, Product, ProductId};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::documents::{CategoryDocument, CategoryField, ImageField, ProductDocument};
use super::queries::{CATEGORY_TYPE, PRODUCT_TYPE};

/// Why a document was rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The document does not match the expected JSON shape.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document has an empty `_id`.
    #[error("document has no id")]
    MissingId,

    /// The document is of another type.
    #[error("expected a `{expected}` document, got `{found}`")]
    WrongType {
        expected: &'static str,
        found: String,
    },

    /// A required field is absent or blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field holds a value the storefront cannot accept.
    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

/// A document that failed ingestion.
#[derive(Debug)]
pub struct Rejected {
    /// The document id, when one could be read.
    pub id: Option<String>,
    pub error: RecordError,
}

/// Result of ingesting a batch of documents.
#[derive(Debug)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub rejected: Vec<Rejected>,
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

// =============================================================================
// Single Documents
// =============================================================================

/// Convert a product document into a catalog record.
///
/// # Errors
///
/// Returns a [`RecordError`] describing the first violated rule.
pub fn convert_product(doc: ProductDocument) -> Result<Product, RecordError> {
    check_header(&doc.id, doc.doc_type.as_deref(), PRODUCT_TYPE)?;

    let title = required_text(doc.title, "title")?;
    let price = doc
        .price
        .ok_or(RecordError::MissingField("price"))
        .and_then(|amount| convert_price(amount, "price"))?;
    let price_without_discount = doc
        .price_without_discount
        .map(|amount| convert_price(amount, "priceWithoutDiscount"))
        .transpose()?;
    let inventory = doc
        .inventory
        .ok_or(RecordError::MissingField("inventory"))
        .and_then(|count| convert_count(count, "inventory"))?;

    Ok(Product {
        id: ProductId::new(doc.id),
        title,
        price,
        price_without_discount,
        badge: optional_text(doc.badge),
        image: doc.image.and_then(convert_image),
        category: doc.category.and_then(convert_category_ref),
        description: optional_text(doc.description),
        inventory,
        tags: doc
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| optional_text(Some(tag)))
            .collect(),
    })
}

/// Convert a category document into a catalog record.
///
/// # Errors
///
/// Returns a [`RecordError`] describing the first violated rule.
pub fn convert_category(doc: CategoryDocument) -> Result<Category, RecordError> {
    check_header(&doc.id, doc.doc_type.as_deref(), CATEGORY_TYPE)?;

    Ok(Category {
        id: CategoryId::new(doc.id),
        title: required_text(doc.title, "title")?,
        image: doc.image.and_then(convert_image),
        product_count: doc
            .products
            .map_or(Ok(0), |count| convert_count(count, "products"))?,
    })
}

// =============================================================================
// Batches
// =============================================================================

/// Ingest raw product values, skipping (and logging) rejected ones.
#[must_use]
pub fn products_from_values(values: Vec<Value>) -> Ingested<Product> {
    ingest(values, |value| {
        serde_json::from_value::<ProductDocument>(value)
            .map_err(RecordError::from)
            .and_then(convert_product)
    })
}

/// Ingest raw category values, skipping (and logging) rejected ones.
#[must_use]
pub fn categories_from_values(values: Vec<Value>) -> Ingested<Category> {
    ingest(values, |value| {
        serde_json::from_value::<CategoryDocument>(value)
            .map_err(RecordError::from)
            .and_then(convert_category)
    })
}

/// Split a mixed export (products and categories) by `_type` and ingest both.
///
/// Documents of any other type are ignored.
#[must_use]
pub fn catalog_from_values(values: Vec<Value>) -> (Ingested<Product>, Ingested<Category>) {
    let (products, categories): (Vec<_>, Vec<_>) = values
        .into_iter()
        .filter(|value| {
            matches!(
                document_type(value),
                Some(PRODUCT_TYPE | CATEGORY_TYPE)
            )
        })
        .partition(|value| document_type(value) == Some(PRODUCT_TYPE));

    (
        products_from_values(products),
        categories_from_values(categories),
    )
}

fn ingest<T, F>(values: Vec<Value>, convert: F) -> Ingested<T>
where
    F: Fn(Value) -> Result<T, RecordError>,
{
    let mut ingested = Ingested::default();

    for value in values {
        let id = value
            .get("_id")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        match convert(value) {
            Ok(record) => ingested.records.push(record),
            Err(error) => {
                warn!(
                    document_id = id.as_deref().unwrap_or("<none>"),
                    error = %error,
                    "Rejected catalog document"
                );
                ingested.rejected.push(Rejected { id, error });
            }
        }
    }

    ingested
}

// =============================================================================
// Field Helpers
// =============================================================================

fn document_type(value: &Value) -> Option<&str> {
    value.get("_type").and_then(Value::as_str)
}

fn check_header(id: &str, doc_type: Option<&str>, expected: &'static str) -> Result<(), RecordError> {
    if id.trim().is_empty() {
        return Err(RecordError::MissingId);
    }
    match doc_type {
        Some(found) if found != expected => Err(RecordError::WrongType {
            expected,
            found: found.to_string(),
        }),
        _ => Ok(()),
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    optional_text(value).ok_or(RecordError::MissingField(field))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn convert_price(amount: f64, field: &'static str) -> Result<Price, RecordError> {
    Price::from_f64(amount).map_err(|e| RecordError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

fn convert_count(count: i64, field: &'static str) -> Result<u32, RecordError> {
    u32::try_from(count).map_err(|_| RecordError::InvalidField {
        field,
        reason: format!("expected a non-negative count, got {count}"),
    })
}

fn convert_image(image: ImageField) -> Option<ImageRef> {
    image
        .asset
        .map(|asset| asset.target)
        .filter(|target| !target.is_empty())
        .map(ImageRef::new)
}

fn convert_category_ref(field: CategoryField) -> Option<CategoryRef> {
    let id = field.id.or(field.reference).filter(|id| !id.is_empty())?;
    Some(CategoryRef {
        id: CategoryId::new(id),
        title: optional_text(field.title),
    })
}
