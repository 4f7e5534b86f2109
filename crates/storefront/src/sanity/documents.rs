//! Raw document shapes returned by the query API.
//!
//! Every field except `_id` is optional here: this is what the content
//! store may hand back, not what the storefront accepts. See
//! [`super::conversions`] for the checks that turn these into catalog
//! records.

use serde::{Deserialize, Serialize};

/// Envelope of a query API response.
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
}

/// Envelope of a mutate API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    pub transaction_id: String,
    #[serde(default)]
    pub results: Vec<MutateResult>,
}

/// Outcome of one mutation.
#[derive(Debug, Deserialize)]
pub struct MutateResult {
    pub id: String,
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Reference to another document or asset (`{ "_ref": "...", "_type": "reference" }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub target: String,
}

/// Image field (`{ "asset": { "_ref": "image-..." } }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(default)]
    pub asset: Option<Reference>,
}

/// Category field on a product.
///
/// Either dereferenced by the query (`_id`, `title`) or left as a plain
/// reference (`_ref`) when documents come from an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryField {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A `products` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_without_discount: Option<f64>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(default)]
    pub category: Option<CategoryField>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// A `categories` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    /// Product count maintained by editors.
    #[serde(default)]
    pub products: Option<i64>,
}
