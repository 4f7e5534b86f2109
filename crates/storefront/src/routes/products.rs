//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use comforty_core::{Product, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{Listing, ProductFilter};
use crate::error::{AppError, Result};
use crate::sanity::ImageUrlBuilder;
use crate::state::AppState;

/// Width of listing and cart thumbnails.
const THUMBNAIL_WIDTH: u32 = 400;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub price_without_discount: Option<String>,
    pub on_sale: bool,
    pub badge: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub inventory: u32,
    pub in_stock: bool,
    pub tags: Vec<String>,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, images: Option<&ImageUrlBuilder>) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: product.price.to_string(),
            price_without_discount: product.price_without_discount.map(|p| p.to_string()),
            on_sale: product.is_on_sale(),
            badge: product.badge.clone(),
            image_url: image_url(product, images),
            category: product.category.as_ref().and_then(|c| c.title.clone()),
            description: product.description.clone(),
            inventory: product.inventory,
            in_stock: product.in_stock(),
            tags: product.tags.clone(),
        }
    }
}

/// Thumbnail URL for `product`, if it has an image and images can be resolved.
pub fn image_url(product: &Product, images: Option<&ImageUrlBuilder>) -> Option<String> {
    let image = product.image.as_ref()?;
    images?.url_for_width(image, THUMBNAIL_WIDTH)
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub products: Vec<ProductView>,
    /// Set when the catalog could not be read and the listing is empty.
    pub catalog_error: Option<String>,
}

impl ProductListView {
    fn new(listing: Listing<Product>, images: Option<&ImageUrlBuilder>) -> Self {
        Self {
            products: listing
                .items
                .iter()
                .map(|p| ProductView::new(p, images))
                .collect(),
            catalog_error: listing.error,
        }
    }
}

/// Product listing with optional title search and tag.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Json<ProductListView> {
    let listing = state.catalog().listing(&filter).await;
    Json(ProductListView::new(listing, state.images()))
}

/// Featured products for the home page.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<ProductListView> {
    let listing = state.catalog().listing(&ProductFilter::featured()).await;
    Json(ProductListView::new(listing, state.images()))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog()
        .product(&ProductId::new(id.as_str()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductView::new(&product, state.images())))
}
