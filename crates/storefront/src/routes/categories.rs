//! Category route handlers.

use axum::{Json, extract::State};
use comforty_core::Category;
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub product_count: u32,
}

#[derive(Debug, Serialize)]
pub struct CategoryListView {
    pub categories: Vec<CategoryView>,
    pub catalog_error: Option<String>,
}

/// Category listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<CategoryListView> {
    let listing = state.catalog().category_listing().await;
    let images = state.images();

    let view = |category: &Category| CategoryView {
        id: category.id.to_string(),
        title: category.title.clone(),
        image_url: category
            .image
            .as_ref()
            .and_then(|image| images.and_then(|b| b.url_for(image))),
        product_count: category.product_count,
    };

    Json(CategoryListView {
        categories: listing.items.iter().map(view).collect(),
        catalog_error: listing.error,
    })
}
