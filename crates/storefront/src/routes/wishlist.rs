//! Wishlist route handlers.

use axum::{Form, Json, extract::State};
use comforty_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::CurrentShopper;
use crate::routes::products::ProductView;
use crate::shopper::ShopperState;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<ProductView>,
    pub count: usize,
    /// Cart badge count, which changes when an item is moved to the cart.
    pub cart_count: u32,
}

impl WishlistView {
    fn new(state: &AppState, shopper: &ShopperState) -> Self {
        Self {
            items: shopper
                .wishlist
                .items()
                .iter()
                .map(|p| ProductView::new(p, state.images()))
                .collect(),
            count: shopper.wishlist.count(),
            cart_count: shopper.cart.item_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishlistCountView {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
}

/// Display the wishlist.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, current: CurrentShopper) -> Json<WishlistView> {
    let shopper = current.shopper.lock().await;
    Json(WishlistView::new(&state, &shopper))
}

/// Save a product.
#[instrument(skip(state, current))]
pub async fn add(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<WishlistForm>,
) -> Result<Json<WishlistView>> {
    let product_id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .product(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut shopper = current.shopper.lock().await;
    shopper.wishlist.add_item(product);

    Ok(Json(WishlistView::new(&state, &shopper)))
}

/// Remove a saved product.
#[instrument(skip(state, current))]
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<WishlistForm>,
) -> Json<WishlistView> {
    let mut shopper = current.shopper.lock().await;
    shopper.wishlist.remove_item(&ProductId::new(form.product_id));

    Json(WishlistView::new(&state, &shopper))
}

/// Move a saved product into the cart with quantity 1.
#[instrument(skip(state, current))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<WishlistForm>,
) -> Result<Json<WishlistView>> {
    let product_id = ProductId::new(form.product_id);

    let mut shopper = current.shopper.lock().await;
    let ShopperState {
        cart,
        wishlist,
        notice,
        ..
    } = &mut *shopper;
    let product = wishlist
        .move_to_cart(&product_id, cart)
        .ok_or_else(|| AppError::NotFound(format!("wishlist item {product_id}")))?;
    notice.show(format!("{} has been added to the cart!", product.title));

    Ok(Json(WishlistView::new(&state, &shopper)))
}

/// Wishlist badge count.
#[instrument(skip_all)]
pub async fn count(current: CurrentShopper) -> Json<WishlistCountView> {
    let count = current.shopper.lock().await.wishlist.count();
    Json(WishlistCountView { count })
}
