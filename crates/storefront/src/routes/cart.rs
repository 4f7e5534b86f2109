//! Cart route handlers.
//!
//! The cart lives in the shopper context; the discount lives in the
//! session. Every mutation answers with the updated cart so the client can
//! refresh its badge and totals from one response.

use std::str::FromStr;

use axum::{Form, Json, extract::State};
use comforty_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::checkout::{CheckoutTotals, discount};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentShopper;
use crate::routes::products::image_url;
use crate::sanity::ImageUrlBuilder;
use crate::shopper::ShopperState;
use crate::state::AppState;
use crate::store::CartItem;

// =============================================================================
// Views
// =============================================================================

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl CartLineView {
    fn new(item: &CartItem, images: Option<&ImageUrlBuilder>) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            title: item.product.title.clone(),
            image_url: image_url(&item.product, images),
            unit_price: item.product.price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Formatted checkout totals.
#[derive(Debug, Serialize)]
pub struct TotalsView {
    pub subtotal: String,
    pub discount: String,
    pub total: String,
}

impl From<CheckoutTotals> for TotalsView {
    fn from(totals: CheckoutTotals) -> Self {
        Self {
            subtotal: totals.subtotal.to_string(),
            discount: totals.discount.to_string(),
            total: totals.total.to_string(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u32,
    #[serde(flatten)]
    pub totals: TotalsView,
    /// The "added to cart" notice, while it is shown.
    pub notice: Option<String>,
}

impl CartView {
    fn new(shopper: &ShopperState, discount: Price, images: Option<&ImageUrlBuilder>) -> Self {
        Self {
            items: shopper
                .cart
                .items()
                .iter()
                .map(|item| CartLineView::new(item, images))
                .collect(),
            item_count: shopper.cart.item_count(),
            totals: shopper.cart.totals(discount).into(),
            notice: shopper.notice.current(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountView {
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct NoticeView {
    pub notice: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
///
/// Zero or a negative quantity removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Discount form data.
#[derive(Debug, Deserialize)]
pub struct DiscountForm {
    pub amount: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, current: CurrentShopper) -> Result<Json<CartView>> {
    let discount = discount::applied_discount(&current.session).await?;
    let shopper = current.shopper.lock().await;
    Ok(Json(CartView::new(&shopper, discount, state.images())))
}

/// Add a product to the cart and show the notice.
#[instrument(skip(state, current))]
pub async fn add(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product_id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .product(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    let quantity = form.quantity.unwrap_or(1);

    add_breadcrumb("cart", "Added to cart", &[("product_id", product_id.as_str())]);

    let discount = discount::applied_discount(&current.session).await?;
    let mut shopper = current.shopper.lock().await;
    if quantity > 0 {
        shopper
            .notice
            .show(format!("{} has been added to the cart!", product.title));
    }
    shopper.cart.add_item(product, quantity);

    Ok(Json(CartView::new(&shopper, discount, state.images())))
}

/// Set a line's quantity.
#[instrument(skip(state, current))]
pub async fn update(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let quantity = u32::try_from(form.quantity.max(0)).unwrap_or(u32::MAX);
    let discount = discount::applied_discount(&current.session).await?;

    let mut shopper = current.shopper.lock().await;
    shopper
        .cart
        .update_quantity(&ProductId::new(form.product_id), quantity);

    Ok(Json(CartView::new(&shopper, discount, state.images())))
}

/// Remove a line.
#[instrument(skip(state, current))]
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let discount = discount::applied_discount(&current.session).await?;

    let mut shopper = current.shopper.lock().await;
    shopper.cart.remove_item(&ProductId::new(form.product_id));

    Ok(Json(CartView::new(&shopper, discount, state.images())))
}

/// Cart badge count.
#[instrument(skip_all)]
pub async fn count(current: CurrentShopper) -> Json<CountView> {
    let count = current.shopper.lock().await.cart.item_count();
    Json(CountView { count })
}

/// The "added to cart" notice, if still shown.
#[instrument(skip_all)]
pub async fn notice(current: CurrentShopper) -> Json<NoticeView> {
    let notice = current.shopper.lock().await.notice.current();
    Json(NoticeView { notice })
}

/// Apply a discount amount for the rest of the session.
#[instrument(skip(state, current))]
pub async fn apply_discount(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(form): Form<DiscountForm>,
) -> Result<Json<CartView>> {
    let amount = Decimal::from_str(form.amount.trim())
        .map_err(|_| AppError::BadRequest(format!("invalid discount amount: {}", form.amount)))?;
    let discount = Price::new(amount.round_dp(2)).map_err(|e| AppError::BadRequest(e.to_string()))?;

    discount::set_discount(&current.session, discount).await?;

    let shopper = current.shopper.lock().await;
    Ok(Json(CartView::new(&shopper, discount, state.images())))
}
