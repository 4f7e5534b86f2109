//! Checkout route handlers.
//!
//! `POST /checkout` answers 200 with the receipt when the order is placed
//! and 422 with the per-field error flags when the form is incomplete.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use comforty_core::Price;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use crate::checkout::{
    BillingField, BillingForm, FieldErrors, FormPhase, SubmitOutcome, discount, submit_order,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentShopper;
use crate::routes::cart::TotalsView;
use crate::shopper::ShopperState;
use crate::state::AppState;

/// Checkout page data.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub values: BillingForm,
    pub errors: FieldErrors,
    pub phase: FormPhase,
    pub item_count: u32,
    pub totals: TotalsView,
}

impl CheckoutView {
    fn new(shopper: &ShopperState, discount: Price) -> Self {
        Self {
            values: shopper.checkout.values().clone(),
            errors: shopper.checkout.errors(),
            phase: shopper.checkout.phase(),
            item_count: shopper.cart.item_count(),
            totals: shopper.cart.totals(discount).into(),
        }
    }
}

/// Single-field edit.
#[derive(Debug, Deserialize)]
pub struct FieldForm {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Display the checkout form and totals.
#[instrument(skip_all)]
pub async fn show(current: CurrentShopper) -> Result<Json<CheckoutView>> {
    let discount = discount::applied_discount(&current.session).await?;
    let shopper = current.shopper.lock().await;
    Ok(Json(CheckoutView::new(&shopper, discount)))
}

/// Change one billing field.
#[instrument(skip(current))]
pub async fn update_field(
    current: CurrentShopper,
    Form(form): Form<FieldForm>,
) -> Result<Json<CheckoutView>> {
    let field = form
        .field
        .parse::<BillingField>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let discount = discount::applied_discount(&current.session).await?;

    let mut shopper = current.shopper.lock().await;
    shopper.checkout.set_field(field, form.value);

    Ok(Json(CheckoutView::new(&shopper, discount)))
}

/// Submit the billing form and place the order.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    current: CurrentShopper,
    Form(billing): Form<BillingForm>,
) -> Result<Response> {
    let mut shopper = current.shopper.lock().await;
    let ShopperState { cart, checkout, .. } = &mut *shopper;

    for field in BillingField::ALL {
        checkout.set_field(field, billing.get(field));
    }

    let outcome = submit_order(checkout, cart, &current.session, state.orders()).await?;

    let response = match outcome {
        SubmitOutcome::Accepted(receipt) => {
            info!(order_id = %receipt.order_id, total = %receipt.total, "Order placed");
            add_breadcrumb("checkout", "Order placed", &[("order_id", receipt.order_id.as_str())]);
            (
                StatusCode::OK,
                Json(json!({
                    "status": "accepted",
                    "order_id": receipt.order_id,
                    "order_status": receipt.status,
                    "total": receipt.total.to_string(),
                    "placed_at": receipt.placed_at,
                })),
            )
                .into_response()
        }
        SubmitOutcome::Rejected(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": "rejected",
                "errors": errors,
            })),
        )
            .into_response(),
    };

    Ok(response)
}
