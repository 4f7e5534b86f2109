//! Checkout: totals, billing form, discount and order submission.
//!
//! [`submit_order`] drives the billing form through validation and hands
//! the order to an [`OrderSink`]. Only a successful submission clears the
//! cart and the session discount.

pub mod discount;
pub mod form;
pub mod order;
mod totals;

use tower_sessions::Session;
use tracing::{instrument, warn};

pub use form::{BillingField, BillingForm, CheckoutForm, FieldErrors, FormPhase};
pub use order::{
    OrderBackend, OrderError, OrderLine, OrderPayload, OrderReceipt, OrderSink, SanityOrderSink,
    SimulatedOrderSink,
};
pub use totals::{CheckoutTotals, calculate};

use crate::store::CartStore;

/// Result of a submission that reached a terminal form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The sink accepted the order.
    Accepted(OrderReceipt),
    /// One or more fields are empty; nothing was sent.
    Rejected(FieldErrors),
}

/// Validate the form and place the order.
///
/// On acceptance the cart is emptied, the discount is removed from the
/// session and the form values are discarded.
///
/// # Errors
///
/// Returns [`OrderError::EmptyCart`] for a valid form with nothing in the
/// cart, or the sink's error. In both cases the cart and discount are left
/// as they were and the form returns to editing.
#[instrument(skip_all)]
pub async fn submit_order<S: OrderSink + Sync>(
    form: &mut CheckoutForm,
    cart: &mut CartStore,
    session: &Session,
    sink: &S,
) -> Result<SubmitOutcome, OrderError> {
    let billing = match form.validate() {
        Ok(billing) => billing,
        Err(errors) => return Ok(SubmitOutcome::Rejected(errors)),
    };

    if cart.is_empty() {
        form.resume_editing();
        return Err(OrderError::EmptyCart);
    }

    let discount = match discount::applied_discount(session).await {
        Ok(discount) => discount,
        Err(e) => {
            form.resume_editing();
            return Err(e.into());
        }
    };

    let order = OrderPayload::new(billing, cart.items(), cart.totals(discount));
    let receipt = match sink.submit(&order).await {
        Ok(receipt) => receipt,
        Err(e) => {
            form.resume_editing();
            return Err(e);
        }
    };

    cart.clear();
    form.accept();
    if let Err(e) = discount::clear_discount(session).await {
        warn!(error = %e, order_id = %receipt.order_id, "Failed to clear discount after order");
    }

    Ok(SubmitOutcome::Accepted(receipt))
}
