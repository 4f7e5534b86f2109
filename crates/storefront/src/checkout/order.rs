//! Order payloads and the sinks that receive them.

use std::future::Future;

use chrono::{DateTime, Utc};
use comforty_core::{OrderId, OrderStatus, Price, ProductId};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use super::form::BillingForm;
use super::totals::CheckoutTotals;
use crate::sanity::queries::ORDER_TYPE;
use crate::sanity::{SanityClient, SanityError};
use crate::store::CartItem;

/// Errors from submitting an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The session store could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The content store refused or failed to record the order.
    #[error("order store error: {0}")]
    Store(#[from] SanityError),
}

/// One cart line frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            title: item.product.title.clone(),
            unit_price: item.product.price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Everything an order sink needs to record an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPayload {
    pub id: OrderId,
    pub billing: BillingForm,
    pub lines: Vec<OrderLine>,
    pub totals: CheckoutTotals,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

impl OrderPayload {
    /// Snapshot `items` with a fresh order id and `pending` status.
    #[must_use]
    pub fn new(billing: BillingForm, items: &[CartItem], totals: CheckoutTotals) -> Self {
        Self {
            id: OrderId::new(format!("order-{}", Uuid::new_v4())),
            billing,
            lines: items.iter().map(OrderLine::from).collect(),
            totals,
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        }
    }
}

/// Confirmation returned by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl OrderReceipt {
    fn for_payload(order: &OrderPayload, order_id: OrderId) -> Self {
        Self {
            order_id,
            status: order.status,
            total: order.totals.total,
            placed_at: order.placed_at,
        }
    }
}

/// Destination for placed orders.
pub trait OrderSink {
    /// Record `order`.
    fn submit(
        &self,
        order: &OrderPayload,
    ) -> impl Future<Output = Result<OrderReceipt, OrderError>> + Send;
}

/// Sink that logs the order and accepts it without contacting anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedOrderSink;

impl OrderSink for SimulatedOrderSink {
    async fn submit(&self, order: &OrderPayload) -> Result<OrderReceipt, OrderError> {
        info!(
            order_id = %order.id,
            lines = order.lines.len(),
            total = %order.totals.total,
            "Simulated order placed"
        );
        Ok(OrderReceipt::for_payload(order, order.id.clone()))
    }
}

/// Sink that creates an `order` document in Sanity.
#[derive(Clone)]
pub struct SanityOrderSink {
    client: SanityClient,
}

impl SanityOrderSink {
    #[must_use]
    pub const fn new(client: SanityClient) -> Self {
        Self { client }
    }
}

impl OrderSink for SanityOrderSink {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn submit(&self, order: &OrderPayload) -> Result<OrderReceipt, OrderError> {
        let id = self.client.create_document(order_document(order)).await?;
        info!(document_id = %id, "Order document created");
        Ok(OrderReceipt::for_payload(order, OrderId::new(id)))
    }
}

/// The `order` document for `order`.
///
/// Cart lines are stored as product references; amounts as JSON numbers.
#[must_use]
pub fn order_document(order: &OrderPayload) -> Value {
    let billing = &order.billing;
    let cart_items: Vec<Value> = order
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            json!({
                "_type": "reference",
                "_key": format!("line-{index}"),
                "_ref": line.product_id.as_str(),
            })
        })
        .collect();

    json!({
        "_id": order.id.as_str(),
        "_type": ORDER_TYPE,
        "firstName": billing.first_name.trim(),
        "lastName": billing.last_name.trim(),
        "address": billing.address.trim(),
        "city": billing.city.trim(),
        "zipCode": billing.zip_code.trim(),
        "phone": billing.phone.trim(),
        "email": billing.email.trim(),
        "cartItem": cart_items,
        "discount": number(order.totals.discount),
        "total": number(order.totals.total),
        "status": order.status.as_str(),
    })
}

fn number(price: Price) -> Value {
    price
        .amount()
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// The sink selected by configuration.
#[derive(Clone)]
pub enum OrderBackend {
    Simulated(SimulatedOrderSink),
    Sanity(SanityOrderSink),
}

impl OrderSink for OrderBackend {
    async fn submit(&self, order: &OrderPayload) -> Result<OrderReceipt, OrderError> {
        match self {
            Self::Simulated(sink) => sink.submit(order).await,
            Self::Sanity(sink) => sink.submit(order).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::form::tests::filled_form;
    use crate::store::{CartStore, sample_product};

    fn payload() -> OrderPayload {
        let mut cart = CartStore::new();
        cart.add_item(sample_product("chair-1", 2000), 2);
        cart.add_item(sample_product("sofa-7", 12550), 1);
        let totals = cart.totals(Price::from_cents(550).unwrap());
        OrderPayload::new(filled_form().values().clone(), cart.items(), totals)
    }

    #[test]
    fn test_payload_snapshots_lines() {
        let order = payload();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.id.as_str().starts_with("order-"));
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].line_total, Price::from_cents(4000).unwrap());
        assert_eq!(order.totals.total, Price::from_cents(16000).unwrap());
    }

    #[test]
    fn test_order_document() {
        let order = payload();
        let doc = order_document(&order);

        assert_eq!(doc["_type"], "order");
        assert_eq!(doc["zipCode"], "01234");
        assert_eq!(doc["status"], "pending");
        assert_eq!(doc["discount"], 5.5);
        assert_eq!(doc["total"], 160.0);
        assert_eq!(doc["cartItem"][1]["_ref"], "sofa-7");
        assert_eq!(doc["cartItem"][1]["_key"], "line-1");
        assert!(doc.get("cartItems").is_none());
    }

    #[tokio::test]
    async fn test_simulated_sink_accepts() {
        let order = payload();
        let receipt = SimulatedOrderSink.submit(&order).await.unwrap();

        assert_eq!(receipt.order_id, order.id);
        assert_eq!(receipt.total, order.totals.total);
    }
}
