//! Comforty Storefront library.
//!
//! The storefront's cart, wishlist and checkout model plus the HTTP
//! service around it, built as a library so the router can be driven
//! in-process by tests and the catalog reader reused by the CLI.
//!
//! # Modules
//!
//! - [`sanity`] - Sanity query/mutate client and the catalog ingestion boundary
//! - [`catalog`] - Catalog reader over Sanity or a fixture file
//! - [`store`] - Cart and wishlist stores, cart notice timer
//! - [`checkout`] - Totals, billing form state machine, order sinks
//! - [`shopper`] - Per-session shopper contexts
//! - [`routes`] - JSON HTTP API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sanity;
pub mod shopper;
pub mod state;
pub mod store;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
