//! HTTP route handlers for the storefront.
//!
//! Responses are JSON; request bodies are form-encoded.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Catalog
//! GET  /products               - Product listing (?search=, ?tag=)
//! GET  /products/featured      - Products tagged "featured"
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Category listing
//!
//! # Cart
//! GET  /cart                   - Cart lines, count and totals
//! POST /cart/add               - Add to cart, shows the notice
//! POST /cart/update            - Set quantity (<= 0 removes)
//! POST /cart/remove            - Remove line
//! GET  /cart/count             - Cart badge count
//! GET  /cart/notice            - "Added to cart" notice
//! POST /cart/discount          - Session-scoped discount
//!
//! # Wishlist
//! GET  /wishlist               - Saved products
//! POST /wishlist/add           - Save product
//! POST /wishlist/remove        - Remove saved product
//! POST /wishlist/move-to-cart  - Move saved product to the cart
//! GET  /wishlist/count         - Wishlist badge count
//!
//! # Checkout
//! GET  /checkout               - Form values, error flags, phase and totals
//! POST /checkout/field         - Edit one field
//! POST /checkout               - Submit (200 accepted, 422 rejected)
//! ```

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/notice", get(cart::notice))
        .route("/discount", post(cart::apply_discount))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/move-to-cart", post(wishlist::move_to_cart))
        .route("/count", get(wishlist::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/checkout/field", post(checkout::update_field))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}
