//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded in the span, echoed in the response)
//! 4. Session layer (bounded in-memory tower-sessions store)
//!
//! Handlers that touch the cart, wishlist or checkout take the
//! [`CurrentShopper`] extractor.

pub mod request_id;
pub mod session;
pub mod shopper;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{MAX_SESSIONS, SESSION_COOKIE_NAME, create_session_layer, create_session_store};
pub use shopper::CurrentShopper;
