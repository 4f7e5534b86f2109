//! Shopper context extractor.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::shopper::Shopper;
use crate::state::AppState;

/// Extractor that resolves the shopper bound to the request's session.
///
/// A shopper is created on first use, so this never rejects a request
/// that went through the session layer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentShopper { shopper, .. }: CurrentShopper) -> String {
///     shopper.lock().await.cart.item_count().to_string()
/// }
/// ```
pub struct CurrentShopper {
    pub shopper: Arc<Shopper>,
    pub session: Session,
}

impl FromRequestParts<AppState> for CurrentShopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let shopper = state.shoppers().for_session(&session).await?;

        sentry::configure_scope(|scope| {
            scope.set_tag("shopper_id", shopper.id());
        });

        Ok(Self { shopper, session })
    }
}
