//! Session-scoped discount.
//!
//! The discount is an absolute amount kept in the session under
//! [`APPLIED_DISCOUNT`]. It lives as long as the session and is removed
//! only when an order is placed.

use comforty_core::Price;
use tower_sessions::Session;
use tower_sessions::session::Error;

use crate::models::session_keys::APPLIED_DISCOUNT;

/// The discount stored in the session, or zero.
///
/// # Errors
///
/// Returns an error if the session store fails or holds an invalid amount.
pub async fn applied_discount(session: &Session) -> Result<Price, Error> {
    Ok(session
        .get::<Price>(APPLIED_DISCOUNT)
        .await?
        .unwrap_or(Price::ZERO))
}

/// Store `discount` in the session. A zero amount removes the key.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_discount(session: &Session, discount: Price) -> Result<(), Error> {
    if discount.is_zero() {
        return clear_discount(session).await;
    }
    session.insert(APPLIED_DISCOUNT, discount).await
}

/// Remove the discount from the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_discount(session: &Session) -> Result<(), Error> {
    session.remove_value(APPLIED_DISCOUNT).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::middleware::create_session_store;

    pub(crate) fn session() -> Session {
        Session::new(None, Arc::new(create_session_store()), None)
    }

    #[tokio::test]
    async fn test_missing_discount_is_zero() {
        assert_eq!(applied_discount(&session()).await.unwrap(), Price::ZERO);
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let session = session();
        let amount = Price::from_cents(1500).unwrap();

        set_discount(&session, amount).await.unwrap();
        assert_eq!(applied_discount(&session).await.unwrap(), amount);

        clear_discount(&session).await.unwrap();
        assert!(session.get::<Price>(APPLIED_DISCOUNT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_removes_key() {
        let session = session();
        set_discount(&session, Price::from_cents(100).unwrap()).await.unwrap();
        set_discount(&session, Price::ZERO).await.unwrap();

        assert!(session.get::<Price>(APPLIED_DISCOUNT).await.unwrap().is_none());
    }
}
