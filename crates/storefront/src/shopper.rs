//! Shopper contexts.
//!
//! Each browsing session owns one [`Shopper`]: its cart, wishlist, billing
//! form and cart notice. The session only stores the shopper id; the
//! context itself lives in [`ShopperRegistry`] and expires after a period
//! of inactivity.
//!
//! Handlers lock the shopper for the whole of their work, so one
//! shopper's requests are applied one at a time.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, MutexGuard};
use tower_sessions::Session;
use tracing::debug;
use uuid::Uuid;

use crate::checkout::CheckoutForm;
use crate::models::session_keys::SHOPPER_ID;
use crate::store::{CartStore, NoticeTimer, WishlistStore};

/// Mutable state of one shopper.
#[derive(Debug)]
pub struct ShopperState {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub checkout: CheckoutForm,
    pub notice: NoticeTimer,
}

impl ShopperState {
    #[must_use]
    pub fn new(notice_duration: Duration) -> Self {
        Self {
            cart: CartStore::new(),
            wishlist: WishlistStore::new(),
            checkout: CheckoutForm::new(),
            notice: NoticeTimer::new(notice_duration),
        }
    }
}

/// One shopper's context.
#[derive(Debug)]
pub struct Shopper {
    id: Uuid,
    state: Mutex<ShopperState>,
}

impl Shopper {
    #[must_use]
    pub fn new(id: Uuid, notice_duration: Duration) -> Self {
        Self {
            id,
            state: Mutex::new(ShopperState::new(notice_duration)),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for exclusive access to the shopper's state.
    pub async fn lock(&self) -> MutexGuard<'_, ShopperState> {
        self.state.lock().await
    }
}

/// In-process registry of shopper contexts.
#[derive(Clone)]
pub struct ShopperRegistry {
    shoppers: Cache<Uuid, Arc<Shopper>>,
    notice_duration: Duration,
}

impl ShopperRegistry {
    /// Create a registry that drops shoppers idle for longer than `idle`.
    #[must_use]
    pub fn new(idle: Duration, notice_duration: Duration) -> Self {
        Self {
            shoppers: Cache::builder().time_to_idle(idle).build(),
            notice_duration,
        }
    }

    /// The shopper for `id`, created if unknown or expired.
    pub async fn get_or_create(&self, id: Uuid) -> Arc<Shopper> {
        let notice_duration = self.notice_duration;
        self.shoppers
            .get_with(id, async move {
                debug!(shopper_id = %id, "Creating shopper context");
                Arc::new(Shopper::new(id, notice_duration))
            })
            .await
    }

    /// The shopper bound to `session`, assigning a new id on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn for_session(
        &self,
        session: &Session,
    ) -> Result<Arc<Shopper>, tower_sessions::session::Error> {
        let id = if let Some(id) = session.get::<Uuid>(SHOPPER_ID).await? {
            id
        } else {
            let id = Uuid::new_v4();
            session.insert(SHOPPER_ID, id).await?;
            id
        };
        Ok(self.get_or_create(id).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::discount::tests::session;
    use crate::store::sample_product;

    fn registry() -> ShopperRegistry {
        ShopperRegistry::new(Duration::from_secs(60), Duration::from_secs(3))
    }

    #[tokio::test]
    async fn test_same_session_same_shopper() {
        let registry = registry();
        let session = session();

        let first = registry.for_session(&session).await.unwrap();
        first.lock().await.cart.add_item(sample_product("a", 100), 1);
        let second = registry.for_session(&session).await.unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(second.lock().await.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry();

        let first = registry.for_session(&session()).await.unwrap();
        first.lock().await.cart.add_item(sample_product("a", 100), 1);
        let second = registry.for_session(&session()).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert!(second.lock().await.cart.is_empty());
    }
}
