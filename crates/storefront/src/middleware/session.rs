//! Session middleware configuration.
//!
//! Sessions are held in memory: they carry only the shopper id and the
//! applied discount, both of which are meaningless after a restart. The
//! store is a bounded `moka` cache; a record is evicted once its expiry
//! date passes, which the layer pushes forward on every request.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "comforty_session";

/// Most sessions held at once; the least recently used go first.
pub const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store with eviction.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer.
///
/// Sessions expire after the same period of inactivity as shopper contexts.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(session_idle(config)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

fn session_idle(config: &StorefrontConfig) -> Duration {
    Duration::try_from(config.shopper_idle).unwrap_or(Duration::hours(2))
}
