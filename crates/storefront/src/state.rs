//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, FixtureCatalog};
use crate::checkout::{OrderBackend, SanityOrderSink, SimulatedOrderSink};
use crate::config::{CatalogSource, OrderSinkKind, StorefrontConfig};
use crate::sanity::{ImageUrlBuilder, SanityClient, SanityError};
use crate::shopper::ShopperRegistry;

/// Error building application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("sanity client: {0}")]
    Sanity(#[from] SanityError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0} requires Sanity settings")]
    MissingSanity(&'static str),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: OrderBackend,
    shoppers: ShopperRegistry,
    images: Option<ImageUrlBuilder>,
}

impl AppState {
    /// Build state from configuration, loading the fixture catalog if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the Sanity client cannot be built, the fixture
    /// cannot be read, or a Sanity-backed component has no Sanity settings.
    pub async fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let client = config.sanity.as_ref().map(SanityClient::new).transpose()?;

        let catalog = match &config.catalog {
            CatalogSource::Fixture(path) => Catalog::Fixture(FixtureCatalog::load(path).await?),
            CatalogSource::Sanity => Catalog::Sanity(
                client
                    .clone()
                    .ok_or(StateError::MissingSanity("the Sanity catalog"))?,
            ),
        };

        let orders = match config.order_sink {
            OrderSinkKind::Simulated => OrderBackend::Simulated(SimulatedOrderSink),
            OrderSinkKind::Sanity => OrderBackend::Sanity(SanityOrderSink::new(
                client.ok_or(StateError::MissingSanity("ORDER_SINK=sanity"))?,
            )),
        };

        Ok(Self::from_parts(config, catalog, orders))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(config: StorefrontConfig, catalog: Catalog, orders: OrderBackend) -> Self {
        let shoppers = ShopperRegistry::new(config.shopper_idle, config.cart_notice);
        let images = config.sanity.as_ref().map(ImageUrlBuilder::from_config);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                shoppers,
                images,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The configured order sink.
    #[must_use]
    pub fn orders(&self) -> &OrderBackend {
        &self.inner.orders
    }

    #[must_use]
    pub fn shoppers(&self) -> &ShopperRegistry {
        &self.inner.shoppers
    }

    /// Image URL builder, when Sanity settings are present.
    #[must_use]
    pub fn images(&self) -> Option<&ImageUrlBuilder> {
        self.inner.images.as_ref()
    }
}
