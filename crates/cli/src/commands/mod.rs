//! CLI commands and the catalog source they share.

pub mod catalog;
pub mod quote;

use std::path::PathBuf;

use comforty_storefront::catalog::{Catalog, CatalogError, FixtureCatalog};
use comforty_storefront::config::{ConfigError, SanityConfig};
use comforty_storefront::sanity::{SanityClient, SanityError};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("sanity error: {0}")]
    Sanity(#[from] SanityError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("invalid line item '{0}': expected <product-id>[:<quantity>]")]
    InvalidLine(String),

    #[error("invalid discount '{0}': {1}")]
    InvalidDiscount(String, String),

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("{0} catalog document(s) rejected")]
    Rejected(usize),
}

/// Where the CLI reads catalog documents from.
pub enum CatalogSource {
    Fixture(PathBuf),
    Sanity(SanityClient),
}

impl CatalogSource {
    /// Use `fixture` when given, otherwise Sanity settings from the environment.
    pub fn resolve(fixture: Option<PathBuf>) -> Result<Self, CliError> {
        match fixture {
            Some(path) => Ok(Self::Fixture(path)),
            None => {
                let config = SanityConfig::from_env()?;
                Ok(Self::Sanity(SanityClient::new(&config)?))
            }
        }
    }

    /// The ingested catalog.
    pub async fn catalog(&self) -> Result<Catalog, CliError> {
        Ok(match self {
            Self::Fixture(path) => Catalog::Fixture(FixtureCatalog::load(path).await?),
            Self::Sanity(client) => Catalog::Sanity(client.clone()),
        })
    }

    /// Raw product and category documents, before ingestion.
    pub async fn raw_documents(&self) -> Result<Vec<Value>, CliError> {
        use comforty_storefront::sanity::queries::{CATEGORY_TYPE, PRODUCT_TYPE};

        match self {
            Self::Fixture(path) => Ok(FixtureCatalog::read_documents(path).await?),
            Self::Sanity(client) => {
                let mut documents = client.get_raw_documents(PRODUCT_TYPE).await?;
                documents.extend(client.get_raw_documents(CATEGORY_TYPE).await?);
                Ok(documents)
            }
        }
    }
}
