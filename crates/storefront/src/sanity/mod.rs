//! Sanity Content Lake client.
//!
//! # Architecture
//!
//! - GROQ queries over the HTTP query API, `reqwest` for transport
//! - Sanity is the source of truth for the catalog - NO local sync
//! - In-memory caching via `moka` for query results (5 minute TTL)
//! - Raw documents are validated into `comforty_core` records at the
//!   ingestion boundary ([`conversions`]); malformed records never reach
//!   the cart or checkout
//!
//! # Example
//!
//! ```rust,ignore
//! use comforty_storefront::sanity::SanityClient;
//!
//! let client = SanityClient::new(&sanity_config)?;
//!
//! let products = client.get_products().await?;
//! let order_id = client.create_document(order_document).await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod documents;
pub mod image;
pub mod queries;

pub use client::SanityClient;
pub use conversions::RecordError;
pub use image::ImageUrlBuilder;

use thiserror::Error;

/// Errors that can occur when talking to the Sanity HTTP API.
#[derive(Debug, Error)]
pub enum SanityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the configuration.
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// Rate limited by Sanity.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A write was attempted without an API token.
    #[error("Sanity API token required for writes")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanity_error_display() {
        let err = SanityError::Api {
            status: 403,
            message: "Insufficient permissions".to_string(),
        };
        assert_eq!(err.to_string(), "API error (403): Insufficient permissions");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = SanityError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
