//! HTTP client for the Sanity query and mutate APIs.

use std::sync::Arc;
use std::time::Duration;

use comforty_core::{Category, Product};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::SanityError;
use super::cache::{CacheKey, CacheValue};
use super::conversions::{categories_from_values, products_from_values};
use super::documents::{ErrorResponse, MutateResponse, QueryResponse};
use super::queries;
use crate::config::SanityConfig;

/// Client for the Sanity HTTP API.
///
/// Catalog queries are cached for 5 minutes. Clones share the HTTP
/// connection pool and the cache.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    query_endpoint: Url,
    mutate_endpoint: Url,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl SanityClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the project id or dataset produce an invalid URL.
    pub fn new(config: &SanityConfig) -> Result<Self, SanityError> {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let read_host = if config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        let query_endpoint = Url::parse(&format!(
            "https://{}.{read_host}/v{}/data/query/{}",
            config.project_id, config.api_version, config.dataset
        ))?;
        // Writes never go through the CDN
        let mutate_endpoint = Url::parse(&format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            config.project_id, config.api_version, config.dataset
        ))?;

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                query_endpoint,
                mutate_endpoint,
                token: config.auth_token.clone(),
                cache,
            }),
        })
    }

    /// Build the request URL for a GROQ query.
    ///
    /// Parameters are passed as `$name` query-string entries holding JSON values.
    fn query_url(&self, groq: &str, params: &[(&str, Value)]) -> Url {
        let mut url = self.inner.query_endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", groq);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }
        url
    }

    /// Execute a GROQ query and decode its `result`.
    async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<T, SanityError> {
        let mut request = self.inner.client.get(self.query_url(groq, params));
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let body = read_body(response).await?;

        let response: QueryResponse<T> = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Sanity query response"
            );
        })?;

        Ok(response.result)
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get all valid products.
    ///
    /// Documents that fail ingestion are skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Arc<Vec<Product>>, SanityError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let values: Vec<Value> = self.query(queries::PRODUCTS, &[]).await?;
        let ingested = products_from_values(values);
        debug!(
            accepted = ingested.records.len(),
            rejected = ingested.rejected.len(),
            "Fetched products"
        );

        let products = Arc::new(ingested.records);
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get all valid categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Arc<Vec<Category>>, SanityError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let values: Vec<Value> = self.query(queries::CATEGORIES, &[]).await?;
        let categories = Arc::new(categories_from_values(values).records);
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;

        Ok(categories)
    }

    /// Fetch raw documents of one type, bypassing ingestion and the cache.
    ///
    /// Used by tooling that reports on rejected records.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_raw_documents(&self, doc_type: &str) -> Result<Vec<Value>, SanityError> {
        self.query(
            "*[_type == $type]",
            &[("type", Value::String(doc_type.to_string()))],
        )
        .await
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Create a document and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`SanityError::MissingToken`] when no token is configured, or
    /// an error if the API request fails.
    #[instrument(skip(self, document))]
    pub async fn create_document(&self, document: Value) -> Result<String, SanityError> {
        let token = self.inner.token.as_ref().ok_or(SanityError::MissingToken)?;

        let mut url = self.inner.mutate_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("returnIds", "true")
            .append_pair("visibility", "sync");

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(&json!({ "mutations": [{ "create": document }] }))
            .send()
            .await?;
        let body = read_body(response).await?;
        let response: MutateResponse = serde_json::from_str(&body)?;

        Ok(response
            .results
            .into_iter()
            .next()
            .map_or(response.transaction_id, |result| result.id))
    }
}

/// Read a response body, mapping rate limits and error statuses.
async fn read_body(response: reqwest::Response) -> Result<String, SanityError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(SanityError::RateLimited(retry_after));
    }

    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Sanity API returned non-success status"
        );
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error.description.or(e.error.kind))
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(SanityError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(use_cdn: bool) -> SanityConfig {
        SanityConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2023-10-10".to_string(),
            use_cdn,
            auth_token: None,
        }
    }

    #[test]
    fn test_query_url_uses_cdn_host() {
        let client = SanityClient::new(&config(true)).unwrap();
        let url = client.query_url("*[_type == \"products\"]", &[]);

        assert_eq!(url.host_str(), Some("abc123.apicdn.sanity.io"));
        assert_eq!(url.path(), "/v2023-10-10/data/query/production");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "query");
        assert_eq!(value, "*[_type == \"products\"]");
    }

    #[test]
    fn test_query_url_encodes_params_as_json() {
        let client = SanityClient::new(&config(false)).unwrap();
        let url = client.query_url("*[_id == $id]", &[("id", Value::String("p-1".into()))]);

        assert_eq!(url.host_str(), Some("abc123.api.sanity.io"));
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(params[1], ("$id".to_string(), "\"p-1\"".to_string()));
    }

    #[test]
    fn test_mutate_endpoint_bypasses_cdn() {
        let client = SanityClient::new(&config(true)).unwrap();
        assert_eq!(
            client.inner.mutate_endpoint.as_str(),
            "https://abc123.api.sanity.io/v2023-10-10/data/mutate/production"
        );
    }

    #[tokio::test]
    async fn test_create_document_requires_token() {
        let client = SanityClient::new(&config(false)).unwrap();
        let result = client.create_document(json!({ "_type": "order" })).await;
        assert!(matches!(result, Err(SanityError::MissingToken)));
    }
}
