//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SANITY_PROJECT_ID` - Sanity project id (optional when `CATALOG_FIXTURE` is set)
//! - `SANITY_DATASET` - Sanity dataset name (optional when `CATALOG_FIXTURE` is set)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SANITY_API_VERSION` - Content API version date (default: 2023-10-10)
//! - `SANITY_USE_CDN` - Read through the API CDN (default: true)
//! - `SANITY_AUTH_TOKEN` - API token, required when `ORDER_SINK=sanity`
//! - `CATALOG_FIXTURE` - Path to a JSON file of raw catalog documents, used instead of Sanity
//! - `ORDER_SINK` - `simulated` or `sanity` (default: simulated)
//! - `CART_NOTICE_SECONDS` - How long the "added to cart" notice stays up (default: 3)
//! - `SHOPPER_IDLE_MINUTES` - Idle time before a shopper's cart is dropped (default: 120)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Sanity project settings, absent when running from a fixture only
    pub sanity: Option<SanityConfig>,
    /// Where product and category records come from
    pub catalog: CatalogSource,
    /// Where accepted orders are sent
    pub order_sink: OrderSinkKind,
    /// Lifetime of the "added to cart" notice
    pub cart_notice: Duration,
    /// Idle time after which a shopper context is evicted
    pub shopper_idle: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Sanity Content Lake configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project id (subdomain of `api.sanity.io`)
    pub project_id: String,
    /// Dataset name (e.g. `production`)
    pub dataset: String,
    /// API version date, without the leading `v`
    pub api_version: String,
    /// Read queries through `apicdn.sanity.io`
    pub use_cdn: bool,
    /// API token (needed for writes and private datasets)
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Source of catalog records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Query the Sanity HTTP API.
    Sanity,
    /// Load raw documents from a JSON file.
    Fixture(PathBuf),
}

/// Destination of accepted orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSinkKind {
    /// Log and accept without persisting.
    Simulated,
    /// Create an `order` document in Sanity.
    Sanity,
}

impl std::str::FromStr for OrderSinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "sanity" => Ok(Self::Sanity),
            other => Err(format!("expected 'simulated' or 'sanity', got '{other}'")),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the Sanity token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed_or("STOREFRONT_HOST", "127.0.0.1".parse::<IpAddr>().ok())?;
        let port = env.parsed_or("STOREFRONT_PORT", Some(3000_u16))?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;

        let catalog = env
            .optional("CATALOG_FIXTURE")
            .map_or(CatalogSource::Sanity, |path| {
                CatalogSource::Fixture(PathBuf::from(path))
            });

        let sanity = match (env.optional("SANITY_PROJECT_ID"), &catalog) {
            (Some(project_id), _) => Some(SanityConfig::from_vars(&env, project_id)?),
            (None, CatalogSource::Fixture(_)) => None,
            (None, CatalogSource::Sanity) => {
                return Err(ConfigError::MissingEnvVar("SANITY_PROJECT_ID".to_string()));
            }
        };

        let order_sink = env.parsed_or("ORDER_SINK", Some(OrderSinkKind::Simulated))?;
        if order_sink == OrderSinkKind::Sanity
            && sanity.as_ref().is_none_or(|s| s.auth_token.is_none())
        {
            return Err(ConfigError::MissingEnvVar("SANITY_AUTH_TOKEN".to_string()));
        }

        let cart_notice = Duration::from_secs(env.parsed_or("CART_NOTICE_SECONDS", Some(3_u64))?);
        let shopper_idle = idle_from_minutes(env.parsed_or("SHOPPER_IDLE_MINUTES", Some(120_u64))?)?;

        Ok(Self {
            host,
            port,
            base_url,
            sanity,
            catalog,
            order_sink,
            cart_notice,
            shopper_idle,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SanityConfig {
    /// Load only the Sanity settings from environment variables.
    ///
    /// Used by tools that read the catalog without serving HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SANITY_PROJECT_ID` or `SANITY_DATASET` is
    /// missing, or if the token fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let env = Env(|key: &str| std::env::var(key).ok());
        let project_id = env.required("SANITY_PROJECT_ID")?;
        Self::from_vars(&env, project_id)
    }

    fn from_vars<F>(env: &Env<F>, project_id: String) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_token = match env.optional("SANITY_AUTH_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "SANITY_AUTH_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            project_id,
            dataset: env.required("SANITY_DATASET")?,
            api_version: env
                .optional("SANITY_API_VERSION")
                .unwrap_or_else(|| "2023-10-10".to_string())
                .trim_start_matches('v')
                .to_string(),
            use_cdn: env.parsed_or("SANITY_USE_CDN", Some(true))?,
            auth_token,
        })
    }

    /// The bearer token value, if one is configured.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_ref().map(|token| token.expose_secret())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with typed accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: Option<T>) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
        }
    }
}

/// Longest accepted shopper idle time: one year.
const MAX_SHOPPER_IDLE_MINUTES: u64 = 365 * 24 * 60;

/// Idle expiry for shopper contexts and sessions, from whole minutes.
fn idle_from_minutes(minutes: u64) -> Result<Duration, ConfigError> {
    if !(1..=MAX_SHOPPER_IDLE_MINUTES).contains(&minutes) {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPPER_IDLE_MINUTES".to_string(),
            format!("must be between 1 and {MAX_SHOPPER_IDLE_MINUTES}, got {minutes}"),
        ));
    }
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar("SHOPPER_IDLE_MINUTES".to_string(), "too large".to_string())
        })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN: &str = "skQ7vR2mZ9xLpT4wN8bY1cF6hJ3dK5gA0eU";

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    fn sanity_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("SANITY_PROJECT_ID", "abc123"),
            ("SANITY_DATASET", "production"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&sanity_vars()).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.catalog, CatalogSource::Sanity);
        assert_eq!(config.order_sink, OrderSinkKind::Simulated);
        assert_eq!(config.cart_notice, Duration::from_secs(3));
        assert_eq!(config.shopper_idle, Duration::from_secs(120 * 60));
        assert!(!config.is_secure());

        let sanity = config.sanity.unwrap();
        assert_eq!(sanity.api_version, "2023-10-10");
        assert!(sanity.use_cdn);
        assert!(sanity.token().is_none());
    }

    #[test]
    fn test_missing_base_url() {
        let result = load(&[("SANITY_PROJECT_ID", "abc"), ("SANITY_DATASET", "prod")]);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = sanity_vars();
        vars.push(("STOREFRONT_PORT", "not-a-port"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_fixture_without_sanity() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://shop.test"),
            ("CATALOG_FIXTURE", "fixtures/catalog.json"),
        ])
        .unwrap();

        assert_eq!(
            config.catalog,
            CatalogSource::Fixture(PathBuf::from("fixtures/catalog.json"))
        );
        assert!(config.sanity.is_none());
        assert!(config.is_secure());
    }

    #[test]
    fn test_sanity_required_without_fixture() {
        let result = load(&[("STOREFRONT_BASE_URL", "http://localhost:3000")]);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "SANITY_PROJECT_ID"));
    }

    #[test]
    fn test_sanity_sink_requires_token() {
        let mut vars = sanity_vars();
        vars.push(("ORDER_SINK", "sanity"));
        assert!(matches!(load(&vars), Err(ConfigError::MissingEnvVar(key)) if key == "SANITY_AUTH_TOKEN"));

        vars.push(("SANITY_AUTH_TOKEN", TOKEN));
        assert_eq!(load(&vars).unwrap().order_sink, OrderSinkKind::Sanity);
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let mut vars = sanity_vars();
        vars.push(("SANITY_AUTH_TOKEN", "your-sanity-token"));
        assert!(matches!(load(&vars), Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_low_entropy_token_rejected() {
        let mut vars = sanity_vars();
        vars.push(("SANITY_AUTH_TOKEN", "aaaaaaaaaaaaaaaaaaaaaaaa"));
        assert!(matches!(load(&vars), Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_shopper_idle_bounds() {
        let mut vars = sanity_vars();
        vars.push(("SHOPPER_IDLE_MINUTES", "0"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(key, _)) if key == "SHOPPER_IDLE_MINUTES"));

        let mut vars = sanity_vars();
        vars.push(("SHOPPER_IDLE_MINUTES", "18446744073709551615"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(key, _)) if key == "SHOPPER_IDLE_MINUTES"));

        let mut vars = sanity_vars();
        vars.push(("SHOPPER_IDLE_MINUTES", "30"));
        assert_eq!(load(&vars).unwrap().shopper_idle, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_api_version_strips_prefix() {
        let mut vars = sanity_vars();
        vars.push(("SANITY_API_VERSION", "v2024-01-01"));
        assert_eq!(load(&vars).unwrap().sanity.unwrap().api_version, "2024-01-01");
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_sanity_config_debug_redacts_token() {
        let mut vars = sanity_vars();
        vars.push(("SANITY_AUTH_TOKEN", TOKEN));
        let sanity = load(&vars).unwrap().sanity.unwrap();

        let debug_output = format!("{sanity:?}");
        assert!(debug_output.contains("abc123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(TOKEN));
    }
}
