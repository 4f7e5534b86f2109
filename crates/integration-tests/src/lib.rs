//! Integration test harness for the Comforty storefront.
//!
//! Each [`TestStorefront`] serves the full router on an ephemeral port,
//! backed by an in-memory catalog and the simulated order sink. Its HTTP
//! client keeps cookies, so consecutive requests act as one shopper.

use std::collections::HashMap;

use comforty_storefront::catalog::{Catalog, FixtureCatalog};
use comforty_storefront::checkout::{OrderBackend, SimulatedOrderSink};
use comforty_storefront::config::StorefrontConfig;
use comforty_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Raw documents served by every test storefront.
///
/// Includes one malformed product that ingestion must drop.
#[must_use]
pub fn catalog_documents() -> Vec<Value> {
    vec![
        json!({
            "_id": "chair-1", "_type": "products", "title": "Library Stool Chair",
            "price": 20, "inventory": 12, "tags": ["featured", "instock"],
            "badge": "New"
        }),
        json!({
            "_id": "chair-2", "_type": "products", "title": "Rose Luxe Armchair",
            "price": 30, "priceWithoutDiscount": 45, "inventory": 4, "tags": ["gallery"]
        }),
        json!({
            "_id": "sofa-1", "_type": "products", "title": "Scandinavian Sofa",
            "price": 250, "inventory": 0, "tags": ["featured"]
        }),
        json!({
            "_id": "broken-1", "_type": "products", "title": "Broken Listing",
            "price": -10, "inventory": 1
        }),
        json!({ "_id": "cat-1", "_type": "categories", "title": "Wing Chair", "products": 2 }),
        json!({ "_id": "cat-2", "_type": "categories", "title": "Desk Chair", "products": 1 }),
    ]
}

/// A storefront running in the background of the current test runtime.
pub struct TestStorefront {
    base_url: String,
    client: reqwest::Client,
}

impl TestStorefront {
    /// Start a storefront with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the config is rejected.
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Start a storefront with extra environment overrides.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the config is rejected.
    pub async fn start_with(overrides: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("STOREFRONT_BASE_URL".to_string(), "http://127.0.0.1".to_string()),
            ("CATALOG_FIXTURE".to_string(), "catalog.json".to_string()),
        ]);
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("test config should load");

        let catalog = Catalog::Fixture(FixtureCatalog::from_documents(catalog_documents()));
        let state = AppState::from_parts(config, catalog, OrderBackend::Simulated(SimulatedOrderSink));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let app = comforty_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
        }
    }

    /// A second shopper on the same storefront, with its own cookie jar.
    #[must_use]
    pub fn another_shopper(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: new_client(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the status with the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed");
        read_json(response).await
    }

    /// GET `path` and return the status with the plain-text body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get_text(&self, path: &str) -> (u16, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed");
        let status = response.status().as_u16();
        (status, response.text().await.expect("failed to read body"))
    }

    /// POST a form to `path` and return the status with the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("request failed");
        read_json(response).await
    }

    /// The underlying cookie-keeping client.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Billing form with every field filled.
#[must_use]
pub fn complete_billing() -> Vec<(&'static str, &'static str)> {
    vec![
        ("firstName", "Ada"),
        ("lastName", "Lovelace"),
        ("address", "12 Analytical Row"),
        ("city", "London"),
        ("zipCode", "01234"),
        ("phone", "+44 20 7946 0000"),
        ("email", "ada@example.org"),
    ]
}

fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("failed to build HTTP client")
}

async fn read_json(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json().await.expect("response body is not JSON");
    (status, body)
}
