//! Integration tests for the catalog endpoints.
//!
//! The storefront serves an in-memory catalog; see
//! `comforty_integration_tests::catalog_documents`.

use comforty_integration_tests::TestStorefront;

fn ids(products: &serde_json::Value) -> Vec<&str> {
    products
        .as_array()
        .expect("products should be an array")
        .iter()
        .map(|p| p["id"].as_str().expect("product id"))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let store = TestStorefront::start().await;
    let (status, body) = store.get_text("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_listing_skips_rejected_documents() {
    let store = TestStorefront::start().await;
    let (status, body) = store.get_json("/products").await;

    assert_eq!(status, 200);
    assert_eq!(ids(&body["products"]), ["chair-1", "chair-2", "sofa-1"]);
    assert!(body["catalog_error"].is_null());
}

#[tokio::test]
async fn test_search_and_tag_filters() {
    let store = TestStorefront::start().await;

    let (_, body) = store.get_json("/products?search=ARMCHAIR").await;
    assert_eq!(ids(&body["products"]), ["chair-2"]);

    let (_, body) = store.get_json("/products?tag=gallery").await;
    assert_eq!(ids(&body["products"]), ["chair-2"]);

    let (_, body) = store.get_json("/products/featured").await;
    assert_eq!(ids(&body["products"]), ["chair-1", "sofa-1"]);
}

#[tokio::test]
async fn test_product_detail() {
    let store = TestStorefront::start().await;

    let (status, body) = store.get_json("/products/chair-2").await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Rose Luxe Armchair");
    assert_eq!(body["price"], "$30.00");
    assert_eq!(body["price_without_discount"], "$45.00");
    assert_eq!(body["on_sale"], true);

    let (status, body) = store.get_json("/products/sofa-1").await;
    assert_eq!(status, 200);
    assert_eq!(body["in_stock"], false);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let store = TestStorefront::start().await;

    let (status, body) = store.get_json("/products/broken-1").await;
    assert_eq!(status, 404);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_categories() {
    let store = TestStorefront::start().await;
    let (status, body) = store.get_json("/categories").await;

    assert_eq!(status, 200);
    let categories = body["categories"].as_array().expect("categories array");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["title"], "Wing Chair");
    assert_eq!(categories[0]["product_count"], 2);
}
