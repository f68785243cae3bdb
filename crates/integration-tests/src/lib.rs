//! Shared helpers for Rosewood integration tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p rosewood-cli -- migrate`)
//! - Seeded demo data (`cargo run -p rosewood-cli -- seed`)
//! - The API server running (`cargo run -p rosewood-api`)
//!
//! All tests are `#[ignore]`d so `cargo test` stays green without a live
//! stack; run them with `cargo test -p rosewood-integration-tests -- --ignored`.

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// A plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address that no previous test run has used.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{prefix}-{nanos}@test.example.com")
}

/// Register a fresh user and return (token, user payload).
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_user(client: &Client, email: &str) -> (String, Value) {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "password": "integration-test-pw",
            "firstName": "Test",
            "lastName": "Shopper",
        }))
        .send()
        .await
        .expect("register request failed");

    assert_eq!(resp.status(), 201, "registration should succeed");

    let body: Value = resp.json().await.expect("register response not JSON");
    let token = body["data"]["token"]
        .as_str()
        .expect("token missing")
        .to_string();

    (token, body["data"]["user"].clone())
}

/// Fetch a seeded product by slug.
///
/// # Panics
///
/// Panics if the product is missing (run `rosewood seed` first).
pub async fn product_by_slug(client: &Client, slug: &str) -> Value {
    let resp = client
        .get(format!("{}/api/products/slug/{slug}", base_url()))
        .send()
        .await
        .expect("product request failed");

    assert_eq!(resp.status(), 200, "seeded product {slug} should exist");

    let body: Value = resp.json().await.expect("product response not JSON");
    body["data"].clone()
}

/// Create an address for the authenticated user and return its id.
///
/// # Panics
///
/// Panics if creation fails.
pub async fn create_address(client: &Client, token: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/users/addresses", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "fullName": "Test Shopper",
            "line1": "42 Integration Lane",
            "city": "Mumbai",
            "state": "MH",
            "postalCode": "400001",
            "country": "IN",
            "isDefault": true,
        }))
        .send()
        .await
        .expect("address request failed");

    assert_eq!(resp.status(), 201, "address creation should succeed");

    let body: Value = resp.json().await.expect("address response not JSON");
    body["data"]["id"].as_i64().expect("address id missing")
}

/// Add a product to the authenticated user's cart.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn add_to_cart(
    client: &Client,
    token: &str,
    product_id: i64,
    quantity: i64,
    size: Option<&str>,
) -> Value {
    let resp = client
        .post(format!("{}/api/cart/items", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "productId": product_id,
            "quantity": quantity,
            "size": size,
        }))
        .send()
        .await
        .expect("add-to-cart request failed");

    assert_eq!(resp.status(), 201, "add to cart should succeed");

    let body: Value = resp.json().await.expect("cart response not JSON");
    body["data"].clone()
}
