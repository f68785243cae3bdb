//! Integration tests for cart behavior.
//!
//! Run with: cargo test -p rosewood-integration-tests -- --ignored

use serde_json::{Value, json};

use rosewood_integration_tests::{
    add_to_cart, base_url, client, product_by_slug, register_user, unique_email,
};

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_adding_identical_line_merges_quantities() {
    let client = client();
    let (token, _) = register_user(&client, &unique_email("cart-merge")).await;

    let product = product_by_slug(&client, "sheer-tights-black").await;
    let product_id = product["id"].as_i64().expect("product id");

    add_to_cart(&client, &token, product_id, 1, Some("M")).await;
    add_to_cart(&client, &token, product_id, 2, Some("M")).await;

    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("cart request failed");
    let body: Value = resp.json().await.expect("cart response not JSON");

    let items = body["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1, "identical lines must merge, never duplicate");
    assert_eq!(items[0]["quantity"], 3);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_different_size_creates_separate_line() {
    let client = client();
    let (token, _) = register_user(&client, &unique_email("cart-size")).await;

    let product = product_by_slug(&client, "sheer-tights-black").await;
    let product_id = product["id"].as_i64().expect("product id");

    add_to_cart(&client, &token, product_id, 1, Some("M")).await;
    add_to_cart(&client, &token, product_id, 1, Some("L")).await;

    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("cart request failed");
    let body: Value = resp.json().await.expect("cart response not JSON");

    let items = body["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_over_stock_quantity_update_rejected_and_unchanged() {
    let client = client();
    let (token, _) = register_user(&client, &unique_email("cart-stock")).await;

    let product = product_by_slug(&client, "sheer-tights-black").await;
    let product_id = product["id"].as_i64().expect("product id");
    let stock = product["stock"].as_i64().expect("stock");

    let line = add_to_cart(&client, &token, product_id, 1, None).await;
    let item_id = line["id"].as_i64().expect("item id");

    let resp = client
        .put(format!("{}/api/cart/items/{item_id}", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "quantity": stock + 1 }))
        .send()
        .await
        .expect("update request failed");

    assert_eq!(resp.status(), 400);

    // Quantity must be untouched by the rejected update
    let cart: Value = client
        .get(format!("{}/api/cart", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart response not JSON");

    let items = cart["data"]["items"].as_array().expect("items array");
    assert_eq!(items[0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_cart_item_ownership_enforced() {
    let client = client();
    let (owner_token, _) = register_user(&client, &unique_email("cart-owner")).await;
    let (intruder_token, _) = register_user(&client, &unique_email("cart-intruder")).await;

    let product = product_by_slug(&client, "sheer-tights-black").await;
    let product_id = product["id"].as_i64().expect("product id");

    let line = add_to_cart(&client, &owner_token, product_id, 1, None).await;
    let item_id = line["id"].as_i64().expect("item id");

    // Someone else's token cannot touch the line
    let resp = client
        .delete(format!("{}/api/cart/items/{item_id}", base_url()))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .expect("delete request failed");

    assert_eq!(resp.status(), 404);
}
