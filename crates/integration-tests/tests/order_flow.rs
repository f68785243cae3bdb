//! Integration tests for order placement.
//!
//! Run with: cargo test -p rosewood-integration-tests -- --ignored

use rust_decimal::Decimal;
use serde_json::{Value, json};

use rosewood_integration_tests::{
    add_to_cart, base_url, client, create_address, product_by_slug, register_user, unique_email,
};

fn dec(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("parseable decimal")
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_order_totals_and_stock_decrement() {
    let client = client();
    let (token, _) = register_user(&client, &unique_email("order")).await;
    let address_id = create_address(&client, &token).await;

    let product = product_by_slug(&client, "sheer-tights-black").await;
    let product_id = product["id"].as_i64().expect("product id");
    let price = dec(&product["price"]);
    let stock_before = product["stock"].as_i64().expect("stock");

    add_to_cart(&client, &token, product_id, 2, None).await;

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "addressId": address_id, "paymentMethod": "cod" }))
        .send()
        .await
        .expect("order request failed");

    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("order response not JSON");
    let order = &body["data"]["order"];

    let subtotal = dec(&order["subtotal"]);
    let shipping = dec(&order["shippingCost"]);
    let tax = dec(&order["tax"]);
    let total = dec(&order["total"]);

    assert_eq!(subtotal, price * Decimal::from(2));
    // 18% tax, shipping free only above the 500 threshold
    assert_eq!(tax, (subtotal * Decimal::new(18, 2)).round_dp(2));
    if subtotal > Decimal::from(500) {
        assert_eq!(shipping, Decimal::ZERO);
    } else {
        assert_eq!(shipping, Decimal::from(50));
    }
    assert_eq!(total, subtotal + shipping + tax);

    // Item snapshot carries the purchase-time price
    assert_eq!(dec(&order["items"][0]["price"]), price);
    assert_eq!(order["status"], "PENDING");
    assert!(
        order["orderNumber"]
            .as_str()
            .expect("order number")
            .starts_with("ORD-")
    );

    // Stock decremented by the ordered quantity
    let product_after = product_by_slug(&client, "sheer-tights-black").await;
    assert_eq!(
        product_after["stock"].as_i64().expect("stock"),
        stock_before - 2
    );

    // Cart emptied (not deleted) by placement
    let cart: Value = client
        .get(format!("{}/api/cart", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart response not JSON");
    assert_eq!(
        cart["data"]["items"].as_array().expect("items array").len(),
        0
    );
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_empty_cart_order_rejected() {
    let client = client();
    let (token, _) = register_user(&client, &unique_email("order-empty")).await;
    let address_id = create_address(&client, &token).await;

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "addressId": address_id, "paymentMethod": "cod" }))
        .send()
        .await
        .expect("order request failed");

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_foreign_address_rejected() {
    let client = client();
    let (owner_token, _) = register_user(&client, &unique_email("order-addr-owner")).await;
    let owner_address = create_address(&client, &owner_token).await;

    let (intruder_token, _) = register_user(&client, &unique_email("order-addr-intruder")).await;
    let product = product_by_slug(&client, "sheer-tights-black").await;
    let product_id = product["id"].as_i64().expect("product id");
    add_to_cart(&client, &intruder_token, product_id, 1, None).await;

    // Checking out against someone else's address fails and persists nothing
    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&intruder_token)
        .json(&json!({ "addressId": owner_address, "paymentMethod": "cod" }))
        .send()
        .await
        .expect("order request failed");

    assert_eq!(resp.status(), 404);

    let orders: Value = client
        .get(format!("{}/api/orders", base_url()))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .expect("orders request failed")
        .json()
        .await
        .expect("orders response not JSON");
    assert_eq!(
        orders["data"]["data"].as_array().expect("orders array").len(),
        0
    );
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_review_updates_product_rating() {
    let client = client();
    let (token, _) = register_user(&client, &unique_email("review")).await;

    let product = product_by_slug(&client, "baby-romper-set").await;
    let product_id = product["id"].as_i64().expect("product id");
    let count_before = product["reviewCount"].as_i64().expect("review count");

    let resp = client
        .post(format!("{}/api/reviews", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "productId": product_id,
            "rating": 5,
            "comment": "Lovely set",
        }))
        .send()
        .await
        .expect("review request failed");

    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("review response not JSON");
    // No delivered order for this fresh account, so the review is unverified
    assert_eq!(body["data"]["isVerified"], false);

    let product_after = product_by_slug(&client, "baby-romper-set").await;
    assert_eq!(
        product_after["reviewCount"].as_i64().expect("review count"),
        count_before + 1
    );
}
