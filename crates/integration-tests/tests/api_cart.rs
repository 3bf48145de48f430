//! Integration tests for cart operations and checkout.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use bazaar_integration_tests::TestContext;

/// Register a fresh user so the cookie jar holds a session.
async fn logged_in_context() -> TestContext {
    let ctx = TestContext::new().await;
    let resp = ctx.register("An", "an@example.com", "mat-khau-123").await;
    assert_eq!(resp.status(), StatusCode::OK);
    ctx
}

async fn get_cart(ctx: &TestContext) -> Value {
    ctx.client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_cart(ctx: &TestContext, body: &Value) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/api/cart"))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_cart_endpoints_require_auth() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/api/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);

    let resp = post_cart(&ctx, &json!({ "cart": [] })).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fresh_cart_is_empty() {
    let ctx = logged_in_context().await;

    let body = get_cart(&ctx).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["cart"], json!([]));
}

#[tokio::test]
async fn test_cart_round_trips_identical_structure() {
    let ctx = logged_in_context().await;

    let items = json!([{ "sku": "A", "qty": 2 }]);
    let resp = post_cart(&ctx, &json!({ "cart": items })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["cart"], items);

    let body = get_cart(&ctx).await;
    assert_eq!(body["cart"], items);
}

#[tokio::test]
async fn test_cart_items_are_opaque() {
    let ctx = logged_in_context().await;

    // Arbitrary shapes are persisted verbatim - no per-item validation.
    let items = json!(["just-a-string", { "nested": { "deep": [1, 2, 3] } }, 42]);
    post_cart(&ctx, &json!({ "cart": items })).await;

    let body = get_cart(&ctx).await;
    assert_eq!(body["cart"], items);
}

#[tokio::test]
async fn test_non_array_cart_coerces_to_empty() {
    let ctx = logged_in_context().await;

    post_cart(&ctx, &json!({ "cart": [{ "sku": "A", "qty": 1 }] })).await;

    // An object instead of an array must persist an empty cart, not error.
    let resp = post_cart(&ctx, &json!({ "cart": { "sku": "A" } })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["cart"], json!([]));

    assert_eq!(get_cart(&ctx).await["cart"], json!([]));

    // Same for a missing cart field entirely.
    let resp = post_cart(&ctx, &json!({})).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // And for a scalar.
    let resp = post_cart(&ctx, &json!({ "cart": "oops" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["cart"], json!([]));
}

#[tokio::test]
async fn test_checkout_empty_cart_is_bad_request() {
    let ctx = logged_in_context().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);

    // The store still holds exactly the registered user with an empty cart.
    let users = ctx.persisted_users().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["cart"], json!([]));
}

#[tokio::test]
async fn test_checkout_clears_cart_and_returns_order_id() {
    let ctx = logged_in_context().await;

    post_cart(&ctx, &json!({ "cart": [{ "sku": "A", "qty": 2 }] })).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(!body["message"].as_str().unwrap().is_empty());

    let order_id = body["orderId"].as_str().unwrap();
    let digits = order_id.strip_prefix("ORD-").unwrap();
    assert!(!digits.is_empty());
    assert!(digits.chars().all(|c| c.is_ascii_digit()));

    // The cart is empty afterward, so a second checkout fails.
    assert_eq!(get_cart(&ctx).await["cart"], json!([]));

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
