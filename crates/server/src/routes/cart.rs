//! Cart and checkout route handlers.
//!
//! Cart items are opaque: whatever JSON the client submits is persisted
//! verbatim. Every handler resolves the session identity to its user record,
//! creating one on first access.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Read the current cart.
///
/// # Route
///
/// `GET /api/cart`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<Value>> {
    let cart = state.store().cart(&identity.fields()).await?;

    Ok(Json(json!({ "ok": true, "cart": cart })))
}

/// Replace the cart wholesale.
///
/// The body's `cart` field is taken as-is when it is an array; anything else
/// (missing, null, object, string...) coerces to an empty cart.
///
/// # Route
///
/// `POST /api/cart`
pub async fn replace(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let items = match body.get("cart") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let cart = state.store().replace_cart(&identity.fields(), items).await?;

    Ok(Json(json!({ "ok": true, "cart": cart })))
}

/// Simulated checkout.
///
/// Clears the cart and returns a manufactured order id; no order record is
/// kept anywhere.
///
/// # Route
///
/// `POST /api/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<Value>> {
    let order_id = state
        .store()
        .checkout(&identity.fields())
        .await?
        .ok_or_else(|| AppError::BadRequest("Giỏ hàng đang trống".to_owned()))?;

    tracing::info!(%order_id, "Checkout completed");

    Ok(Json(json!({
        "ok": true,
        "orderId": order_id,
        "message": "Đặt hàng thành công",
    })))
}
