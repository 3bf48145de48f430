//! Account and session route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, set_identity};
use crate::models::SessionIdentity;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration payload. Fields arrive optional so missing ones map to a
/// 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Treat absent and empty fields the same way.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Handle local registration.
///
/// A successful registration immediately establishes the session - no
/// separate login call is needed.
///
/// # Route
///
/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<Value>> {
    let (Some(name), Some(email), Some(password)) = (
        required(payload.name),
        required(payload.email),
        required(payload.password),
    ) else {
        return Err(AppError::BadRequest(
            "Vui lòng nhập đầy đủ thông tin".to_owned(),
        ));
    };

    let user = AuthService::new(state.store())
        .register(&name, &email, &password)
        .await?;

    let identity = SessionIdentity::Local {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
    };
    set_identity(&session, &identity).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(json!({ "ok": true, "user": user.public() })))
}

/// Handle local login.
///
/// # Route
///
/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>> {
    let (Some(email), Some(password)) = (required(payload.email), required(payload.password))
    else {
        return Err(AppError::BadRequest(
            "Vui lòng nhập email và mật khẩu".to_owned(),
        ));
    };

    let user = AuthService::new(state.store())
        .login(&email, &password)
        .await?;

    let identity = SessionIdentity::Local {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
    };
    set_identity(&session, &identity).await?;

    Ok(Json(json!({ "ok": true, "user": user.public() })))
}

/// Handle logout.
///
/// Flushes the session; the session layer removes the cookie on the response
/// either way.
///
/// # Route
///
/// `POST /api/logout`
pub async fn logout(session: Session) -> Result<Json<Value>> {
    session.flush().await?;

    Ok(Json(json!({ "ok": true })))
}

/// Current-user projection.
///
/// With no session this is exactly `{"loggedIn": false}` - no `user` key.
/// Otherwise the identity is flattened with the same per-provider adapters
/// used for store resolution, and the raw provider profile rides along.
///
/// # Route
///
/// `GET /api/me`
pub async fn me(OptionalAuth(identity): OptionalAuth) -> Json<Value> {
    let Some(identity) = identity else {
        return Json(json!({ "loggedIn": false }));
    };

    let fields = identity.fields();
    Json(json!({
        "loggedIn": true,
        "user": {
            "provider": identity.provider(),
            "id": fields.id,
            "name": fields.name,
            "email": fields.email,
            "avatar": fields.avatar,
            "raw": identity.raw_profile(),
        },
    }))
}
