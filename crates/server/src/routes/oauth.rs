//! OAuth route handlers.
//!
//! Handles the browser-facing half of the OAuth flow for every configured
//! provider:
//! - Begin: park CSRF state + PKCE verifier in the session, redirect to the
//!   provider's authorization page
//! - Callback: validate state, exchange the code, fetch the profile, resolve
//!   the user record, establish the session
//!
//! Every failure path redirects to the fixed failure URL rather than
//! returning an error body - the browser is mid-redirect-dance here.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use bazaar_core::Provider;

use crate::middleware::set_identity;
use crate::models::{PendingOAuth, session_keys};
use crate::state::AppState;

/// Where the browser lands after a completed handshake.
const AUTH_SUCCESS_URL: &str = "/?auth=success";

/// Where the browser lands after any failed handshake step.
const AUTH_FAIL_URL: &str = "/?auth=fail";

/// Query parameters from the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Initiate the OAuth flow for one provider.
///
/// # Route
///
/// `GET /auth/{provider}`
pub async fn begin(State(state): State<AppState>, session: Session, provider: Provider) -> Response {
    let Some(client) = state.providers().get(provider) else {
        // Routes are only registered for configured providers.
        return StatusCode::NOT_FOUND.into_response();
    };

    let authorize = client.authorize();
    let pending = PendingOAuth {
        provider,
        state: authorize.state,
        pkce_verifier: authorize.pkce_verifier,
    };

    if let Err(e) = session.insert(session_keys::PENDING_OAUTH, &pending).await {
        tracing::error!(%provider, "Failed to store OAuth state in session: {e}");
        return Redirect::to(AUTH_FAIL_URL).into_response();
    }

    Redirect::to(authorize.url.as_str()).into_response()
}

/// Handle the provider callback.
///
/// # Route
///
/// `GET /auth/{provider}/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
    provider: Provider,
) -> Response {
    let Some(client) = state.providers().get(provider) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Some(error) = query.error {
        tracing::warn!(%provider, error, "OAuth provider returned an error");
        return Redirect::to(AUTH_FAIL_URL).into_response();
    }

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        tracing::warn!(%provider, "OAuth callback missing code or state");
        return Redirect::to(AUTH_FAIL_URL).into_response();
    };

    // The parked state is one-time use: remove it before validating.
    let pending: Option<PendingOAuth> = session
        .get(session_keys::PENDING_OAUTH)
        .await
        .ok()
        .flatten();
    let _ = session.remove::<PendingOAuth>(session_keys::PENDING_OAUTH).await;

    let Some(pending) =
        pending.filter(|p| p.provider == provider && p.state == returned_state)
    else {
        tracing::warn!(%provider, "OAuth state mismatch");
        return Redirect::to(AUTH_FAIL_URL).into_response();
    };

    let access_token = match client.exchange_code(&code, &pending.pkce_verifier).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(%provider, "Failed to exchange OAuth code: {e}");
            return Redirect::to(AUTH_FAIL_URL).into_response();
        }
    };

    let identity = match client.identity(&access_token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!(%provider, "Failed to fetch provider profile: {e}");
            return Redirect::to(AUTH_FAIL_URL).into_response();
        }
    };

    // First login for a previously-unseen identity creates its user record.
    if let Err(e) = state.store().get_or_create(&identity.fields()).await {
        tracing::error!(%provider, "Failed to resolve user record: {e}");
        return Redirect::to(AUTH_FAIL_URL).into_response();
    }

    if let Err(e) = set_identity(&session, &identity).await {
        tracing::error!(%provider, "Failed to store identity in session: {e}");
        return Redirect::to(AUTH_FAIL_URL).into_response();
    }

    tracing::info!(%provider, "OAuth login succeeded");

    Redirect::to(AUTH_SUCCESS_URL).into_response()
}
