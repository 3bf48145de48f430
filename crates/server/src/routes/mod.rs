//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//!
//! # Account & session
//! POST /api/register              - Local signup (establishes a session)
//! POST /api/login                 - Local login
//! POST /api/logout                - End the session
//! GET  /api/me                    - Current-user projection
//!
//! # Cart (requires auth)
//! GET  /api/cart                  - Read the cart
//! POST /api/cart                  - Replace the cart wholesale
//! POST /api/checkout              - Simulated checkout (clears the cart)
//!
//! # OAuth (registered per configured provider)
//! GET  /auth/{provider}           - Redirect to the provider
//! GET  /auth/{provider}/callback  - Handle the provider callback
//! ```

pub mod auth;
pub mod cart;
pub mod oauth;

use axum::{
    Router,
    extract::{Query, State},
    routing::{get, post},
};
use tower_sessions::Session;

use crate::oauth::OAuthProviders;
use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/cart", get(cart::show).post(cart::replace))
        .route("/checkout", post(cart::checkout))
}

/// Create the OAuth routes router.
///
/// Only configured providers get routes; hitting an unconfigured provider's
/// path is a plain 404.
pub fn oauth_routes(providers: &OAuthProviders) -> Router<AppState> {
    let mut router = Router::new();
    for provider in providers.configured() {
        router = router
            .route(
                &format!("/{provider}"),
                get(move |state: State<AppState>, session: Session| {
                    oauth::begin(state, session, provider)
                }),
            )
            .route(
                &format!("/{provider}/callback"),
                get(
                    move |state: State<AppState>,
                          session: Session,
                          query: Query<oauth::CallbackQuery>| {
                        oauth::callback(state, session, query, provider)
                    },
                ),
            );
    }
    router
}

/// Create all routes for the shop.
pub fn routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new().nest("/api", api_routes());

    let providers = state.providers();
    if !providers.is_empty() {
        router = router.nest("/auth", oauth_routes(providers));
    }

    router
}
