//! Bazaar server library.
//!
//! This crate provides the shop as a library, allowing the full router to be
//! exercised in-process by the integration-tests crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Build the full application router for the given state.
#[must_use]
pub fn app(state: &AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(state))
        .layer(middleware::create_session_layer(state.config()))
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
}
