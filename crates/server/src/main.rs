//! Bazaar - a small e-commerce demo backend.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - tower-sessions for session-based authentication (in-memory store)
//! - Local password login (Argon2id) plus Google/Facebook/Discord OAuth via
//!   the `oauth2` crate
//! - One flat JSON file as the only persistent data store

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_server::config::ServerConfig;
use bazaar_server::db::UserStore;
use bazaar_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open the user store, creating an empty one on first run
    let store = UserStore::open(&config.users_file)
        .await
        .expect("Failed to open user store");
    tracing::info!(path = %config.users_file.display(), "User store ready");

    // Build application state (registers configured OAuth providers)
    let state = AppState::new(config.clone(), store).expect("Failed to initialize application state");

    let app = bazaar_server::app(&state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("bazaar listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
