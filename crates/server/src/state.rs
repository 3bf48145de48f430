//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::UserStore;
use crate::oauth::{OAuthError, OAuthProviders};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the user store, and the OAuth provider registry.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: UserStore,
    providers: OAuthProviders,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the OAuth provider registry from the configuration; providers
    /// without credentials are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if an OAuth client cannot be constructed.
    pub fn new(config: ServerConfig, store: UserStore) -> Result<Self, OAuthError> {
        let providers = OAuthProviders::from_config(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                providers,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn store(&self) -> &UserStore {
        &self.inner.store
    }

    /// Get a reference to the OAuth provider registry.
    #[must_use]
    pub fn providers(&self) -> &OAuthProviders {
        &self.inner.providers
    }
}
