//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_BASE_URL` - Public URL for the shop (used for OAuth callbacks)
//! - `BAZAAR_SESSION_SECRET` - Session signing secret (min 32 chars)
//!
//! ## Optional
//! - `BAZAAR_HOST` - Bind address (default: 127.0.0.1)
//! - `BAZAAR_PORT` - Listen port (default: 3000)
//! - `BAZAAR_USERS_FILE` - Path of the JSON user store (default: users.json)
//! - `BAZAAR_SESSION_COOKIE` - Session cookie name (default: bazaar_session)
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` / `GOOGLE_CALLBACK_URL`
//! - `FACEBOOK_CLIENT_ID` / `FACEBOOK_CLIENT_SECRET` / `FACEBOOK_CALLBACK_URL`
//! - `DISCORD_CLIENT_ID` / `DISCORD_CLIENT_SECRET` / `DISCORD_CALLBACK_URL`
//!
//! A provider whose client id or secret is absent is left unconfigured and its
//! routes are not registered. The callback URL defaults to
//! `{base_url}/auth/{provider}/callback` when not set explicitly.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use bazaar_core::Provider;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Bazaar server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the shop
    pub base_url: String,
    /// Path of the flat JSON file holding all user records
    pub users_file: PathBuf,
    /// Session cookie name
    pub session_cookie: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Google OAuth credentials, if configured
    pub google: Option<ProviderCredentials>,
    /// Facebook OAuth credentials, if configured
    pub facebook: Option<ProviderCredentials>,
    /// Discord OAuth credentials, if configured
    pub discord: Option<ProviderCredentials>,
}

/// OAuth client credentials for one provider.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct ProviderCredentials {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Callback URL override; derived from the base URL when absent
    pub callback_url: Option<String>,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BAZAAR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BAZAAR_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BAZAAR_BASE_URL")?;
        let users_file = PathBuf::from(get_env_or_default("BAZAAR_USERS_FILE", "users.json"));
        let session_cookie = get_env_or_default("BAZAAR_SESSION_COOKIE", "bazaar_session");
        let session_secret = get_required_secret("BAZAAR_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "BAZAAR_SESSION_SECRET")?;

        Ok(Self {
            host,
            port,
            base_url,
            users_file,
            session_cookie,
            session_secret,
            google: provider_credentials("GOOGLE"),
            facebook: provider_credentials("FACEBOOK"),
            discord: provider_credentials("DISCORD"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the configured credentials for an OAuth provider, if any.
    ///
    /// `Provider::Local` has no credentials and always returns `None`.
    #[must_use]
    pub const fn provider(&self, provider: Provider) -> Option<&ProviderCredentials> {
        match provider {
            Provider::Local => None,
            Provider::Google => self.google.as_ref(),
            Provider::Facebook => self.facebook.as_ref(),
            Provider::Discord => self.discord.as_ref(),
        }
    }
}

/// Load one provider's credentials from `{prefix}_CLIENT_ID` / `{prefix}_CLIENT_SECRET`.
///
/// Returns `None` unless both are present; partial configuration counts as
/// unconfigured.
fn provider_credentials(prefix: &str) -> Option<ProviderCredentials> {
    let client_id = get_optional_env(&format!("{prefix}_CLIENT_ID"))?;
    let client_secret = get_optional_env(&format!("{prefix}_CLIENT_SECRET"))?;

    Some(ProviderCredentials {
        client_id,
        client_secret: SecretString::from(client_secret),
        callback_url: get_optional_env(&format!("{prefix}_CALLBACK_URL")),
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}
