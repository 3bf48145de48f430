//! OAuth provider clients.
//!
//! The handshake itself (authorization URL, CSRF state, PKCE, token exchange)
//! is delegated to the `oauth2` crate; per-provider modules contribute only
//! endpoints, scopes, and the userinfo profile shape. Providers are
//! registered at startup based on which credentials are configured.

pub mod discord;
pub mod facebook;
pub mod google;

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use secrecy::ExposeSecret;
use thiserror::Error;
use url::Url;

use bazaar_core::Provider;

use crate::config::{ProviderCredentials, ServerConfig};
use crate::models::SessionIdentity;

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Errors that can occur in the OAuth layer.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A provider endpoint or callback URL failed to parse.
    #[error("invalid OAuth URL: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The code-for-token exchange failed.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// An HTTP request to the provider failed.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider has no OAuth handshake.
    #[error("{0} is not an OAuth provider")]
    Unsupported(Provider),
}

/// Authorization and token endpoints for one provider.
fn endpoints(provider: Provider) -> Result<(&'static str, &'static str), OAuthError> {
    match provider {
        Provider::Local => Err(OAuthError::Unsupported(provider)),
        Provider::Google => Ok((google::AUTH_URL, google::TOKEN_URL)),
        Provider::Facebook => Ok((facebook::AUTH_URL, facebook::TOKEN_URL)),
        Provider::Discord => Ok((discord::AUTH_URL, discord::TOKEN_URL)),
    }
}

/// Scopes requested from one provider.
const fn scopes(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::Local => &[],
        Provider::Google => google::SCOPES,
        Provider::Facebook => facebook::SCOPES,
        Provider::Discord => discord::SCOPES,
    }
}

/// Everything the begin handler needs to redirect the browser: the provider
/// authorization URL plus the state and verifier to park in the session.
pub struct AuthorizeRequest {
    pub url: Url,
    pub state: String,
    pub pkce_verifier: String,
}

/// A configured OAuth client for one provider.
pub struct ProviderClient {
    kind: Provider,
    client: ConfiguredClient,
    http: reqwest::Client,
}

impl ProviderClient {
    fn new(
        kind: Provider,
        credentials: &ProviderCredentials,
        callback_url: String,
        http: reqwest::Client,
    ) -> Result<Self, OAuthError> {
        let (auth_url, token_url) = endpoints(kind)?;

        let client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
            .set_client_secret(ClientSecret::new(
                credentials.client_secret.expose_secret().to_owned(),
            ))
            .set_auth_uri(AuthUrl::new(auth_url.to_owned())?)
            .set_token_uri(TokenUrl::new(token_url.to_owned())?)
            .set_redirect_uri(RedirectUrl::new(callback_url)?);

        Ok(Self { kind, client, http })
    }

    /// The provider this client talks to.
    #[must_use]
    pub const fn kind(&self) -> Provider {
        self.kind
    }

    /// Build the authorization redirect with fresh CSRF state and PKCE.
    #[must_use]
    pub fn authorize(&self) -> AuthorizeRequest {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = self.client.authorize_url(CsrfToken::new_random);
        for scope in scopes(self.kind) {
            request = request.add_scope(Scope::new((*scope).to_owned()));
        }
        let (url, csrf_state) = request.set_pkce_challenge(pkce_challenge).url();

        AuthorizeRequest {
            url,
            state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    /// Exchange the callback code for an access token.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::TokenExchange` if the provider rejects the code.
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<String, OAuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_owned()))
            .request_async(&self.http)
            .await
            .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

        Ok(token.access_token().secret().clone())
    }

    /// Fetch the user's profile and wrap it as a session identity.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Http` if the userinfo request fails.
    pub async fn identity(&self, access_token: &str) -> Result<SessionIdentity, OAuthError> {
        match self.kind {
            Provider::Local => Err(OAuthError::Unsupported(self.kind)),
            Provider::Google => {
                let profile = google::fetch_profile(&self.http, access_token).await?;
                Ok(SessionIdentity::Google {
                    profile,
                    access_token: access_token.to_owned(),
                })
            }
            Provider::Facebook => {
                let profile = facebook::fetch_profile(&self.http, access_token).await?;
                Ok(SessionIdentity::Facebook {
                    profile,
                    access_token: access_token.to_owned(),
                })
            }
            Provider::Discord => {
                let profile = discord::fetch_profile(&self.http, access_token).await?;
                Ok(SessionIdentity::Discord {
                    profile,
                    access_token: access_token.to_owned(),
                })
            }
        }
    }
}

/// The set of providers configured at startup.
pub struct OAuthProviders {
    clients: Vec<ProviderClient>,
}

impl OAuthProviders {
    /// Build clients for every provider whose credentials are configured.
    ///
    /// Unconfigured providers are skipped with a warning; their routes end up
    /// unregistered.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError` if the HTTP client cannot be built or a callback
    /// URL fails to parse.
    pub fn from_config(config: &ServerConfig) -> Result<Self, OAuthError> {
        // Token exchange must not follow redirects (oauth2 crate requirement).
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let mut clients = Vec::new();
        for kind in Provider::OAUTH {
            if let Some(credentials) = config.provider(kind) {
                let callback_url = credentials.callback_url.clone().unwrap_or_else(|| {
                    format!("{}/auth/{kind}/callback", config.base_url)
                });
                clients.push(ProviderClient::new(
                    kind,
                    credentials,
                    callback_url,
                    http.clone(),
                )?);
                tracing::info!(provider = %kind, "OAuth provider configured");
            } else {
                tracing::warn!(
                    provider = %kind,
                    "OAuth credentials not configured; provider routes disabled"
                );
            }
        }

        Ok(Self { clients })
    }

    /// The client for one provider, if configured.
    #[must_use]
    pub fn get(&self, kind: Provider) -> Option<&ProviderClient> {
        self.clients.iter().find(|client| client.kind() == kind)
    }

    /// Providers with a configured client, in registration order.
    pub fn configured(&self) -> impl Iterator<Item = Provider> + '_ {
        self.clients.iter().map(ProviderClient::kind)
    }

    /// Whether no provider is configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::path::PathBuf;

    fn config_with_google() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            users_file: PathBuf::from("users.json"),
            session_cookie: "bazaar_session".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            google: Some(ProviderCredentials {
                client_id: "google-client-id".to_string(),
                client_secret: SecretString::from("google-client-secret"),
                callback_url: None,
            }),
            facebook: None,
            discord: None,
        }
    }

    #[test]
    fn test_registry_skips_unconfigured_providers() {
        let providers = OAuthProviders::from_config(&config_with_google()).unwrap();

        assert!(providers.get(Provider::Google).is_some());
        assert!(providers.get(Provider::Facebook).is_none());
        assert!(providers.get(Provider::Discord).is_none());
        assert_eq!(providers.configured().collect::<Vec<_>>(), vec![
            Provider::Google
        ]);
    }

    #[test]
    fn test_registry_empty_without_credentials() {
        let mut config = config_with_google();
        config.google = None;
        let providers = OAuthProviders::from_config(&config).unwrap();
        assert!(providers.is_empty());
    }

    #[test]
    fn test_authorize_url_carries_state_and_pkce() {
        let providers = OAuthProviders::from_config(&config_with_google()).unwrap();
        let client = providers.get(Provider::Google).unwrap();

        let authorize = client.authorize();
        let url = authorize.url.to_string();

        assert!(url.starts_with(google::AUTH_URL));
        assert!(url.contains("client_id=google-client-id"));
        assert!(url.contains(&format!("state={}", authorize.state)));
        assert!(url.contains("code_challenge="));
        assert!(url.contains("redirect_uri="));
        assert!(!authorize.pkce_verifier.is_empty());
    }

    #[test]
    fn test_authorize_states_are_unique() {
        let providers = OAuthProviders::from_config(&config_with_google()).unwrap();
        let client = providers.get(Provider::Google).unwrap();

        assert_ne!(client.authorize().state, client.authorize().state);
    }
}
