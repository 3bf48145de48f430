//! Integration test harness for Bazaar.
//!
//! Builds the real router against a temp-file user store, binds it to an
//! ephemeral port, and drives it over HTTP with a cookie-holding reqwest
//! client - the same way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

use std::path::PathBuf;

use secrecy::SecretString;
use tempfile::TempDir;

use bazaar_server::config::{ProviderCredentials, ServerConfig};
use bazaar_server::db::UserStore;
use bazaar_server::state::AppState;

/// A running server plus the client state needed to talk to it.
pub struct TestContext {
    /// HTTP client with a cookie store and redirects disabled.
    pub client: reqwest::Client,
    /// Base URL of the spawned server (`http://127.0.0.1:<port>`).
    pub base_url: String,
    /// Path of the JSON user store backing this server.
    pub users_file: PathBuf,
    _tmp: TempDir,
}

impl TestContext {
    /// Spawn a server with no OAuth providers configured.
    pub async fn new() -> Self {
        Self::spawn(None).await
    }

    /// Spawn a server with dummy Google OAuth credentials configured.
    ///
    /// The credentials are fake - good enough to exercise the authorize
    /// redirect and the callback's CSRF validation, neither of which talks
    /// to Google.
    pub async fn with_google() -> Self {
        Self::spawn(Some(ProviderCredentials {
            client_id: "test-google-client-id".to_string(),
            client_secret: SecretString::from("test-google-client-secret"),
            callback_url: None,
        }))
        .await
    }

    async fn spawn(google: Option<ProviderCredentials>) -> Self {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let users_file = tmp.path().join("users.json");

        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            users_file: users_file.clone(),
            session_cookie: "bazaar_session".to_string(),
            session_secret: SecretString::from("integration-test-session-secret!"),
            google,
            facebook: None,
            discord: None,
        };

        let store = UserStore::open(&users_file)
            .await
            .expect("Failed to open user store");
        let state = AppState::new(config, store).expect("Failed to build app state");
        let app = bazaar_server::app(&state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            users_file,
            _tmp: tmp,
        }
    }

    /// Full URL for a path on the spawned server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST /api/register with the given fields.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("register request failed")
    }

    /// POST /api/login with the given credentials.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("login request failed")
    }

    /// The persisted user array, read straight from the store file.
    pub async fn persisted_users(&self) -> Vec<serde_json::Value> {
        let contents = tokio::fs::read_to_string(&self.users_file)
            .await
            .expect("Failed to read users file");
        serde_json::from_str(&contents).expect("users file is not a JSON array")
    }
}
