//! Google OAuth endpoints and profile shape.

use serde::{Deserialize, Serialize};

use crate::models::ProfileFields;

use super::OAuthError;

pub(super) const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub(super) const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub(super) const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub(super) const SCOPES: &[&str] = &["openid", "email", "profile"];

/// Google user info, as returned by the userinfo endpoint.
///
/// Unrecognized fields are retained so the raw profile can be passed through
/// to clients verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl GoogleProfile {
    /// Adapter to the canonical profile fields.
    #[must_use]
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.picture.clone(),
        }
    }
}

/// Fetch the user's profile from the Google userinfo endpoint.
pub(super) async fn fetch_profile(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<GoogleProfile, OAuthError> {
    let profile = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<GoogleProfile>()
        .await?;

    Ok(profile)
}
