//! Facebook OAuth endpoints and profile shape.

use serde::{Deserialize, Serialize};

use crate::models::ProfileFields;

use super::OAuthError;

pub(super) const AUTH_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
pub(super) const TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
pub(super) const USERINFO_URL: &str = "https://graph.facebook.com/me";
pub(super) const SCOPES: &[&str] = &["email", "public_profile"];

/// Fields requested from the Graph API `/me` endpoint.
const PROFILE_FIELDS: &str = "id,name,email,picture";

/// Facebook user info, as returned by the Graph API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<FacebookPicture>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// The Graph API nests the avatar URL under `picture.data.url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookPicture {
    pub data: FacebookPictureData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookPictureData {
    pub url: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl FacebookProfile {
    /// Adapter to the canonical profile fields.
    #[must_use]
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self
                .picture
                .as_ref()
                .and_then(|picture| picture.data.url.clone()),
        }
    }
}

/// Fetch the user's profile from the Graph API.
pub(super) async fn fetch_profile(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<FacebookProfile, OAuthError> {
    let profile = http
        .get(USERINFO_URL)
        .query(&[("fields", PROFILE_FIELDS)])
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<FacebookProfile>()
        .await?;

    Ok(profile)
}
