//! Discord OAuth endpoints and profile shape.

use serde::{Deserialize, Serialize};

use crate::models::ProfileFields;

use super::OAuthError;

pub(super) const AUTH_URL: &str = "https://discord.com/api/oauth2/authorize";
pub(super) const TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
pub(super) const USERINFO_URL: &str = "https://discord.com/api/users/@me";
pub(super) const SCOPES: &[&str] = &["identify", "email"];

/// Base URL of the Discord CDN, used to synthesize avatar URLs.
const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Discord user info, as returned by `/users/@me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: Option<String>,
    pub global_name: Option<String>,
    pub email: Option<String>,
    /// Avatar hash; the CDN URL is derived from it.
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl DiscordProfile {
    /// Display name: the user-facing `global_name`, falling back to the
    /// unique `username`.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.global_name.clone().or_else(|| self.username.clone())
    }

    /// Full CDN URL of the user's avatar, if they have one.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("{CDN_BASE}/avatars/{}/{hash}.png", self.id))
    }

    /// Adapter to the canonical profile fields.
    #[must_use]
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            id: self.id.clone(),
            name: self.display_name(),
            email: self.email.clone(),
            avatar: self.avatar_url(),
        }
    }
}

/// Fetch the user's profile from the Discord API.
pub(super) async fn fetch_profile(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<DiscordProfile, OAuthError> {
    let profile = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<DiscordProfile>()
        .await?;

    Ok(profile)
}
