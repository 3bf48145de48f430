//! Session-stored types.
//!
//! [`SessionIdentity`] is the authenticated principal attached to a request.
//! It is not a [`crate::models::UserRecord`]: the store resolves it into one
//! via the canonical [`ProfileFields`] produced by the per-provider adapters.

use serde::{Deserialize, Serialize};

use bazaar_core::Provider;

use crate::oauth::discord::DiscordProfile;
use crate::oauth::facebook::FacebookProfile;
use crate::oauth::google::GoogleProfile;

/// Canonical identity fields, coalesced from a provider-shaped profile.
///
/// `id` is always present; the rest depend on what the provider returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// The logged-in principal, re-hydrated from the session on every request.
///
/// Tagged by provider so the set of profile shapes is exhaustive: `Local`
/// carries the fields captured at registration/login, the OAuth variants
/// carry the provider profile plus the access token from the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum SessionIdentity {
    Local {
        id: String,
        name: String,
        email: String,
    },
    Google {
        profile: GoogleProfile,
        access_token: String,
    },
    Facebook {
        profile: FacebookProfile,
        access_token: String,
    },
    Discord {
        profile: DiscordProfile,
        access_token: String,
    },
}

impl SessionIdentity {
    /// The provider tag of this identity.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        match self {
            Self::Local { .. } => Provider::Local,
            Self::Google { .. } => Provider::Google,
            Self::Facebook { .. } => Provider::Facebook,
            Self::Discord { .. } => Provider::Discord,
        }
    }

    /// Coalesce this identity into the canonical profile fields, using the
    /// adapter for the matching provider.
    #[must_use]
    pub fn fields(&self) -> ProfileFields {
        match self {
            Self::Local { id, name, email } => ProfileFields {
                id: id.clone(),
                name: Some(name.clone()),
                email: Some(email.clone()),
                avatar: None,
            },
            Self::Google { profile, .. } => profile.fields(),
            Self::Facebook { profile, .. } => profile.fields(),
            Self::Discord { profile, .. } => profile.fields(),
        }
    }

    /// The raw profile as received from the provider, for pass-through to
    /// clients. Local identities expose their stored fields.
    #[must_use]
    pub fn raw_profile(&self) -> serde_json::Value {
        match self {
            Self::Local { id, name, email } => serde_json::json!({
                "id": id,
                "name": name,
                "email": email,
            }),
            Self::Google { profile, .. } => {
                serde_json::to_value(profile).unwrap_or(serde_json::Value::Null)
            }
            Self::Facebook { profile, .. } => {
                serde_json::to_value(profile).unwrap_or(serde_json::Value::Null)
            }
            Self::Discord { profile, .. } => {
                serde_json::to_value(profile).unwrap_or(serde_json::Value::Null)
            }
        }
    }
}

/// CSRF state and PKCE verifier parked in the session between the authorize
/// redirect and the provider callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOAuth {
    pub provider: Provider,
    pub state: String,
    pub pkce_verifier: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in identity.
    pub const IDENTITY: &str = "identity";

    /// Key for the in-flight OAuth handshake state.
    pub const PENDING_OAUTH: &str = "oauth.pending";
}
