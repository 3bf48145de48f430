//! Identity provider tag.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown provider name.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown identity provider: {0}")]
pub struct ProviderParseError(pub String);

/// The source of an authenticated identity.
///
/// `Local` is email+password signup; the rest are OAuth providers whose
/// handshake is delegated to the `oauth2` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Local,
    Google,
    Facebook,
    Discord,
}

impl Provider {
    /// All OAuth providers (everything except `Local`).
    pub const OAUTH: [Self; 3] = [Self::Google, Self::Facebook, Self::Discord];

    /// The lowercase wire name of this provider, as used in route paths and
    /// the persisted session identity tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Discord => "discord",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "google" => Ok(Self::Google),
            "facebook" => Ok(Self::Facebook),
            "discord" => Ok(Self::Discord),
            other => Err(ProviderParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_round_trips_through_from_str() {
        for provider in [
            Provider::Local,
            Provider::Google,
            Provider::Facebook,
            Provider::Discord,
        ] {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("github".parse::<Provider>().is_err());
        assert!("".parse::<Provider>().is_err());
        assert!("Google".parse::<Provider>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Provider::Discord).unwrap();
        assert_eq!(json, "\"discord\"");

        let parsed: Provider = serde_json::from_str("\"facebook\"").unwrap();
        assert_eq!(parsed, Provider::Facebook);
    }

    #[test]
    fn test_oauth_list_excludes_local() {
        assert!(!Provider::OAUTH.contains(&Provider::Local));
        assert_eq!(Provider::OAUTH.len(), 3);
    }
}
