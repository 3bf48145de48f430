//! User record types.
//!
//! [`UserRecord`] is the persisted shape: one element of the JSON array that
//! makes up the whole user store.

use serde::{Deserialize, Serialize};

/// A persisted user.
///
/// Keyed primarily by `email`; `id` is the secondary match key (an OAuth
/// provider profile id, or a millisecond-timestamp string for local signups).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address; empty when the provider did not supply one.
    #[serde(default)]
    pub email: String,
    /// Argon2id password hash; empty for OAuth-created records.
    #[serde(default)]
    pub password: String,
    /// Cart contents, persisted verbatim - items are opaque to the server.
    #[serde(default)]
    pub cart: Vec<serde_json::Value>,
}

impl UserRecord {
    /// The client-facing projection of this record.
    ///
    /// The password hash never leaves the server.
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// A user as returned by the register/login endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}
