//! The flat-file user store.
//!
//! Every operation takes the store mutex, loads the full array from disk,
//! mutates it in place, and writes the whole array back pretty-printed.

use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::Mutex;

use super::StoreError;
use crate::models::{ProfileFields, UserRecord};

/// Prefix of generated order identifiers.
const ORDER_ID_PREFIX: &str = "ORD-";

/// Display name used when a provider profile has no usable name field.
const DEFAULT_DISPLAY_NAME: &str = "User";

/// Store for user records backed by a single JSON file.
///
/// The mutex guards the full read-modify-write cycle of each operation, so
/// two concurrent registrations with the same email cannot both pass the
/// uniqueness check, and concurrent cart writes cannot lose updates.
pub struct UserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl UserStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file or its parent directory cannot be
    /// created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the full user array from disk.
    ///
    /// An empty file is treated as an empty store.
    async fn load(&self) -> Result<Vec<UserRecord>, StoreError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Rewrite the full user array to disk, pretty-printed.
    async fn persist(&self, users: &[UserRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(users)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Find a record by exact email match.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Create a record for a local signup with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a record with this email already
    /// exists. The uniqueness check and the write happen under one lock.
    pub async fn create_local(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;

        if users.iter().any(|u| !u.email.is_empty() && u.email == email) {
            return Err(StoreError::Conflict("email already registered".to_owned()));
        }

        let record = UserRecord {
            id: Utc::now().timestamp_millis().to_string(),
            name: name.to_owned(),
            email: email.to_owned(),
            password: password_hash.to_owned(),
            cart: Vec::new(),
        };
        users.push(record.clone());
        self.persist(&users).await?;

        Ok(record)
    }

    /// Resolve an identity to its record, creating one on first sight.
    ///
    /// Matches first by email (when the identity has a non-empty one), then
    /// by id. A synthesized record gets the identity's name (or "User"), its
    /// email if any, no password, and an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or rewritten.
    pub async fn get_or_create(&self, fields: &ProfileFields) -> Result<UserRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;

        let (record, created) = Self::resolve_mut(&mut users, fields);
        let record = record.clone();
        if created {
            self.persist(&users).await?;
        }

        Ok(record)
    }

    /// The cart of the resolved record (empty for a freshly-created one).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or rewritten.
    pub async fn cart(&self, fields: &ProfileFields) -> Result<Vec<serde_json::Value>, StoreError> {
        self.get_or_create(fields).await.map(|record| record.cart)
    }

    /// Overwrite the resolved record's cart unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or rewritten.
    pub async fn replace_cart(
        &self,
        fields: &ProfileFields,
        cart: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;

        let (record, _) = Self::resolve_mut(&mut users, fields);
        record.cart = cart;
        let cart = record.cart.clone();
        self.persist(&users).await?;

        Ok(cart)
    }

    /// Clear the resolved record's cart and return a fresh order id, or
    /// `None` when the cart is empty (nothing to check out).
    ///
    /// No order record is retained - the id is the only artifact.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or rewritten.
    pub async fn checkout(&self, fields: &ProfileFields) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;

        let (record, created) = Self::resolve_mut(&mut users, fields);
        if record.cart.is_empty() {
            // First access may still have created the record.
            if created {
                self.persist(&users).await?;
            }
            return Ok(None);
        }

        record.cart.clear();
        let order_id = format!("{ORDER_ID_PREFIX}{}", Utc::now().timestamp_millis());
        self.persist(&users).await?;

        Ok(Some(order_id))
    }

    /// Locate the record matching `fields`, pushing a synthesized one when
    /// nothing matches. Returns the record and whether it was created.
    fn resolve_mut<'a>(
        users: &'a mut Vec<UserRecord>,
        fields: &ProfileFields,
    ) -> (&'a mut UserRecord, bool) {
        let by_email = fields
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .and_then(|email| users.iter().position(|u| u.email == email));
        let index = by_email.or_else(|| users.iter().position(|u| u.id == fields.id));

        match index {
            Some(index) => {
                let record = users.get_mut(index).expect("index came from position");
                (record, false)
            }
            None => {
                users.push(UserRecord {
                    id: fields.id.clone(),
                    name: fields
                        .name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_owned()),
                    email: fields.email.clone().unwrap_or_default(),
                    password: String::new(),
                    cart: Vec::new(),
                });
                let record = users.last_mut().expect("record was just pushed");
                (record, true)
            }
        }
    }
}
