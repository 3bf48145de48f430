//! Persistence for the shop: one flat JSON file.
//!
//! The whole store is an array of [`crate::models::UserRecord`] that is loaded
//! and rewritten wholesale on every mutation - no partial updates, no indexing.
//! An in-process mutex serializes every read-modify-write cycle so concurrent
//! requests cannot interleave between the load and the rewrite.

pub mod users;

pub use users::UserStore;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file does not contain a valid user array.
    #[error("corrupt user store: {0}")]
    Json(#[from] serde_json::Error),

    /// A uniqueness invariant would be violated.
    #[error("conflict: {0}")]
    Conflict(String),
}
