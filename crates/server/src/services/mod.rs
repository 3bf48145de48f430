//! Business logic services.
//!
//! - `auth` - Local registration and login (Argon2id password hashing)

pub mod auth;
