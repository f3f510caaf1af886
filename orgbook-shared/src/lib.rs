//! # Orgbook Shared Library
//!
//! This crate contains the types and business logic shared by the Orgbook
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, organisations, memberships)
//! - `auth`: Password hashing, JWT tokens, request identity, access policy
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Orgbook shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
