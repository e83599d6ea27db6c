//! # Todolane Shared Library
//!
//! This crate contains the types and business logic shared between the
//! Todolane API server and its integration tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, todos) and statistics queries
//! - `auth`: Password hashing and session-token utilities
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Todolane shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
