//! # Stockroom Shared Library
//!
//! This crate contains the models, database layer, and business logic shared
//! by the Stockroom API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their typed queries
//! - `db`: Connection pooling, migrations, and seed data
//! - `auth`: Identity resolution, authorization policy, and the mock token
//! - `service`: Task lifecycle and account services
//! - `error`: The service-level error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

/// Current version of the Stockroom shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
