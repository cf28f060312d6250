//! # NoteVault Shared Library
//!
//! This crate contains the domain types and business logic of the NoteVault
//! multi-tenant notes service. The HTTP server in `notevault-api` is a thin
//! layer over it.
//!
//! ## Module Organization
//!
//! - `auth`: Credentials, session tokens, request authentication, authorization policy
//! - `tenancy`: Tenant slug resolution
//! - `quota`: Plan-based note limits
//! - `notes`: Tenant-scoped note repository
//! - `store`: Persistence port with PostgreSQL and in-memory adapters
//! - `models`: Database models and data structures
//! - `db`: Connection pool and migrations
//! - `provision`: Demo tenant seeding

pub mod auth;
pub mod db;
pub mod models;
pub mod notes;
pub mod provision;
pub mod quota;
pub mod store;
pub mod tenancy;

/// Current version of the NoteVault shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
