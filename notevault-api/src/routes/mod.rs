/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login
/// - `notes`: Tenant-scoped note CRUD
/// - `tenants`: Plan upgrade and user invitation (admin only)

pub mod auth;
pub mod health;
pub mod notes;
pub mod tenants;
