/// Persistence port for tenants, users, and notes
///
/// Request handling never talks to a database directly; it goes through the
/// [`NoteStore`] trait. Two adapters are provided:
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::MemoryStore`]: in-process maps behind one lock (tests, local dev)
///
/// # Atomicity
///
/// [`NoteStore::create_note`] must apply the plan quota and insert the note as
/// a single step with respect to other creations for the same tenant. The
/// Postgres adapter does this with a transaction holding the tenant row lock;
/// the memory adapter holds its write lock across count and insert.
///
/// # Tenant Scoping
///
/// Every note operation takes the caller's tenant ID. Adapters must treat a
/// note that exists under a different tenant exactly like a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::note::{CreateNote, Note, QuotaInsert, UpdateNote};
use crate::models::tenant::{CreateTenant, Tenant};
use crate::models::user::{CreateUser, User, UserLogin};

pub mod memory;
pub mod postgres;

/// Errors raised by store adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this email already exists
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// A tenant with this slug already exists
    #[error("Tenant slug already exists: {0}")]
    DuplicateSlug(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations used by the service
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Verifies the backing store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Provisions a tenant
    async fn create_tenant(&self, data: CreateTenant) -> Result<Tenant, StoreError>;

    /// Finds a tenant by its slug (exact match)
    async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError>;

    /// Moves a tenant to the pro plan; None if the tenant doesn't exist
    async fn upgrade_tenant(&self, tenant_id: Uuid) -> Result<Option<Tenant>, StoreError>;

    /// Creates a user
    ///
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Looks a user up by exact email, together with the tenant slug
    async fn find_login_by_email(&self, email: &str) -> Result<Option<UserLogin>, StoreError>;

    /// Counts the notes held by a tenant
    async fn count_notes(&self, tenant_id: Uuid) -> Result<u64, StoreError>;

    /// Atomically checks the tenant's quota and inserts the note
    async fn create_note(&self, data: CreateNote) -> Result<QuotaInsert, StoreError>;

    /// Lists a tenant's notes, newest first
    async fn list_notes(&self, tenant_id: Uuid) -> Result<Vec<Note>, StoreError>;

    /// Finds one of the tenant's notes
    async fn find_note(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Note>, StoreError>;

    /// Merges changes into one of the tenant's notes
    async fn update_note(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Note>, StoreError>;

    /// Deletes one of the tenant's notes; false if there was nothing to delete
    async fn delete_note(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}
