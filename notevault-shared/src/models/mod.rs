/// Database models for NoteVault
///
/// This module contains the persisted records and their SQL operations.
///
/// # Models
///
/// - `tenant`: Organizations and their subscription plan
/// - `user`: Accounts, each belonging to one tenant with one role
/// - `note`: Tenant-scoped notes, including the quota-checked insert
///
/// # Example
///
/// ```no_run
/// use notevault_shared::models::tenant::Tenant;
/// use notevault_shared::models::note::Note;
/// use notevault_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// if let Some(tenant) = Tenant::find_by_slug(&pool, "acme").await? {
///     let notes = Note::list_for_tenant(&pool, tenant.id).await?;
///     println!("{} notes", notes.len());
/// }
/// # Ok(())
/// # }
/// ```

pub mod note;
pub mod tenant;
pub mod user;
