/// Tenant-scoped note repository
///
/// CRUD over notes for one tenant at a time. Every method takes the caller's
/// resolved tenant ID; a note belonging to another tenant is reported as
/// [`NoteError::NotFound`], never as a permission error, so callers can't
/// discover which IDs exist in other tenants.
///
/// # Example
///
/// ```no_run
/// use notevault_shared::notes::{NewNote, NoteRepository};
/// use notevault_shared::store::NoteStore;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example(store: Arc<dyn NoteStore>, tenant_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let notes = NoteRepository::new(store);
///
/// let note = notes
///     .create(tenant_id, user_id, NewNote { title: "Groceries".into(), content: None })
///     .await?;
/// assert_eq!(note.content, "");
///
/// notes.delete(tenant_id, note.id).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use uuid::Uuid;

use crate::models::note::{CreateNote, Note, QuotaInsert, UpdateNote};
use crate::quota::QuotaError;
use crate::store::{NoteStore, StoreError};

/// Error type for note operations
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// Bad input
    #[error("{0}")]
    Validation(String),

    /// No such note in the caller's tenant
    #[error("Note not found")]
    NotFound,

    /// Tenant at its plan's note limit
    #[error(transparent)]
    Quota(#[from] QuotaError),

    /// Tenant vanished between resolution and insert
    #[error("Tenant not found")]
    TenantNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for a new note
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    pub title: String,
    /// Defaults to an empty body
    pub content: Option<String>,
}

/// Note CRUD scoped to a tenant
#[derive(Clone)]
pub struct NoteRepository {
    store: Arc<dyn NoteStore>,
}

impl NoteRepository {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Creates a note, applying the tenant's plan quota atomically
    ///
    /// # Errors
    ///
    /// - `NoteError::Validation` if the title is empty or whitespace
    /// - `NoteError::Quota` if the tenant is at its note limit
    /// - `NoteError::TenantNotFound` if the tenant doesn't exist
    pub async fn create(&self, tenant_id: Uuid, owner_id: Uuid, note: NewNote) -> Result<Note, NoteError> {
        if note.title.trim().is_empty() {
            return Err(NoteError::Validation("Title is required".to_string()));
        }

        let data = CreateNote {
            tenant_id,
            owner_id,
            title: note.title,
            content: note.content.unwrap_or_default(),
        };

        match self.store.create_note(data).await? {
            QuotaInsert::Created(note) => {
                tracing::debug!(note_id = %note.id, tenant_id = %tenant_id, "Note created");
                Ok(note)
            }
            QuotaInsert::LimitReached { plan, limit, current } => {
                tracing::info!(tenant_id = %tenant_id, %plan, limit, "Note quota reached");
                Err(QuotaError::LimitExceeded { plan, limit, current }.into())
            }
            QuotaInsert::TenantMissing => Err(NoteError::TenantNotFound),
        }
    }

    /// Lists the tenant's notes, newest first
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Note>, NoteError> {
        Ok(self.store.list_notes(tenant_id).await?)
    }

    /// Fetches one note
    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Note, NoteError> {
        self.store
            .find_note(tenant_id, id)
            .await?
            .ok_or(NoteError::NotFound)
    }

    /// Merges changes into a note
    ///
    /// Absent or empty fields keep their stored values.
    pub async fn update(&self, tenant_id: Uuid, id: Uuid, changes: UpdateNote) -> Result<Note, NoteError> {
        let changes = UpdateNote {
            title: changes.title.filter(|t| !t.is_empty()),
            content: changes.content.filter(|c| !c.is_empty()),
        };

        self.store
            .update_note(tenant_id, id, changes)
            .await?
            .ok_or(NoteError::NotFound)
    }

    /// Deletes a note; deleting it again is `NotFound`
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), NoteError> {
        if self.store.delete_note(tenant_id, id).await? {
            Ok(())
        } else {
            Err(NoteError::NotFound)
        }
    }
}
