/// In-memory store adapter
///
/// Keeps tenants, users, and notes in maps behind a single `RwLock`. Every
/// mutating operation holds the write lock for its whole duration, which is
/// what makes the quota-checked insert atomic here.
///
/// Used by the test suites and for running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NoteStore, StoreError};
use crate::models::note::{CreateNote, Note, QuotaInsert, UpdateNote};
use crate::models::tenant::{CreateTenant, Tenant, TenantPlan};
use crate::models::user::{CreateUser, User, UserLogin};
use crate::quota::QuotaLimits;

#[derive(Debug, Default)]
struct MemoryState {
    tenants: HashMap<Uuid, Tenant>,
    users: HashMap<Uuid, User>,
    /// Insertion order, oldest first
    notes: Vec<Note>,
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_tenant(&self, data: CreateTenant) -> Result<Tenant, StoreError> {
        let mut state = self.state.write().await;

        if state.tenants.values().any(|t| t.slug == data.slug) {
            return Err(StoreError::DuplicateSlug(data.slug));
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            slug: data.slug,
            name: data.name,
            plan: data.plan,
            created_at: now,
            updated_at: now,
        };
        state.tenants.insert(tenant.id, tenant.clone());

        Ok(tenant)
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        let state = self.state.read().await;
        Ok(state.tenants.values().find(|t| t.slug == slug).cloned())
    }

    async fn upgrade_tenant(&self, tenant_id: Uuid) -> Result<Option<Tenant>, StoreError> {
        let mut state = self.state.write().await;

        Ok(state.tenants.get_mut(&tenant_id).map(|tenant| {
            tenant.plan = TenantPlan::Pro;
            tenant.updated_at = Utc::now();
            tenant.clone()
        }))
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::DuplicateEmail(data.email));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            tenant_id: data.tenant_id,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_login_by_email(&self, email: &str) -> Result<Option<UserLogin>, StoreError> {
        let state = self.state.read().await;

        let login = state.users.values().find(|u| u.email == email).and_then(|user| {
            state.tenants.get(&user.tenant_id).map(|tenant| UserLogin {
                id: user.id,
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                role: user.role,
                tenant_slug: tenant.slug.clone(),
            })
        });

        Ok(login)
    }

    async fn count_notes(&self, tenant_id: Uuid) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.notes.iter().filter(|n| n.tenant_id == tenant_id).count() as u64)
    }

    async fn create_note(&self, data: CreateNote) -> Result<QuotaInsert, StoreError> {
        let mut state = self.state.write().await;

        let Some(plan) = state.tenants.get(&data.tenant_id).map(|t| t.plan) else {
            return Ok(QuotaInsert::TenantMissing);
        };

        let current = state
            .notes
            .iter()
            .filter(|n| n.tenant_id == data.tenant_id)
            .count() as u64;

        let check = QuotaLimits::for_plan(plan).check(current);
        if !check.allowed {
            return Ok(QuotaInsert::LimitReached {
                plan,
                limit: check.limit.unwrap_or(current),
                current,
            });
        }

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: data.title,
            content: data.content,
            tenant_id: data.tenant_id,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        state.notes.push(note.clone());

        Ok(QuotaInsert::Created(note))
    }

    async fn list_notes(&self, tenant_id: Uuid) -> Result<Vec<Note>, StoreError> {
        let state = self.state.read().await;

        // Newest insert first; the stable sort keeps that order among equal timestamps
        let mut notes: Vec<Note> = state
            .notes
            .iter()
            .rev()
            .filter(|n| n.tenant_id == tenant_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(notes)
    }

    async fn find_note(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Note>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .notes
            .iter()
            .find(|n| n.id == id && n.tenant_id == tenant_id)
            .cloned())
    }

    async fn update_note(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Note>, StoreError> {
        let mut state = self.state.write().await;

        let Some(note) = state
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.tenant_id == tenant_id)
        else {
            return Ok(None);
        };

        if let Some(title) = non_empty(data.title) {
            note.title = title;
        }
        if let Some(content) = non_empty(data.content) {
            note.content = content;
        }
        note.updated_at = Utc::now();

        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        let before = state.notes.len();
        state
            .notes
            .retain(|n| !(n.id == id && n.tenant_id == tenant_id));

        Ok(state.notes.len() < before)
    }
}
