/// PostgreSQL store adapter
///
/// Thin wrapper that delegates to the model methods and maps unique
/// constraint violations onto [`StoreError`] variants.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NoteStore, StoreError};
use crate::db::pool::health_check;
use crate::models::note::{CreateNote, Note, QuotaInsert, UpdateNote};
use crate::models::tenant::{CreateTenant, Tenant};
use crate::models::user::{CreateUser, User, UserLogin};

const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";
const TENANTS_SLUG_CONSTRAINT: &str = "tenants_slug_key";

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_tenant(&self, data: CreateTenant) -> Result<Tenant, StoreError> {
        let slug = data.slug.clone();
        Tenant::create(&self.pool, data).await.map_err(|e| {
            if violated_constraint(&e) == Some(TENANTS_SLUG_CONSTRAINT) {
                StoreError::DuplicateSlug(slug)
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(Tenant::find_by_slug(&self.pool, slug).await?)
    }

    async fn upgrade_tenant(&self, tenant_id: Uuid) -> Result<Option<Tenant>, StoreError> {
        Ok(Tenant::upgrade_to_pro(&self.pool, tenant_id).await?)
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let email = data.email.clone();
        User::create(&self.pool, data).await.map_err(|e| {
            if violated_constraint(&e) == Some(USERS_EMAIL_CONSTRAINT) {
                StoreError::DuplicateEmail(email)
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_login_by_email(&self, email: &str) -> Result<Option<UserLogin>, StoreError> {
        Ok(User::find_login_by_email(&self.pool, email).await?)
    }

    async fn count_notes(&self, tenant_id: Uuid) -> Result<u64, StoreError> {
        Ok(Note::count_for_tenant(&self.pool, tenant_id).await?)
    }

    async fn create_note(&self, data: CreateNote) -> Result<QuotaInsert, StoreError> {
        Ok(Note::create_within_quota(&self.pool, data).await?)
    }

    async fn list_notes(&self, tenant_id: Uuid) -> Result<Vec<Note>, StoreError> {
        Ok(Note::list_for_tenant(&self.pool, tenant_id).await?)
    }

    async fn find_note(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Note>, StoreError> {
        Ok(Note::find_in_tenant(&self.pool, tenant_id, id).await?)
    }

    async fn update_note(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Note>, StoreError> {
        Ok(Note::update_in_tenant(&self.pool, tenant_id, id, data).await?)
    }

    async fn delete_note(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        Ok(Note::delete_in_tenant(&self.pool, tenant_id, id).await?)
    }
}
