/// Note model and tenant-scoped database operations
///
/// Every query in this module takes the caller's tenant ID and filters on it,
/// so a note ID that belongs to another tenant behaves exactly like a missing
/// one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     content TEXT NOT NULL DEFAULT '',
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::tenant::TenantPlan;
use crate::quota::QuotaLimits;

/// A note owned by a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Title (never empty)
    pub title: String,

    /// Body text
    pub content: String,

    /// Owning tenant, fixed at creation
    pub tenant_id: Uuid,

    /// User who created the note (informational only)
    pub owner_id: Uuid,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNote {
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Fields to change on an existing note
///
/// `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Outcome of a quota-checked insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaInsert {
    /// The note was stored
    Created(Note),

    /// The tenant already holds as many notes as its plan allows
    LimitReached {
        plan: TenantPlan,
        limit: u64,
        current: u64,
    },

    /// No tenant with the given ID exists
    TenantMissing,
}

const NOTE_COLUMNS: &str = "id, title, content, tenant_id, owner_id, created_at, updated_at";

impl Note {
    /// Inserts a note if the tenant's plan allows another one
    ///
    /// The tenant row is locked (`SELECT ... FOR UPDATE`) for the duration of
    /// the transaction, so concurrent creations for the same tenant run the
    /// count and the insert one at a time and a free tenant can never exceed
    /// its limit. Plan upgrades take the same row lock.
    pub async fn create_within_quota(
        pool: &PgPool,
        data: CreateNote,
    ) -> Result<QuotaInsert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let plan: Option<String> =
            sqlx::query_scalar("SELECT plan FROM tenants WHERE id = $1 FOR UPDATE")
                .bind(data.tenant_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(plan) = plan else {
            tx.rollback().await?;
            return Ok(QuotaInsert::TenantMissing);
        };

        let plan: TenantPlan = plan
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let current: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE tenant_id = $1")
            .bind(data.tenant_id)
            .fetch_one(&mut *tx)
            .await?;
        let current = current.max(0) as u64;

        let check = QuotaLimits::for_plan(plan).check(current);
        if !check.allowed {
            tx.rollback().await?;
            debug!(tenant_id = %data.tenant_id, current, "Note quota reached");
            return Ok(QuotaInsert::LimitReached {
                plan,
                limit: check.limit.unwrap_or(current),
                current,
            });
        }

        let query = format!(
            "INSERT INTO notes (title, content, tenant_id, owner_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&query)
            .bind(data.title)
            .bind(data.content)
            .bind(data.tenant_id)
            .bind(data.owner_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(QuotaInsert::Created(note))
    }

    /// Lists a tenant's notes, newest first
    pub async fn list_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM notes WHERE tenant_id = $1 ORDER BY created_at DESC, id DESC",
            NOTE_COLUMNS
        );

        sqlx::query_as::<_, Note>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Finds a note within a tenant
    pub async fn find_in_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM notes WHERE id = $1 AND tenant_id = $2",
            NOTE_COLUMNS
        );

        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Updates a note within a tenant
    ///
    /// Absent or empty fields keep their stored value.
    ///
    /// # Returns
    ///
    /// The updated note, or None if the tenant has no note with this ID
    pub async fn update_in_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE notes
            SET title = COALESCE(NULLIF($3, ''), title),
                content = COALESCE(NULLIF($4, ''), content),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING {}
            "#,
            NOTE_COLUMNS
        );

        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(data.title)
            .bind(data.content)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a note within a tenant
    ///
    /// # Returns
    ///
    /// True if a note was deleted, false if the tenant has no note with this ID
    pub async fn delete_in_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts a tenant's notes
    pub async fn count_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<u64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
