/// Tenant model and database operations
///
/// A tenant is an isolated organization namespace. Users and notes always
/// belong to exactly one tenant, and the tenant's slug is the value carried
/// in session tokens and URLs.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenants (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     slug VARCHAR(100) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     plan VARCHAR(20) NOT NULL DEFAULT 'free',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tenants_plan_check CHECK (plan IN ('free', 'pro'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notevault_shared::models::tenant::{Tenant, CreateTenant, TenantPlan};
/// use notevault_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let tenant = Tenant::create(&pool, CreateTenant {
///     slug: "acme".to_string(),
///     name: "Acme".to_string(),
///     plan: TenantPlan::Free,
/// }).await?;
///
/// // Upgrade plan (one-way)
/// Tenant::upgrade_to_pro(&pool, tenant.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Subscription plan
///
/// Plans bound how many notes a tenant may hold. The only transition is
/// `Free` → `Pro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantPlan {
    /// Free plan (at most 3 notes)
    Free,

    /// Pro plan (no note limit)
    Pro,
}

/// Error returned when a plan string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown plan: {0}")]
pub struct ParsePlanError(pub String);

impl TenantPlan {
    /// Converts plan to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPlan::Free => "free",
            TenantPlan::Pro => "pro",
        }
    }
}

impl FromStr for TenantPlan {
    type Err = ParsePlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(TenantPlan::Free),
            "pro" => Ok(TenantPlan::Pro),
            _ => Err(ParsePlanError(s.to_string())),
        }
    }
}

impl TryFrom<String> for TenantPlan {
    type Error = ParsePlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TenantPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant model representing an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    /// Internal tenant ID, never accepted from clients
    pub id: Uuid,

    /// Unique human-readable identifier used in URLs and token claims
    pub slug: String,

    /// Display name
    pub name: String,

    /// Current subscription plan
    #[sqlx(try_from = "String")]
    pub plan: TenantPlan,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for provisioning a new tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Unique slug
    pub slug: String,

    /// Display name
    pub name: String,

    /// Initial plan (defaults to Free)
    #[serde(default = "default_plan")]
    pub plan: TenantPlan,
}

fn default_plan() -> TenantPlan {
    TenantPlan::Free
}

const TENANT_COLUMNS: &str = "id, slug, name, plan, created_at, updated_at";

impl Tenant {
    /// Creates a new tenant
    ///
    /// # Errors
    ///
    /// Returns an error if the slug already exists or the database is unreachable
    pub async fn create(pool: &PgPool, data: CreateTenant) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (slug, name, plan) VALUES ($1, $2, $3) RETURNING {}",
            TENANT_COLUMNS
        );

        sqlx::query_as::<_, Tenant>(&query)
            .bind(data.slug)
            .bind(data.name)
            .bind(data.plan.as_str())
            .fetch_one(pool)
            .await
    }

    /// Finds a tenant by slug (exact match)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use notevault_shared::models::tenant::Tenant;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// if let Some(tenant) = Tenant::find_by_slug(&pool, "acme").await? {
    ///     println!("Found tenant {} on plan {}", tenant.slug, tenant.plan);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tenants WHERE slug = $1", TENANT_COLUMNS);

        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Finds a tenant by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS);

        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Moves a tenant to the pro plan
    ///
    /// Takes the tenant row lock, so it serializes with quota-checked note
    /// creation for the same tenant. Upgrading a pro tenant is a no-op that
    /// returns the current row.
    ///
    /// # Returns
    ///
    /// The updated tenant, or None if no tenant has this ID
    pub async fn upgrade_to_pro(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE tenants SET plan = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            TENANT_COLUMNS
        );

        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .bind(TenantPlan::Pro.as_str())
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_plan_as_str() {
        assert_eq!(TenantPlan::Free.as_str(), "free");
        assert_eq!(TenantPlan::Pro.as_str(), "pro");
    }

    #[test]
    fn test_tenant_plan_from_str() {
        assert_eq!("free".parse::<TenantPlan>(), Ok(TenantPlan::Free));
        assert_eq!("PRO".parse::<TenantPlan>(), Ok(TenantPlan::Pro));
        assert!("enterprise".parse::<TenantPlan>().is_err());
    }

    #[test]
    fn test_tenant_plan_serializes_lowercase() {
        let json = serde_json::to_string(&TenantPlan::Pro).unwrap();
        assert_eq!(json, "\"pro\"");
    }

    #[test]
    fn test_create_tenant_default_plan() {
        let create: CreateTenant =
            serde_json::from_str(r#"{"slug":"acme","name":"Acme"}"#).unwrap();
        assert_eq!(create.plan, TenantPlan::Free);
    }
}
