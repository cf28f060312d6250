/// User model and database operations
///
/// Every user belongs to exactly one tenant and holds one of two roles.
/// Passwords are stored as Argon2id hashes and never serialized.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(320) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(20) NOT NULL DEFAULT 'member',
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email),
///     CONSTRAINT users_role_check CHECK (role IN ('admin', 'member'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notevault_shared::models::user::{User, CreateUser, UserRole};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, tenant_id: Uuid) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@acme.test".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Member,
///     tenant_id,
/// }).await?;
///
/// let login = User::find_login_by_email(&pool, "user@acme.test").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Privilege level of a user within their tenant
///
/// Role strings are compared case-insensitively when parsed and are stored
/// and serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserRole {
    /// Can manage the tenant (upgrade plan, invite users)
    Admin,

    /// Can work with the tenant's notes
    Member,
}

/// Error returned when a role string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl UserRole {
    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address (unique, matched exactly)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role within the owning tenant
    #[sqlx(try_from = "String")]
    pub role: UserRole,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// User row joined with the owning tenant's slug
///
/// This is what the login flow needs: the stored hash to verify against and
/// the slug to put into the session token.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserLogin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub tenant_slug: String,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Role within the tenant
    pub role: UserRole,

    /// Owning tenant
    pub tenant_id: Uuid,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a database error carrying the `users_email_key` constraint when
    /// the email already exists
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role, tenant_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, tenant_id, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role.as_str())
        .bind(data.tenant_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by exact email, joined with the tenant slug
    pub async fn find_login_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserLogin>, sqlx::Error> {
        sqlx::query_as::<_, UserLogin>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.role, t.slug AS tenant_slug
            FROM users u
            JOIN tenants t ON t.id = u.tenant_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, tenant_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
