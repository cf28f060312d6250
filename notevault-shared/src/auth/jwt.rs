/// Session token issuance and validation
///
/// Sessions are stateless HS256 JWTs binding a user ID, role, and tenant
/// slug. Every token expires exactly [`SESSION_TTL_HOURS`] hours after it is
/// issued; there is no server-side session store and no revocation, so a
/// token stays valid for its whole lifetime even if the user's role or tenant
/// changes. Logout is client-side.
///
/// # Secret Management
///
/// The signing key is never a compile-time constant. [`TokenService`] is built
/// from a [`SecretProvider`], which the server constructs from configuration.
///
/// # Example
///
/// ```
/// use notevault_shared::auth::jwt::{StaticSecret, TokenService};
/// use notevault_shared::models::user::UserRole;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(Arc::new(StaticSecret::new("a-secret-of-at-least-32-bytes!!!")));
///
/// let user_id = Uuid::new_v4();
/// let token = tokens.issue(user_id, UserRole::Admin, "acme")?;
///
/// let claims = tokens.validate(&token)?;
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.tenant, "acme");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::user::UserRole;

/// Lifetime of a session token
pub const SESSION_TTL_HOURS: i64 = 8;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Bad signature, bad structure, or bad claims
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Source of the key used to sign and verify session tokens
pub trait SecretProvider: Send + Sync {
    /// Raw HMAC key bytes
    fn signing_secret(&self) -> &[u8];
}

/// A secret held in memory, typically loaded from configuration
#[derive(Clone)]
pub struct StaticSecret(Vec<u8>);

impl StaticSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().into_bytes())
    }
}

impl SecretProvider for StaticSecret {
    fn signing_secret(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticSecret(**redacted**)")
    }
}

/// Claims carried by a session token
///
/// Derived from the user and tenant at issue time; they go stale if either
/// changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Role at issue time
    pub role: UserRole,

    /// Tenant slug
    pub tenant: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp), always `iat` + 8 hours
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims issued at `now`
    pub fn new(user_id: Uuid, role: UserRole, tenant_slug: impl Into<String>, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();

        Self {
            sub: user_id,
            role,
            tenant: tenant_slug.into(),
            iat,
            exp: iat + Duration::hours(SESSION_TTL_HOURS).num_seconds(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<dyn SecretProvider>,
}

impl TokenService {
    /// Creates a token service signing with the provided secret
    pub fn new(secret: Arc<dyn SecretProvider>) -> Self {
        Self { secret }
    }

    /// Issues a token for the user, valid for 8 hours from now
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if encoding fails
    pub fn issue(&self, user_id: Uuid, role: UserRole, tenant_slug: &str) -> Result<String, JwtError> {
        self.issue_at(user_id, role, tenant_slug, Utc::now())
    }

    /// Issues a token as if it were `now`
    pub fn issue_at(
        &self,
        user_id: Uuid,
        role: UserRole,
        tenant_slug: &str,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = SessionClaims::new(user_id, role, tenant_slug, now);
        self.sign(&claims)
    }

    /// Signs arbitrary claims with HS256
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        let key = EncodingKey::from_secret(self.secret.signing_secret());

        encode(&Header::new(Algorithm::HS256), claims, &key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token and extracts its claims
    ///
    /// Checks the signature, the structure, and the expiry (with no clock
    /// leeway).
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for an elapsed token and `JwtError::Invalid`
    /// for anything else
    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let key = DecodingKey::from_secret(self.secret.signing_secret());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            }
        })?;

        let claims = token_data.claims;

        // jsonwebtoken accepts a token in its final second; close that gap
        if claims.is_expired() {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
