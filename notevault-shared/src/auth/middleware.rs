/// Request authentication gate
///
/// Turns the raw `Authorization` header of a request into an
/// [`IdentityContext`]. The HTTP layer calls [`authenticate`] once per request
/// and stores the result in the request extensions; nothing is cached between
/// requests.
///
/// # Header Format
///
/// Exactly two whitespace-separated parts: the scheme `Bearer` (any case) and
/// the session token.
///
/// # Example
///
/// ```
/// use notevault_shared::auth::jwt::{StaticSecret, TokenService};
/// use notevault_shared::auth::middleware::{authenticate, AuthError};
/// use notevault_shared::models::user::UserRole;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(Arc::new(StaticSecret::new("a-secret-of-at-least-32-bytes!!!")));
/// let token = tokens.issue(Uuid::new_v4(), UserRole::Member, "acme")?;
///
/// let identity = authenticate(Some(&format!("Bearer {}", token)), &tokens)?;
/// assert_eq!(identity.tenant_slug, "acme");
///
/// assert!(matches!(authenticate(None, &tokens), Err(AuthError::MissingAuthorization)));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{JwtError, SessionClaims, TokenService};
use crate::models::user::UserRole;

/// Authenticated identity for the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the session token
    pub role: UserRole,

    /// Slug of the user's tenant
    pub tenant_slug: String,
}

impl From<SessionClaims> for IdentityContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            tenant_slug: claims.tenant,
        }
    }
}

/// Error type for the authentication gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("Missing authorization header")]
    MissingAuthorization,

    /// Header present but not `Bearer <token>`
    #[error("Malformed authorization header")]
    MalformedAuthorizationHeader,

    /// Token rejected by the validator
    #[error("Invalid token")]
    InvalidToken(#[source] JwtError),
}

/// Authenticates a request from its Authorization header value
///
/// # Errors
///
/// - `AuthError::MissingAuthorization` if `header` is `None`
/// - `AuthError::MalformedAuthorizationHeader` for any shape other than
///   `Bearer <token>`
/// - `AuthError::InvalidToken` if the token fails validation
pub fn authenticate(header: Option<&str>, tokens: &TokenService) -> Result<IdentityContext, AuthError> {
    let header = header.ok_or(AuthError::MissingAuthorization)?;
    let token = bearer_token(header)?;

    let claims = tokens.validate(token).map_err(AuthError::InvalidToken)?;

    Ok(claims.into())
}

fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedAuthorizationHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::StaticSecret;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn tokens() -> TokenService {
        TokenService::new(Arc::new(StaticSecret::new("test-secret-key-at-least-32-bytes-long")))
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            authenticate(None, &tokens()),
            Err(AuthError::MissingAuthorization)
        ));
    }

    #[test]
    fn test_malformed_headers() {
        let tokens = tokens();

        for header in ["", "Bearer", "Bearer ", "Bearer a b", "token-only", "Basic abc", "Bearer  a  b  c"] {
            assert!(
                matches!(
                    authenticate(Some(header), &tokens),
                    Err(AuthError::MalformedAuthorizationHeader)
                ),
                "header {:?} should be malformed",
                header
            );
        }
    }

    #[test]
    fn test_valid_token_yields_identity() {
        let tokens = tokens();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id, UserRole::Admin, "acme").unwrap();

        let identity = authenticate(Some(&format!("Bearer {}", token)), &tokens).unwrap();

        assert_eq!(
            identity,
            IdentityContext {
                user_id,
                role: UserRole::Admin,
                tenant_slug: "acme".to_string(),
            }
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let tokens = tokens();
        let token = tokens.issue(Uuid::new_v4(), UserRole::Member, "acme").unwrap();

        assert!(authenticate(Some(&format!("bearer {}", token)), &tokens).is_ok());
        assert!(authenticate(Some(&format!("BEARER\t{}", token)), &tokens).is_ok());
    }

    #[test]
    fn test_invalid_and_expired_tokens() {
        let tokens = tokens();

        assert!(matches!(
            authenticate(Some("Bearer not.a.token"), &tokens),
            Err(AuthError::InvalidToken(_))
        ));

        let issued = Utc::now() - Duration::hours(9);
        let expired = tokens
            .issue_at(Uuid::new_v4(), UserRole::Member, "acme", issued)
            .unwrap();
        assert!(matches!(
            authenticate(Some(&format!("Bearer {}", expired)), &tokens),
            Err(AuthError::InvalidToken(JwtError::Expired))
        ));
    }
}
