/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; each component error of the
/// shared crate converts into the matching status via `From`.
///
/// | Variant | Status | `error` |
/// |---|---|---|
/// | BadRequest / ValidationError | 400 | `bad_request` |
/// | Unauthorized | 401 | `unauthorized` |
/// | Forbidden | 403 | `forbidden` |
/// | NotFound | 404 | `not_found` |
/// | Conflict | 409 | `conflict` |
/// | InternalError | 500 | `internal_error` |
///
/// # Example
///
/// ```
/// use notevault_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(found: bool) -> ApiResult<Json<serde_json::Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Note not found".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notevault_shared::{
    auth::{
        authorization::AuthzError, credentials::CredentialError, jwt::JwtError,
        middleware::AuthError, password::PasswordError,
    },
    notes::NoteError,
    quota::QuotaError,
    store::StoreError,
    tenancy::TenancyError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for every failed login
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate email
    Conflict(String),

    /// Request body failed field validation (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    /// Flattens `validator` field errors into details
    pub fn from_validation(errors: &validator::ValidationErrors) -> Vec<Self> {
        let mut details: Vec<Self> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationErrorDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        details
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => {
                let message = errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "Request validation failed".to_string());
                (StatusCode::BAD_REQUEST, "bad_request", message, Some(errors))
            }
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(ValidationErrorDetail::from_validation(&errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => ApiError::Conflict("Email already exists".to_string()),
            StoreError::DuplicateSlug(slug) => {
                ApiError::Conflict(format!("Tenant slug already exists: {}", slug))
            }
            StoreError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(msg) => ApiError::BadRequest(msg),
            CredentialError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            CredentialError::Password(e) => e.into(),
            CredentialError::Store(e) => e.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::Invalid(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuthorization => {
                ApiError::Unauthorized("Missing authorization header".to_string())
            }
            AuthError::MalformedAuthorizationHeader => {
                ApiError::Unauthorized("Malformed authorization header".to_string())
            }
            AuthError::InvalidToken(e) => {
                tracing::debug!(reason = %e, "Rejected session token");
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::WrongTenant(_) => {
                ApiError::Forbidden("Not authorized to access this tenant".to_string())
            }
            AuthzError::InsufficientRole { .. } => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
        }
    }
}

impl From<TenancyError> for ApiError {
    fn from(err: TenancyError) -> Self {
        match err {
            TenancyError::TenantNotFound(_) => ApiError::NotFound("Tenant not found".to_string()),
            TenancyError::Store(e) => e.into(),
        }
    }
}

impl From<QuotaError> for ApiError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::LimitExceeded { .. } => ApiError::Forbidden(err.to_string()),
            QuotaError::Store(e) => e.into(),
        }
    }
}

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::Validation(msg) => ApiError::BadRequest(msg),
            NoteError::NotFound => ApiError::NotFound("Note not found".to_string()),
            NoteError::Quota(e) => e.into(),
            NoteError::TenantNotFound => ApiError::NotFound("Tenant not found".to_string()),
            NoteError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notevault_shared::models::tenant::TenantPlan;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Note not found".to_string());
        assert_eq!(err.to_string(), "Not found: Note not found");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest(String::new()), StatusCode::BAD_REQUEST),
            (ApiError::ValidationError(vec![]), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized(String::new()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden(String::new()), StatusCode::FORBIDDEN),
            (ApiError::NotFound(String::new()), StatusCode::NOT_FOUND),
            (ApiError::Conflict(String::new()), StatusCode::CONFLICT),
            (ApiError::InternalError(String::new()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_login_failures_share_message() {
        let err: ApiError = CredentialError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == INVALID_CREDENTIALS_MESSAGE));
    }

    #[test]
    fn test_quota_maps_to_forbidden() {
        let err: ApiError = NoteError::Quota(QuotaError::LimitExceeded {
            plan: TenantPlan::Free,
            limit: 3,
            current: 3,
        })
        .into();

        match err {
            ApiError::Forbidden(msg) => assert!(msg.contains("Upgrade to Pro")),
            other => panic!("expected forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let err: ApiError = StoreError::DuplicateEmail("a@b.test".to_string()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
