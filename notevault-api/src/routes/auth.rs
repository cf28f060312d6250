/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/login` - Verify credentials and issue a session token

use crate::{app::AppState, error::ApiResult, extract::AppJson};
use axum::{extract::State, Json};
use notevault_shared::models::user::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request
///
/// Both fields may be absent or `null`; either way the request fails with 400.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: Option<String>,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: Option<String>,
}

/// User summary returned on login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Tenant slug
    pub tenant: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token (8h)
    pub token: String,

    pub user: LoginUser,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "admin@acme.test",
///   "password": "password"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "uuid", "email": "admin@acme.test", "role": "admin", "tenant": "acme" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email or password missing, or the body isn't JSON
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let identity = state.credentials().verify(&email, &password).await?;

    let token = state
        .tokens
        .issue(identity.user_id, identity.role, &identity.tenant_slug)?;

    tracing::info!(user_id = %identity.user_id, tenant = %identity.tenant_slug, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: identity.user_id,
            email: identity.email,
            role: identity.role,
            tenant: identity.tenant_slug,
        },
    }))
}
