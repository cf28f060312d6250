/// Tenant administration endpoints (admin only)
///
/// The caller must be an admin of the tenant named in the path. Authorization
/// runs before the slug is looked up, so naming another tenant's slug yields
/// 403 whether or not that tenant exists.
///
/// # Endpoints
///
/// - `POST /api/tenants/:slug/upgrade` - Move the tenant to the pro plan
/// - `POST /api/tenants/:slug/invite`  - Add a user to the tenant

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use notevault_shared::{
    auth::{
        authorization::{authorize, Action},
        middleware::IdentityContext,
        password::{hash_password_blocking, INVITED_USER_PASSWORD},
    },
    models::{
        tenant::Tenant,
        user::{CreateUser, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Upgrade response
#[derive(Debug, Serialize, Deserialize)]
pub struct UpgradeResponse {
    pub message: String,
    pub tenant: Tenant,
}

/// Invite request
#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    /// Email of the new user
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,

    /// Role name, case-insensitive (default: member)
    pub role: Option<String>,
}

/// Invited user summary
#[derive(Debug, Serialize, Deserialize)]
pub struct InvitedUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

/// Invite response
#[derive(Debug, Serialize, Deserialize)]
pub struct InviteResponse {
    pub message: String,
    pub user: InvitedUser,
}

/// Upgrade the tenant to the pro plan
///
/// Idempotent: upgrading a pro tenant succeeds and leaves it on pro.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin of this tenant
/// - `404 Not Found`: No tenant with this slug
pub async fn upgrade_tenant(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(slug): Path<String>,
) -> ApiResult<Json<UpgradeResponse>> {
    authorize(&identity, Action::UpgradePlan, &slug)?;

    let tenant = state.tenants().resolve(&slug).await?;
    let tenant = state
        .store
        .upgrade_tenant(tenant.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    tracing::info!(tenant = %tenant.slug, user_id = %identity.user_id, "Tenant upgraded to pro");

    Ok(Json(UpgradeResponse {
        message: "Tenant upgraded to Pro".to_string(),
        tenant,
    }))
}

/// Invite a user into the tenant
///
/// The new user gets the fixed invitation password and must change it
/// out-of-band.
///
/// # Errors
///
/// - `400 Bad Request`: Missing/invalid email or unknown role
/// - `403 Forbidden`: Caller is not an admin of this tenant
/// - `404 Not Found`: No tenant with this slug
/// - `409 Conflict`: Email already registered
pub async fn invite_user(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(slug): Path<String>,
    AppJson(req): AppJson<InviteRequest>,
) -> ApiResult<Json<InviteResponse>> {
    authorize(&identity, Action::InviteUser, &slug)?;

    req.validate()?;
    let email = req
        .email
        .ok_or_else(|| ApiError::BadRequest("A valid email is required".to_string()))?;

    let role = match req.role.as_deref() {
        None => UserRole::Member,
        Some(raw) => raw
            .parse::<UserRole>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    let tenant = state.tenants().resolve(&slug).await?;
    let password_hash = hash_password_blocking(INVITED_USER_PASSWORD.to_string()).await?;

    let user = state
        .store
        .create_user(CreateUser {
            email,
            password_hash,
            role,
            tenant_id: tenant.id,
        })
        .await?;

    tracing::info!(tenant = %tenant.slug, invited = %user.id, role = %user.role, "User invited");

    Ok(Json(InviteResponse {
        message: "User invited successfully".to_string(),
        user: InvitedUser {
            id: user.id,
            email: user.email,
            role: user.role,
        },
    }))
}
