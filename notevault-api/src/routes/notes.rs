/// Note endpoints
///
/// Every handler resolves the caller's tenant from the session identity, so
/// the tenant used for scoping never comes from the request itself.
///
/// # Endpoints
///
/// - `GET    /api/notes`     - List the tenant's notes, newest first
/// - `POST   /api/notes`     - Create a note (subject to plan quota)
/// - `GET    /api/notes/:id` - Fetch a note
/// - `PUT    /api/notes/:id` - Update title and/or content
/// - `DELETE /api/notes/:id` - Delete a note

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use notevault_shared::{
    auth::{
        authorization::{authorize, Action},
        middleware::IdentityContext,
    },
    models::{
        note::{Note, UpdateNote},
        tenant::Tenant,
    },
    notes::NewNote,
};
use serde::Deserialize;
use uuid::Uuid;

/// Create note request
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Update note request
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Resolves the caller's own tenant and checks the action against it
async fn caller_tenant(state: &AppState, identity: &IdentityContext, action: Action) -> ApiResult<Tenant> {
    let tenant = state.tenants().resolve(&identity.tenant_slug).await?;
    authorize(identity, action, &tenant.slug)?;
    Ok(tenant)
}

// Anything that isn't a UUID can't name an existing note
fn parse_note_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Note not found".to_string()))
}

/// List notes
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
) -> ApiResult<Json<Vec<Note>>> {
    let tenant = caller_tenant(&state, &identity, Action::ListNotes).await?;
    let notes = state.notes().list(tenant.id).await?;

    Ok(Json(notes))
}

/// Create note
///
/// # Errors
///
/// - `400 Bad Request`: Missing, null, or blank title
/// - `403 Forbidden`: Free plan note limit reached
/// - `404 Not Found`: Caller's tenant no longer exists
pub async fn create_note(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    AppJson(req): AppJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let tenant = caller_tenant(&state, &identity, Action::CreateNote).await?;

    // Cheap early rejection; the insert below re-checks atomically
    state.quota().check_create_allowed(&tenant).await?;

    let note = state
        .notes()
        .create(
            tenant.id,
            identity.user_id,
            NewNote {
                title: req.title.unwrap_or_default(),
                content: req.content,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Get note
pub async fn get_note(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;
    let tenant = caller_tenant(&state, &identity, Action::ReadNote).await?;

    Ok(Json(state.notes().get(tenant.id, id).await?))
}

/// Update note
///
/// Fields that are absent or empty keep their previous values.
pub async fn update_note(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;
    let tenant = caller_tenant(&state, &identity, Action::UpdateNote).await?;

    let note = state
        .notes()
        .update(
            tenant.id,
            id,
            UpdateNote {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(Json(note))
}

/// Delete note
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_note_id(&id)?;
    let tenant = caller_tenant(&state, &identity, Action::DeleteNote).await?;

    state.notes().delete(tenant.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
