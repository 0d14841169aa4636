//! Chat session endpoints

use axum::extract::{Path, State};
use axum::Json;

use crate::error::Result;
use crate::server::auth::AuthUser;
use crate::server::state::AppState;
use crate::types::chat::SessionData;
use crate::types::request::SaveSessionRequest;
use crate::types::response::{DeleteResponse, SaveSessionResponse};

/// POST /api/sessions - create a session, or fully replace one by id
pub async fn save(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<SaveSessionRequest>,
) -> Result<Json<SaveSessionResponse>> {
    let session_id = state.sessions().save(
        &user_id,
        &request.title,
        &request.messages,
        request.session_id.as_deref(),
    )?;
    Ok(Json(SaveSessionResponse {
        success: true,
        session_id,
    }))
}

/// GET /api/sessions - the caller's sessions, newest first
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<SessionData>>> {
    Ok(Json(state.sessions().list(&user_id)?))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionData>> {
    Ok(Json(state.sessions().get(&user_id, &session_id)?))
}

/// DELETE /api/sessions/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.sessions().delete(&user_id, &session_id)?;
    Ok(Json(DeleteResponse { success: true }))
}
