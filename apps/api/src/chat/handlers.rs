//! Axum route handlers for the Chat API.

use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::chat::agent::{send_message, ChatRequest, ChatResponse};
use crate::chat::sessions::{
    delete_session, ensure_session_owner, list_sessions, session_messages, SessionSummary,
};
use crate::chat::sharing::{
    load_shared, share_session, unshare_session, ShareResponse, SharedChatView,
};
use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::models::chat::ChatMessageRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionDetailResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessageRow>,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    request.validate()?;
    Ok(Json(
        send_message(&state.db, &state.llm, &user.email, &request).await?,
    ))
}

/// GET /api/v1/chat/sessions
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    Ok(Json(list_sessions(&state.db, &user.email).await?))
}

/// GET /api/v1/chat/sessions/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, AppError> {
    ensure_session_owner(&state.db, session_id, &user.email).await?;
    let messages = session_messages(&state.db, session_id).await?;
    Ok(Json(SessionDetailResponse {
        session_id,
        messages,
    }))
}

/// DELETE /api/v1/chat/sessions/:session_id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_session_owner(&state.db, session_id, &user.email).await?;
    delete_session(&state.db, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/chat/sessions/:session_id/share
pub async fn handle_share_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    ensure_session_owner(&state.db, session_id, &user.email).await?;
    let row = share_session(&state.db, session_id, &user.email).await?;
    Ok(Json(row.into()))
}

/// DELETE /api/v1/chat/sessions/:session_id/share
pub async fn handle_unshare_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_session_owner(&state.db, session_id, &user.email).await?;
    if !unshare_session(&state.db, session_id).await? {
        return Err(AppError::NotFound(format!(
            "Chat session {session_id} is not shared"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/shared/:share_id
///
/// Public. No session required.
pub async fn handle_get_shared(
    State(state): State<AppState>,
    Path(share_id): Path<Uuid>,
) -> Result<Json<SharedChatView>, AppError> {
    Ok(Json(load_shared(&state.db, share_id).await?))
}
