//! Axum route handlers for the Writing Studio API.

use axum::{extract::State, http::StatusCode};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::models::document::StudioDocumentRow;
use crate::state::AppState;
use crate::studio::assist::{assist, AssistRequest, AssistResponse};
use crate::studio::documents::{
    create_document, delete_document, list_documents, load_owned_document, update_document,
    CreateDocumentRequest, UpdateDocumentRequest,
};

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<StudioDocumentRow>), AppError> {
    request.validate()?;
    let row = create_document(&state.db, &user.email, &request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<StudioDocumentRow>>, AppError> {
    Ok(Json(list_documents(&state.db, &user.email).await?))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<StudioDocumentRow>, AppError> {
    Ok(Json(load_owned_document(&state.db, id, &user.email).await?))
}

/// PUT /api/v1/documents/:id
pub async fn handle_update_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<StudioDocumentRow>, AppError> {
    request.validate()?;
    load_owned_document(&state.db, id, &user.email).await?;
    Ok(Json(update_document(&state.db, id, &request).await?))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    load_owned_document(&state.db, id, &user.email).await?;
    delete_document(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/documents/assist
pub async fn handle_assist(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AssistRequest>,
) -> Result<Json<AssistResponse>, AppError> {
    request.validate()?;
    Ok(Json(assist(&state.llm, &request).await?))
}
