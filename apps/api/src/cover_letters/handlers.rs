//! Axum route handlers for the Cover Letters API.

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::auth::AuthUser;
use crate::cover_letters::writer::{
    write_cover_letter, CoverLetterRequest, UpdateCoverLetterRequest,
};
use crate::errors::{ensure_owner, require_text, AppError};
use crate::extract::{Json, Path};
use crate::models::cover_letter::CoverLetterRow;
use crate::state::AppState;

#[derive(Debug, Serialize, FromRow)]
pub struct CoverLetterSummary {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    pub tone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/v1/cover-letters
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CoverLetterRequest>,
) -> Result<(StatusCode, Json<CoverLetterRow>), AppError> {
    request.validate()?;
    let row = write_cover_letter(&state.db, &state.llm, &user.email, &request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CoverLetterSummary>>, AppError> {
    let rows = sqlx::query_as::<_, CoverLetterSummary>(
        r#"
        SELECT id, job_title, company_name, tone, created_at, updated_at
        FROM cover_letters
        WHERE user_email = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(&user.email)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// GET /api/v1/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CoverLetterRow>, AppError> {
    Ok(Json(load_owned(&state.db, id, &user.email).await?))
}

/// PATCH /api/v1/cover-letters/:id
///
/// Saves the user's manual edits to the letter body.
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCoverLetterRequest>,
) -> Result<Json<CoverLetterRow>, AppError> {
    require_text("content", &request.content)?;
    load_owned(&state.db, id, &user.email).await?;

    let row = sqlx::query_as::<_, CoverLetterRow>(
        "UPDATE cover_letters SET content = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(&request.content)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// DELETE /api/v1/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    load_owned(&state.db, id, &user.email).await?;

    sqlx::query("DELETE FROM cover_letters WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned(pool: &PgPool, id: i64, email: &str) -> Result<CoverLetterRow, AppError> {
    let row = sqlx::query_as::<_, CoverLetterRow>("SELECT * FROM cover_letters WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Cover letter {id} not found")))?;
    ensure_owner(&row.user_email, email)?;
    Ok(row)
}
