//! Axum route handlers for the Roadmaps API.

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::auth::AuthUser;
use crate::errors::{ensure_owner, AppError};
use crate::extract::{Json, Path};
use crate::models::roadmap::RoadmapRow;
use crate::roadmaps::generator::{generate_roadmap, RoadmapRequest};
use crate::state::AppState;

#[derive(Debug, Serialize, FromRow)]
pub struct RoadmapSummary {
    pub id: i64,
    pub target_role: String,
    pub experience_level: String,
    pub timeframe_months: i32,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// POST /api/v1/roadmaps
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<RoadmapRequest>,
) -> Result<(StatusCode, Json<RoadmapRow>), AppError> {
    request.validate()?;
    let row = generate_roadmap(&state.db, &state.llm, &user.email, &request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/roadmaps
pub async fn handle_list_roadmaps(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<RoadmapSummary>>, AppError> {
    let rows = sqlx::query_as::<_, RoadmapSummary>(
        r#"
        SELECT id, target_role, experience_level, timeframe_months,
               content->>'title' AS title, created_at
        FROM roadmaps
        WHERE user_email = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(&user.email)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// GET /api/v1/roadmaps/:id
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RoadmapRow>, AppError> {
    Ok(Json(load_owned(&state.db, id, &user.email).await?))
}

/// DELETE /api/v1/roadmaps/:id
pub async fn handle_delete_roadmap(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    load_owned(&state.db, id, &user.email).await?;

    sqlx::query("DELETE FROM roadmaps WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned(pool: &PgPool, id: i64, email: &str) -> Result<RoadmapRow, AppError> {
    let row = sqlx::query_as::<_, RoadmapRow>("SELECT * FROM roadmaps WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Roadmap {id} not found")))?;
    ensure_owner(&row.user_email, email)?;
    Ok(row)
}
