//! Axum route handlers for the Courses API.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::courses::generator::{generate_course, CourseRequest};
use crate::courses::history::{delete_course_cascade, CascadeReport};
use crate::courses::progress::{
    list_course_history, load_course_detail, load_owned_course, set_lesson_progress,
    CourseDetail, CourseProgress, CourseSummary,
};
use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::models::course::LessonProgressRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub lesson: LessonProgressRow,
    pub course_progress: CourseProgress,
}

/// POST /api/v1/courses
pub async fn handle_create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CourseRequest>,
) -> Result<(StatusCode, Json<CourseDetail>), AppError> {
    request.validate()?;
    let detail = generate_course(
        &state.db,
        &state.llm,
        state.videos.as_ref(),
        &user.email,
        &request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/courses
///
/// Course history with per-course completion.
pub async fn handle_list_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    Ok(Json(list_course_history(&state.db, &user.email).await?))
}

/// GET /api/v1/courses/:id
pub async fn handle_get_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetail>, AppError> {
    Ok(Json(load_course_detail(&state.db, id, &user.email).await?))
}

/// PUT /api/v1/courses/:course_id/lessons/:lesson_id/progress
pub async fn handle_update_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path((course_id, lesson_id)): Path<(i64, i64)>,
    Json(update): Json<ProgressUpdate>,
) -> Result<Json<ProgressResponse>, AppError> {
    let lesson = set_lesson_progress(
        &state.db,
        course_id,
        lesson_id,
        &user.email,
        update.completed,
    )
    .await?;
    let detail = load_course_detail(&state.db, course_id, &user.email).await?;

    Ok(Json(ProgressResponse {
        lesson,
        course_progress: detail.progress,
    }))
}

/// DELETE /api/v1/courses/:id
///
/// Removes progress, lessons, modules and the course itself.
pub async fn handle_delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CascadeReport>, AppError> {
    load_owned_course(&state.db, id, &user.email).await?;
    Ok(Json(delete_course_cascade(&state.db, id).await?))
}
