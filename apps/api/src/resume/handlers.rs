//! Axum route handlers for the Resume Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::auth::AuthUser;
use crate::errors::{ensure_owner, AppError};
use crate::extract::{Json, Path};
use crate::models::resume::ResumeAnalysisRow;
use crate::resume::analyzer::{
    analyze_resume, persist_analysis, AnalyzeResumeRequest, NewAnalysis, UploadedFile,
};
use crate::resume::upload::{extract_pdf_text, read_upload, store_pdf};
use crate::state::AppState;

/// History list item. Omits the resume text and full analysis.
#[derive(Debug, Serialize, FromRow)]
pub struct ResumeAnalysisSummary {
    pub id: i64,
    pub file_name: Option<String>,
    pub target_role: Option<String>,
    pub ats_score: i32,
    pub created_at: DateTime<Utc>,
}

/// POST /api/v1/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<ResumeAnalysisRow>, AppError> {
    request.validate()?;

    let analysis = analyze_resume(
        &state.llm,
        &request.resume_text,
        request.job_description.as_deref(),
        request.target_role.as_deref(),
    )
    .await?;

    let row = persist_analysis(
        &state.db,
        NewAnalysis {
            user_email: &user.email,
            resume_text: request.resume_text.trim(),
            job_description: request.job_description.as_deref(),
            target_role: request.target_role.as_deref(),
            file: None,
            analysis: &analysis,
        },
    )
    .await?;

    Ok(Json(row))
}

/// POST /api/v1/resume/analyze/upload
///
/// Multipart form: `file` (PDF), optional `job_description` and `target_role`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeAnalysisRow>, AppError> {
    let upload = read_upload(multipart?).await?;
    let resume_text = extract_pdf_text(upload.bytes.clone()).await?;

    let analysis = analyze_resume(
        &state.llm,
        &resume_text,
        upload.job_description.as_deref(),
        upload.target_role.as_deref(),
    )
    .await?;

    let s3_key = store_pdf(&state.s3, &state.s3_bucket, &user.email, upload.bytes).await?;

    let row = persist_analysis(
        &state.db,
        NewAnalysis {
            user_email: &user.email,
            resume_text: &resume_text,
            job_description: upload.job_description.as_deref(),
            target_role: upload.target_role.as_deref(),
            file: Some(UploadedFile {
                file_name: &upload.file_name,
                s3_key: &s3_key,
            }),
            analysis: &analysis,
        },
    )
    .await?;

    Ok(Json(row))
}

/// GET /api/v1/resume/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeAnalysisSummary>>, AppError> {
    let rows = sqlx::query_as::<_, ResumeAnalysisSummary>(
        r#"
        SELECT id, file_name, target_role, ats_score, created_at
        FROM resume_analyses
        WHERE user_email = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(&user.email)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// GET /api/v1/resume/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ResumeAnalysisRow>, AppError> {
    let row = load_owned(&state.db, id, &user.email).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/resume/analyses/:id
///
/// Removes the analysis row. The stored PDF is kept for audit.
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    load_owned(&state.db, id, &user.email).await?;

    sqlx::query("DELETE FROM resume_analyses WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned(pool: &PgPool, id: i64, email: &str) -> Result<ResumeAnalysisRow, AppError> {
    let row = sqlx::query_as::<_, ResumeAnalysisRow>("SELECT * FROM resume_analyses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume analysis {id} not found")))?;
    ensure_owner(&row.user_email, email)?;
    Ok(row)
}
