//! Axum route handlers for the Users API.

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::Json;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SyncUserRequest {
    pub name: Option<String>,
}

/// POST /api/v1/users/sync
///
/// Upserts the caller. A name in the body wins over the name in the session token.
pub async fn handle_sync_user(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<Json<SyncUserRequest>>,
) -> Result<Json<User>, AppError> {
    let name = body
        .and_then(|Json(b)| b.name)
        .or(user.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let row = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name)
        VALUES ($1, $2)
        ON CONFLICT (email) DO UPDATE
            SET name = COALESCE(EXCLUDED.name, users.name),
                last_seen_at = NOW()
        RETURNING *
        "#,
    )
    .bind(&user.email)
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    info!("Synced user {}", row.id);
    Ok(Json(row))
}

/// GET /api/v1/users/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&user.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User has not been synced yet".to_string()))?;

    Ok(Json(row))
}
