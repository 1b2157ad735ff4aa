//! Public sharing of chat sessions. A `shared_chats` row makes a session readable
//! by anyone holding its `share_id`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::chat::sessions::{session_messages, session_title};
use crate::errors::AppError;
use crate::models::chat::{ChatMessageRow, SharedChatRow};

#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub session_id: Uuid,
    pub share_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<SharedChatRow> for ShareResponse {
    fn from(row: SharedChatRow) -> Self {
        Self {
            session_id: row.session_id,
            share_id: row.share_id,
            created_at: row.created_at,
        }
    }
}

/// A message as seen by the public. No owner email.
#[derive(Debug, Clone, Serialize)]
pub struct PublicMessage {
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedChatView {
    pub share_id: Uuid,
    pub title: String,
    pub shared_at: DateTime<Utc>,
    pub messages: Vec<PublicMessage>,
}

pub fn public_view(share: &SharedChatRow, messages: Vec<ChatMessageRow>) -> SharedChatView {
    let title = messages
        .iter()
        .find(|m| m.role == "user")
        .map(|m| session_title(&m.content))
        .unwrap_or_else(|| session_title(""));
    SharedChatView {
        share_id: share.share_id,
        title,
        shared_at: share.created_at,
        messages: messages
            .into_iter()
            .map(|m| PublicMessage {
                role: m.role,
                content: m.content,
                created_at: m.created_at,
            })
            .collect(),
    }
}

/// Shares a session. Sharing an already shared session returns the existing share.
/// The caller must already own the session.
pub async fn share_session(
    pool: &PgPool,
    session_id: Uuid,
    user_email: &str,
) -> Result<SharedChatRow, AppError> {
    let row = sqlx::query_as::<_, SharedChatRow>(
        r#"
        INSERT INTO shared_chats (session_id, user_email, share_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (session_id) DO UPDATE SET session_id = EXCLUDED.session_id
        RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(user_email)
    .bind(Uuid::new_v4())
    .fetch_one(pool)
    .await?;

    info!("Chat session {session_id} shared as {}", row.share_id);
    Ok(row)
}

/// Revokes a share. Returns whether a share existed.
pub async fn unshare_session(pool: &PgPool, session_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM shared_chats WHERE session_id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Loads the public view for a share id.
pub async fn load_shared(pool: &PgPool, share_id: Uuid) -> Result<SharedChatView, AppError> {
    let share = sqlx::query_as::<_, SharedChatRow>("SELECT * FROM shared_chats WHERE share_id = $1")
        .bind(share_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Shared chat not found".to_string()))?;

    let messages = session_messages(pool, share.session_id).await?;
    if messages.is_empty() {
        return Err(AppError::NotFound("Shared chat not found".to_string()));
    }
    Ok(public_view(&share, messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::sessions::tests::message;

    #[test]
    fn test_public_view_hides_owner() {
        let session_id = Uuid::new_v4();
        let share = SharedChatRow {
            id: 1,
            session_id,
            user_email: "asha@example.com".to_string(),
            share_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let messages = vec![
            message(1, session_id, "user", "Mock interview for SDE-2", 0),
            message(2, session_id, "assistant", "Sure. Question one...", 1),
        ];

        let view = public_view(&share, messages);
        assert_eq!(view.title, "Mock interview for SDE-2");
        assert_eq!(view.messages.len(), 2);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("asha@example.com"));
    }
}
