use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessageRow {
    pub id: i64,
    pub user_email: String,
    pub session_id: Uuid,
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedChatRow {
    pub id: i64,
    pub session_id: Uuid,
    pub user_email: String,
    pub share_id: Uuid,
    pub created_at: DateTime<Utc>,
}
