//! Stores the user's message, replays recent history to the LLM and
//! stores the reply.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::chat::prompts::CHAT_SYSTEM;
use crate::chat::sessions::session_owner;
use crate::errors::{ensure_owner, require_text, AppError};
use crate::llm_client::{non_empty_text, ChatRole, ChatTurn, LlmClient};
use crate::models::chat::ChatMessageRow;

/// Messages replayed to the model per request.
pub const HISTORY_WINDOW: i64 = 20;
const MAX_MESSAGE_CHARS: usize = 8_000;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Omit to start a new session.
    pub session_id: Option<Uuid>,
    pub message: String,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("message", &self.message)?;
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "message exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub message_id: i64,
}

/// Converts stored messages into turns the Messages API accepts: the first turn is
/// from the user and consecutive turns from the same speaker are merged.
pub fn to_turns(messages: &[ChatMessageRow]) -> Vec<ChatTurn> {
    let mut turns: Vec<ChatTurn> = Vec::with_capacity(messages.len());
    for message in messages {
        let role = match message.role.as_str() {
            "assistant" => ChatRole::Assistant,
            _ => ChatRole::User,
        };
        if turns.is_empty() && role == ChatRole::Assistant {
            continue;
        }
        match turns.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&message.content);
            }
            _ => turns.push(ChatTurn {
                role,
                content: message.content.clone(),
            }),
        }
    }
    turns
}

async fn insert_message(
    pool: &PgPool,
    user_email: &str,
    session_id: Uuid,
    role: ChatRole,
    content: &str,
) -> Result<ChatMessageRow, AppError> {
    Ok(sqlx::query_as::<_, ChatMessageRow>(
        r#"
        INSERT INTO chat_messages (user_email, session_id, role, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_email)
    .bind(session_id)
    .bind(role.as_str())
    .bind(content)
    .fetch_one(pool)
    .await?)
}

/// The last `HISTORY_WINDOW` messages of a session, oldest first.
async fn recent_history(pool: &PgPool, session_id: Uuid) -> Result<Vec<ChatMessageRow>, AppError> {
    let mut rows = sqlx::query_as::<_, ChatMessageRow>(
        r#"
        SELECT * FROM chat_messages
        WHERE session_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(session_id)
    .bind(HISTORY_WINDOW)
    .fetch_all(pool)
    .await?;
    rows.reverse();
    Ok(rows)
}

/// Handles one user message end-to-end.
pub async fn send_message(
    pool: &PgPool,
    llm: &LlmClient,
    user_email: &str,
    request: &ChatRequest,
) -> Result<ChatResponse, AppError> {
    let session_id = match request.session_id {
        Some(id) => {
            if let Some(owner) = session_owner(pool, id).await? {
                ensure_owner(&owner, user_email)?;
            }
            id
        }
        None => Uuid::new_v4(),
    };

    insert_message(pool, user_email, session_id, ChatRole::User, request.message.trim()).await?;

    let history = recent_history(pool, session_id).await?;
    let turns = to_turns(&history);

    let response = llm
        .call_conversation(&turns, CHAT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Chat reply failed: {e}")))?;
    let reply = non_empty_text(&response)
        .map_err(|e| AppError::Llm(format!("Chat reply failed: {e}")))?;

    let stored = insert_message(pool, user_email, session_id, ChatRole::Assistant, &reply).await?;

    info!(
        "Chat session {session_id}: replied with {} chars ({} turns of context)",
        reply.len(),
        turns.len()
    );

    Ok(ChatResponse {
        session_id,
        reply,
        message_id: stored.id,
    })
}
