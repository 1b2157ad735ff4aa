//! Chat sessions. Messages are stored flat; a session is every message sharing a
//! `session_id`, so listing sessions means grouping messages.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{ensure_owner, AppError};
use crate::models::chat::ChatMessageRow;

const TITLE_MAX_CHARS: usize = 60;
const UNTITLED: &str = "New chat";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub title: String,
    pub message_count: i64,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub shared: bool,
}

/// One row per session, grouped in the database.
#[derive(Debug, Clone, FromRow)]
pub struct SessionAggregateRow {
    pub session_id: Uuid,
    pub message_count: i64,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub first_user_message: Option<String>,
}

/// Builds summaries, most recently active first.
/// The title comes from the earliest user message in each session.
pub fn summarize_sessions(
    rows: Vec<SessionAggregateRow>,
    shared: &HashSet<Uuid>,
) -> Vec<SessionSummary> {
    let mut summaries: Vec<SessionSummary> = rows
        .into_iter()
        .map(|row| SessionSummary {
            session_id: row.session_id,
            title: row
                .first_user_message
                .as_deref()
                .map(session_title)
                .unwrap_or_else(|| UNTITLED.to_string()),
            message_count: row.message_count,
            started_at: row.started_at,
            last_message_at: row.last_message_at,
            shared: shared.contains(&row.session_id),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.last_message_at
            .cmp(&a.last_message_at)
            .then_with(|| a.session_id.cmp(&b.session_id))
    });
    summaries
}

/// Single-line title truncated to `TITLE_MAX_CHARS` characters.
pub fn session_title(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() {
        return UNTITLED.to_string();
    }
    if flat.chars().count() <= TITLE_MAX_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(TITLE_MAX_CHARS).collect();
    format!("{}…", cut.trim_end())
}

/// Session summaries for the user.
pub async fn list_sessions(pool: &PgPool, user_email: &str) -> Result<Vec<SessionSummary>, AppError> {
    let rows = sqlx::query_as::<_, SessionAggregateRow>(
        r#"
        SELECT m.session_id,
               COUNT(*) AS message_count,
               MIN(m.created_at) AS started_at,
               MAX(m.created_at) AS last_message_at,
               (
                   SELECT u.content
                   FROM chat_messages u
                   WHERE u.session_id = m.session_id AND u.role = 'user'
                   ORDER BY u.created_at, u.id
                   LIMIT 1
               ) AS first_user_message
        FROM chat_messages m
        WHERE m.user_email = $1
        GROUP BY m.session_id
        "#,
    )
    .bind(user_email)
    .fetch_all(pool)
    .await?;

    let shared: Vec<Uuid> =
        sqlx::query_scalar("SELECT session_id FROM shared_chats WHERE user_email = $1")
            .bind(user_email)
            .fetch_all(pool)
            .await?;

    Ok(summarize_sessions(rows, &shared.into_iter().collect()))
}

/// All messages of a session in order.
pub async fn session_messages(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<ChatMessageRow>, AppError> {
    Ok(sqlx::query_as::<_, ChatMessageRow>(
        "SELECT * FROM chat_messages WHERE session_id = $1 ORDER BY created_at, id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?)
}

/// Owner of a session, if it has any messages.
pub async fn session_owner(pool: &PgPool, session_id: Uuid) -> Result<Option<String>, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT user_email FROM chat_messages WHERE session_id = $1 ORDER BY id LIMIT 1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?)
}

/// Fails with 404 for unknown sessions and 403 for someone else's.
pub async fn ensure_session_owner(
    pool: &PgPool,
    session_id: Uuid,
    user_email: &str,
) -> Result<(), AppError> {
    let owner = session_owner(pool, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chat session {session_id} not found")))?;
    ensure_owner(&owner, user_email)
}

/// Deletes a session's messages and its share flag.
pub async fn delete_session(pool: &PgPool, session_id: Uuid) -> Result<u64, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM shared_chats WHERE session_id = $1")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM chat_messages WHERE session_id = $1")
        .bind(session_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    pub(crate) fn message(
        id: i64,
        session_id: Uuid,
        role: &str,
        content: &str,
        minute: i64,
    ) -> ChatMessageRow {
        ChatMessageRow {
            id,
            user_email: "asha@example.com".to_string(),
            session_id,
            role: role.to_string(),
            content: content.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    fn aggregate(
        session_id: Uuid,
        count: i64,
        first_minute: i64,
        last_minute: i64,
        first_user_message: Option<&str>,
    ) -> SessionAggregateRow {
        SessionAggregateRow {
            session_id,
            message_count: count,
            started_at: message(0, session_id, "user", "", first_minute).created_at,
            last_message_at: message(0, session_id, "user", "", last_minute).created_at,
            first_user_message: first_user_message.map(String::from),
        }
    }

    #[test]
    fn test_summaries_most_recent_first() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rows = vec![
            aggregate(b, 2, 5, 6, Some("Negotiate salary")),
            aggregate(a, 4, 0, 11, Some("How do I prepare for a system design interview?")),
        ];

        let sessions = summarize_sessions(rows, &HashSet::new());

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id, a, "most recently active first");
        assert_eq!(sessions[0].message_count, 4);
        assert_eq!(
            sessions[0].title,
            "How do I prepare for a system design interview?"
        );
        assert!(sessions[0].started_at < sessions[0].last_message_at);
        assert_eq!(sessions[1].session_id, b);
        assert_eq!(sessions[1].message_count, 2);
    }

    #[test]
    fn test_session_without_user_message_is_untitled() {
        let rows = vec![aggregate(Uuid::new_v4(), 1, 0, 0, None)];
        assert_eq!(summarize_sessions(rows, &HashSet::new())[0].title, "New chat");
    }

    #[test]
    fn test_shared_flag() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rows = vec![aggregate(a, 1, 0, 0, Some("x")), aggregate(b, 1, 1, 1, Some("y"))];
        let shared: HashSet<Uuid> = [a].into_iter().collect();
        let sessions = summarize_sessions(rows, &shared);
        let a_summary = sessions.iter().find(|s| s.session_id == a).unwrap();
        let b_summary = sessions.iter().find(|s| s.session_id == b).unwrap();
        assert!(a_summary.shared);
        assert!(!b_summary.shared);
    }

    #[test]
    fn test_no_rows_no_sessions() {
        assert!(summarize_sessions(vec![], &HashSet::new()).is_empty());
    }

    #[test]
    fn test_title_truncation() {
        let long = "word ".repeat(30);
        let title = session_title(&long);
        assert!(title.ends_with('…'));
        assert!(title.chars().count() <= TITLE_MAX_CHARS + 1);
        assert!(!title.contains("  "));
    }

    #[test]
    fn test_title_flattens_newlines() {
        assert_eq!(session_title("Help with\n\nmy   resume"), "Help with my resume");
        assert_eq!(session_title(" \n "), "New chat");
    }

    #[test]
    fn test_title_multibyte_safe() {
        let hindi = "नमस्ते ".repeat(20);
        let title = session_title(&hindi);
        assert!(title.ends_with('…'));
    }
}
