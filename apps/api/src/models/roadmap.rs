use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoadmapRow {
    pub id: i64,
    pub user_email: String,
    pub target_role: String,
    pub experience_level: String,
    pub timeframe_months: i32,
    pub current_skills: Vec<String>,
    pub content: Value,
    pub created_at: DateTime<Utc>,
}
