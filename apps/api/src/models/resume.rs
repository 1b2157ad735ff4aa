use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeAnalysisRow {
    pub id: i64,
    pub user_email: String,
    pub file_name: Option<String>,
    pub s3_key: Option<String>,
    pub resume_text: String,
    pub job_description: Option<String>,
    pub target_role: Option<String>,
    pub ats_score: i32,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
}
