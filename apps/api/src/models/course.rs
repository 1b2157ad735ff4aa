use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub user_email: String,
    pub title: String,
    pub topic: String,
    pub difficulty: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseModuleRow {
    pub id: i64,
    pub course_id: i64,
    pub position: i32,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseLessonRow {
    pub id: i64,
    pub module_id: i64,
    pub position: i32,
    pub title: String,
    pub content: String,
    /// JSON array of `VideoRef`.
    pub videos: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonProgressRow {
    pub id: i64,
    pub lesson_id: i64,
    pub user_email: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
