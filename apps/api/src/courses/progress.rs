//! Per-user lesson completion and the course tree returned to clients.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::errors::{ensure_owner, AppError};
use crate::models::course::{CourseLessonRow, CourseModuleRow, CourseRow, LessonProgressRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseProgress {
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub progress_percent: u8,
}

impl CourseProgress {
    pub fn new(total_lessons: i64, completed_lessons: i64) -> Self {
        Self {
            total_lessons,
            completed_lessons,
            progress_percent: progress_percent(completed_lessons, total_lessons),
        }
    }
}

/// Rounded completion percentage. A course with no lessons is 0%.
pub fn progress_percent(completed: i64, total: i64) -> u8 {
    if total <= 0 {
        return 0;
    }
    let completed = completed.clamp(0, total);
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: CourseLessonRow,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleDetail {
    #[serde(flatten)]
    pub module: CourseModuleRow,
    pub lessons: Vec<LessonDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: CourseRow,
    pub progress: CourseProgress,
    pub modules: Vec<ModuleDetail>,
}

/// Builds the course tree. Modules and lessons are ordered by position.
pub fn assemble_course(
    course: CourseRow,
    mut modules: Vec<CourseModuleRow>,
    mut lessons: Vec<CourseLessonRow>,
    completed: &HashSet<i64>,
) -> CourseDetail {
    modules.sort_by_key(|m| (m.position, m.id));
    lessons.sort_by_key(|l| (l.module_id, l.position, l.id));

    let mut total = 0i64;
    let mut done = 0i64;
    let modules = modules
        .into_iter()
        .map(|module| {
            let module_lessons: Vec<LessonDetail> = lessons
                .iter()
                .filter(|l| l.module_id == module.id)
                .map(|l| LessonDetail {
                    completed: completed.contains(&l.id),
                    lesson: l.clone(),
                })
                .collect();
            total += module_lessons.len() as i64;
            done += module_lessons.iter().filter(|l| l.completed).count() as i64;
            ModuleDetail {
                module,
                lessons: module_lessons,
            }
        })
        .collect();

    CourseDetail {
        course,
        progress: CourseProgress::new(total, done),
        modules,
    }
}

/// Loads a course the caller owns, with its modules, lessons and the caller's progress.
pub async fn load_course_detail(
    pool: &PgPool,
    course_id: i64,
    user_email: &str,
) -> Result<CourseDetail, AppError> {
    let course = load_owned_course(pool, course_id, user_email).await?;

    let modules = sqlx::query_as::<_, CourseModuleRow>(
        "SELECT * FROM course_modules WHERE course_id = $1 ORDER BY position, id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    let module_ids: Vec<i64> = modules.iter().map(|m| m.id).collect();
    let lessons = sqlx::query_as::<_, CourseLessonRow>(
        "SELECT * FROM course_lessons WHERE module_id = ANY($1) ORDER BY module_id, position, id",
    )
    .bind(&module_ids)
    .fetch_all(pool)
    .await?;

    let lesson_ids: Vec<i64> = lessons.iter().map(|l| l.id).collect();
    let completed: Vec<i64> = sqlx::query_scalar(
        "SELECT lesson_id FROM lesson_progress WHERE lesson_id = ANY($1) AND user_email = $2 AND completed",
    )
    .bind(&lesson_ids)
    .bind(user_email)
    .fetch_all(pool)
    .await?;

    Ok(assemble_course(
        course,
        modules,
        lessons,
        &completed.into_iter().collect(),
    ))
}

pub async fn load_owned_course(
    pool: &PgPool,
    course_id: i64,
    user_email: &str,
) -> Result<CourseRow, AppError> {
    let course = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {course_id} not found")))?;
    ensure_owner(&course.user_email, user_email)?;
    Ok(course)
}

/// Marks a lesson complete or incomplete. The lesson must belong to the course.
pub async fn set_lesson_progress(
    pool: &PgPool,
    course_id: i64,
    lesson_id: i64,
    user_email: &str,
    completed: bool,
) -> Result<LessonProgressRow, AppError> {
    load_owned_course(pool, course_id, user_email).await?;

    let in_course: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT l.id
        FROM course_lessons l
        JOIN course_modules m ON m.id = l.module_id
        WHERE l.id = $1 AND m.course_id = $2
        "#,
    )
    .bind(lesson_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?;
    if in_course.is_none() {
        return Err(AppError::NotFound(format!(
            "Lesson {lesson_id} not found in course {course_id}"
        )));
    }

    let row = sqlx::query_as::<_, LessonProgressRow>(
        r#"
        INSERT INTO lesson_progress (lesson_id, user_email, completed, completed_at)
        VALUES ($1, $2, $3, CASE WHEN $3 THEN NOW() ELSE NULL END)
        ON CONFLICT (lesson_id, user_email) DO UPDATE
            SET completed = EXCLUDED.completed,
                completed_at = EXCLUDED.completed_at
        RETURNING *
        "#,
    )
    .bind(lesson_id)
    .bind(user_email)
    .bind(completed)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Course history entry: the course plus aggregate progress.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub topic: String,
    pub difficulty: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub progress: CourseProgress,
}

#[derive(Debug, FromRow)]
struct CourseHistoryRow {
    id: i64,
    title: String,
    topic: String,
    difficulty: String,
    description: String,
    created_at: DateTime<Utc>,
    total_lessons: i64,
    completed_lessons: i64,
}

impl From<CourseHistoryRow> for CourseSummary {
    fn from(r: CourseHistoryRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            topic: r.topic,
            difficulty: r.difficulty,
            description: r.description,
            created_at: r.created_at,
            progress: CourseProgress::new(r.total_lessons, r.completed_lessons),
        }
    }
}

/// All of the user's courses, newest first, with progress.
pub async fn list_course_history(
    pool: &PgPool,
    user_email: &str,
) -> Result<Vec<CourseSummary>, AppError> {
    let rows = sqlx::query_as::<_, CourseHistoryRow>(
        r#"
        SELECT c.id, c.title, c.topic, c.difficulty, c.description, c.created_at,
               COUNT(l.id) AS total_lessons,
               COUNT(p.id) FILTER (WHERE p.completed) AS completed_lessons
        FROM courses c
        LEFT JOIN course_modules m ON m.course_id = c.id
        LEFT JOIN course_lessons l ON l.module_id = m.id
        LEFT JOIN lesson_progress p ON p.lesson_id = l.id AND p.user_email = c.user_email
        WHERE c.user_email = $1
        GROUP BY c.id
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(user_email)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CourseSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course() -> CourseRow {
        CourseRow {
            id: 1,
            user_email: "asha@example.com".to_string(),
            title: "Rust Basics".to_string(),
            topic: "Rust".to_string(),
            difficulty: "beginner".to_string(),
            description: "Learn Rust".to_string(),
            created_at: Utc::now(),
        }
    }

    fn module(id: i64, position: i32) -> CourseModuleRow {
        CourseModuleRow {
            id,
            course_id: 1,
            position,
            title: format!("Module {id}"),
            summary: String::new(),
        }
    }

    fn lesson(id: i64, module_id: i64, position: i32) -> CourseLessonRow {
        CourseLessonRow {
            id,
            module_id,
            position,
            title: format!("Lesson {id}"),
            content: String::new(),
            videos: json!([]),
        }
    }

    #[test]
    fn test_progress_percent_empty_course_is_zero() {
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn test_progress_percent_clamps_overcount() {
        assert_eq!(progress_percent(5, 3), 100);
        assert_eq!(progress_percent(-1, 3), 0);
    }

    #[test]
    fn test_assemble_orders_and_counts() {
        let modules = vec![module(20, 2), module(10, 1)];
        let lessons = vec![
            lesson(103, 20, 1),
            lesson(102, 10, 2),
            lesson(101, 10, 1),
        ];
        let completed: HashSet<i64> = [101, 103].into_iter().collect();

        let detail = assemble_course(course(), modules, lessons, &completed);

        assert_eq!(detail.modules[0].module.id, 10);
        assert_eq!(detail.modules[1].module.id, 20);
        let first: Vec<i64> = detail.modules[0].lessons.iter().map(|l| l.lesson.id).collect();
        assert_eq!(first, vec![101, 102]);
        assert!(detail.modules[0].lessons[0].completed);
        assert!(!detail.modules[0].lessons[1].completed);
        assert_eq!(detail.progress, CourseProgress::new(3, 2));
        assert_eq!(detail.progress.progress_percent, 67);
    }

    #[test]
    fn test_assemble_ignores_lessons_of_other_modules() {
        let detail = assemble_course(
            course(),
            vec![module(10, 1)],
            vec![lesson(1, 10, 1), lesson(2, 99, 1)],
            &HashSet::new(),
        );
        assert_eq!(detail.progress.total_lessons, 1);
        assert_eq!(detail.progress.progress_percent, 0);
    }

    #[test]
    fn test_course_detail_serializes_flat() {
        let detail = assemble_course(course(), vec![module(10, 1)], vec![lesson(1, 10, 1)], &HashSet::new());
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["title"], "Rust Basics");
        assert_eq!(value["progress"]["total_lessons"], 1);
        assert_eq!(value["modules"][0]["lessons"][0]["completed"], false);
        assert_eq!(value["modules"][0]["lessons"][0]["title"], "Lesson 1");
    }
}
