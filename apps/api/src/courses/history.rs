//! Course deletion. Child tables do not cascade on their own, so rows are removed
//! leaf-first inside one transaction.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;

/// Delete statements in leaf-first order. Each binds `$1 = course_id`.
pub const CASCADE_STEPS: [(&str, &str); 4] = [
    (
        "lesson_progress",
        r#"
        DELETE FROM lesson_progress
        WHERE lesson_id IN (
            SELECT l.id
            FROM course_lessons l
            JOIN course_modules m ON m.id = l.module_id
            WHERE m.course_id = $1
        )
        "#,
    ),
    (
        "course_lessons",
        r#"
        DELETE FROM course_lessons
        WHERE module_id IN (SELECT id FROM course_modules WHERE course_id = $1)
        "#,
    ),
    (
        "course_modules",
        "DELETE FROM course_modules WHERE course_id = $1",
    ),
    ("courses", "DELETE FROM courses WHERE id = $1"),
];

/// Rows removed per table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub lesson_progress: u64,
    pub course_lessons: u64,
    pub course_modules: u64,
    pub courses: u64,
}

impl CascadeReport {
    fn record(&mut self, table: &str, rows: u64) {
        match table {
            "lesson_progress" => self.lesson_progress = rows,
            "course_lessons" => self.course_lessons = rows,
            "course_modules" => self.course_modules = rows,
            "courses" => self.courses = rows,
            _ => {}
        }
    }
}

/// Deletes a course and everything under it. Ownership must be checked by the caller.
pub async fn delete_course_cascade(pool: &PgPool, course_id: i64) -> Result<CascadeReport, AppError> {
    let mut tx = pool.begin().await?;
    let mut report = CascadeReport::default();

    for (table, sql) in CASCADE_STEPS {
        let result = sqlx::query(sql).bind(course_id).execute(&mut *tx).await?;
        report.record(table, result.rows_affected());
    }

    if report.courses == 0 {
        tx.rollback().await?;
        return Err(AppError::NotFound(format!("Course {course_id} not found")));
    }

    tx.commit().await?;

    info!(
        "Deleted course {course_id}: {} modules, {} lessons, {} progress rows",
        report.course_modules, report.course_lessons, report.lesson_progress
    );
    Ok(report)
}
