//! Course Generation — orchestrates outline generation, video enrichment and persistence.
//!
//! Flow: validate → LLM outline → video search per lesson → INSERT course, modules,
//!       lessons in one transaction → return the assembled course.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::courses::progress::{assemble_course, CourseDetail};
use crate::courses::prompts::{COURSE_PREAMBLE, COURSE_PROMPT_TEMPLATE};
use crate::errors::{require_text, AppError};
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::models::course::{CourseLessonRow, CourseModuleRow, CourseRow};
use crate::video_search::{VideoRef, VideoSearch};

const DEFAULT_MODULE_COUNT: u8 = 4;
const MAX_MODULE_COUNT: u8 = 10;
/// Videos attached to each lesson.
const VIDEOS_PER_LESSON: u8 = 3;
/// The prompt asks for 2 to 4; anything past this is dropped.
const MAX_LESSONS_PER_MODULE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Request body for course generation.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub module_count: Option<u8>,
}

impl CourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("topic", &self.topic)?;
        if !(1..=MAX_MODULE_COUNT).contains(&self.module_count()) {
            return Err(AppError::Validation(format!(
                "module_count must be between 1 and {MAX_MODULE_COUNT}"
            )));
        }
        Ok(())
    }

    pub fn module_count(&self) -> u8 {
        self.module_count.unwrap_or(DEFAULT_MODULE_COUNT)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LLM outline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LessonOutline {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub video_query: String,
}

impl LessonOutline {
    /// Falls back to the lesson title when the model left the query blank.
    pub fn search_query(&self, topic: &str) -> String {
        let query = self.video_query.trim();
        if query.is_empty() {
            format!("{} {}", topic.trim(), self.title.trim())
        } else {
            query.to_string()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleOutline {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub modules: Vec<ModuleOutline>,
}

impl CourseOutline {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

pub fn build_course_prompt(request: &CourseRequest) -> String {
    COURSE_PROMPT_TEMPLATE
        .replace("{topic}", request.topic.trim())
        .replace("{difficulty}", request.difficulty.as_str())
        .replace("{module_count}", &request.module_count().to_string())
}

/// Drops empty modules and trims the outline to `max_modules` modules of at most
/// `MAX_LESSONS_PER_MODULE` lessons. An outline with no lessons at all is rejected.
fn check_outline(
    mut outline: CourseOutline,
    max_modules: u8,
) -> Result<CourseOutline, AppError> {
    outline.modules.retain(|m| !m.lessons.is_empty());
    if outline.modules.len() > max_modules as usize {
        warn!(
            "Course outline returned {} modules, keeping {max_modules}",
            outline.modules.len()
        );
        outline.modules.truncate(max_modules as usize);
    }
    for module in &mut outline.modules {
        module.lessons.truncate(MAX_LESSONS_PER_MODULE);
    }
    if outline.modules.is_empty() {
        return Err(AppError::Llm(
            "Course generation returned no lessons".to_string(),
        ));
    }
    Ok(outline)
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates, enriches and stores a course for the user.
pub async fn generate_course(
    pool: &PgPool,
    llm: &LlmClient,
    videos: &dyn VideoSearch,
    user_email: &str,
    request: &CourseRequest,
) -> Result<CourseDetail, AppError> {
    let prompt = build_course_prompt(request);
    let outline: CourseOutline = llm
        .call_json(&prompt, &json_system(COURSE_PREAMBLE))
        .await
        .map_err(|e| AppError::Llm(format!("Course generation failed: {e}")))?;
    let outline = check_outline(outline, request.module_count())?;
    info!(
        "Course outline '{}' has {} modules, {} lessons",
        outline.title,
        outline.modules.len(),
        outline.lesson_count()
    );

    let lesson_videos = find_lesson_videos(videos, &request.topic, &outline).await;

    let mut tx = pool.begin().await?;

    let course = sqlx::query_as::<_, CourseRow>(
        r#"
        INSERT INTO courses (user_email, title, topic, difficulty, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_email)
    .bind(outline.title.trim())
    .bind(request.topic.trim())
    .bind(request.difficulty.as_str())
    .bind(outline.description.trim())
    .fetch_one(&mut *tx)
    .await?;

    let mut modules = Vec::with_capacity(outline.modules.len());
    let mut lessons = Vec::with_capacity(outline.lesson_count());
    let mut video_lists = lesson_videos.into_iter();

    for (m_idx, module) in outline.modules.iter().enumerate() {
        let module_row = sqlx::query_as::<_, CourseModuleRow>(
            r#"
            INSERT INTO course_modules (course_id, position, title, summary)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(course.id)
        .bind(m_idx as i32 + 1)
        .bind(module.title.trim())
        .bind(module.summary.trim())
        .fetch_one(&mut *tx)
        .await?;

        for (l_idx, lesson) in module.lessons.iter().enumerate() {
            let found = video_lists.next().unwrap_or_default();
            let videos_json = serde_json::to_value(&found).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to serialize videos: {e}"))
            })?;

            let lesson_row = sqlx::query_as::<_, CourseLessonRow>(
                r#"
                INSERT INTO course_lessons (module_id, position, title, content, videos)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(module_row.id)
            .bind(l_idx as i32 + 1)
            .bind(lesson.title.trim())
            .bind(lesson.content.trim())
            .bind(&videos_json)
            .fetch_one(&mut *tx)
            .await?;
            lessons.push(lesson_row);
        }
        modules.push(module_row);
    }

    tx.commit().await?;

    info!(
        "Stored course {} ({} lessons) for {}",
        course.id,
        lessons.len(),
        user_email
    );

    Ok(assemble_course(course, modules, lessons, &Default::default()))
}

/// One video list per lesson, in outline order. Search failures yield an empty list.
async fn find_lesson_videos(
    videos: &dyn VideoSearch,
    topic: &str,
    outline: &CourseOutline,
) -> Vec<Vec<VideoRef>> {
    let mut results = Vec::with_capacity(outline.lesson_count());
    for lesson in outline.modules.iter().flat_map(|m| m.lessons.iter()) {
        let query = lesson.search_query(topic);
        match videos.search(&query, VIDEOS_PER_LESSON).await {
            Ok(found) => results.push(found),
            Err(e) => {
                warn!("Video search failed for '{query}': {e}");
                results.push(vec![]);
            }
        }
    }
    results
}
