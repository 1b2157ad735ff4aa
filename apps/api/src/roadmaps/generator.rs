//! Roadmap Generator — validates the request, calls the LLM and persists the plan.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::errors::{require_text, AppError};
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::models::roadmap::RoadmapRow;
use crate::roadmaps::prompts::{ROADMAP_PREAMBLE, ROADMAP_PROMPT_TEMPLATE};

const DEFAULT_TIMEFRAME_MONTHS: i32 = 6;
const MAX_TIMEFRAME_MONTHS: i32 = 36;
const MAX_SKILLS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }
}

/// Request body for roadmap generation.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapRequest {
    pub target_role: String,
    pub experience_level: ExperienceLevel,
    pub timeframe_months: Option<i32>,
    #[serde(default)]
    pub current_skills: Vec<String>,
}

impl RoadmapRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("target_role", &self.target_role)?;
        let months = self.timeframe();
        if !(1..=MAX_TIMEFRAME_MONTHS).contains(&months) {
            return Err(AppError::Validation(format!(
                "timeframe_months must be between 1 and {MAX_TIMEFRAME_MONTHS}"
            )));
        }
        if self.current_skills.len() > MAX_SKILLS {
            return Err(AppError::Validation(format!(
                "current_skills accepts at most {MAX_SKILLS} entries"
            )));
        }
        Ok(())
    }

    pub fn timeframe(&self) -> i32 {
        self.timeframe_months.unwrap_or(DEFAULT_TIMEFRAME_MONTHS)
    }

    /// Trimmed, case-insensitively deduplicated skills in input order.
    pub fn normalized_skills(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.current_skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapResource {
    pub title: String,
    pub kind: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub title: String,
    pub duration_weeks: u32,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub resources: Vec<RoadmapResource>,
    pub milestone: String,
}

/// Stored in `roadmaps.content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapContent {
    pub title: String,
    pub overview: String,
    pub phases: Vec<RoadmapPhase>,
}

impl RoadmapContent {
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_weeks).sum()
    }
}

pub fn build_roadmap_prompt(request: &RoadmapRequest) -> String {
    let skills = request.normalized_skills();
    let skills = if skills.is_empty() {
        "None listed".to_string()
    } else {
        skills.join(", ")
    };
    ROADMAP_PROMPT_TEMPLATE
        .replace("{target_role}", request.target_role.trim())
        .replace("{experience_level}", request.experience_level.as_str())
        .replace("{timeframe_months}", &request.timeframe().to_string())
        .replace("{current_skills}", &skills)
}

/// A roadmap without phases is not usable.
fn check_content(content: RoadmapContent) -> Result<RoadmapContent, AppError> {
    if content.phases.is_empty() {
        return Err(AppError::Llm("Roadmap generation returned no phases".to_string()));
    }
    Ok(content)
}

/// Generates a roadmap and stores it for the user.
pub async fn generate_roadmap(
    pool: &PgPool,
    llm: &LlmClient,
    user_email: &str,
    request: &RoadmapRequest,
) -> Result<RoadmapRow, AppError> {
    let prompt = build_roadmap_prompt(request);
    let content: RoadmapContent = llm
        .call_json(&prompt, &json_system(ROADMAP_PREAMBLE))
        .await
        .map_err(|e| AppError::Llm(format!("Roadmap generation failed: {e}")))?;
    let content = check_content(content)?;

    info!(
        "Generated roadmap '{}' with {} phases ({} weeks) for {}",
        content.title,
        content.phases.len(),
        content.total_weeks(),
        user_email
    );

    let content_json = serde_json::to_value(&content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize roadmap: {e}")))?;

    let row = sqlx::query_as::<_, RoadmapRow>(
        r#"
        INSERT INTO roadmaps
            (user_email, target_role, experience_level, timeframe_months, current_skills, content)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user_email)
    .bind(request.target_role.trim())
    .bind(request.experience_level.as_str())
    .bind(request.timeframe())
    .bind(request.normalized_skills())
    .bind(&content_json)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(months: Option<i32>, skills: &[&str]) -> RoadmapRequest {
        RoadmapRequest {
            target_role: "Data Engineer".to_string(),
            experience_level: ExperienceLevel::Intermediate,
            timeframe_months: months,
            current_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_timeframe() {
        let req = request(None, &[]);
        assert_eq!(req.timeframe(), 6);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_timeframe_bounds() {
        assert!(request(Some(0), &[]).validate().is_err());
        assert!(request(Some(37), &[]).validate().is_err());
        assert!(request(Some(36), &[]).validate().is_ok());
        assert!(request(Some(1), &[]).validate().is_ok());
    }

    #[test]
    fn test_blank_role_rejected() {
        let mut req = request(None, &[]);
        req.target_role = " ".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_skills_normalized() {
        let req = request(None, &[" SQL ", "python", "", "sql", "Python", "Spark"]);
        assert_eq!(req.normalized_skills(), vec!["SQL", "python", "Spark"]);
    }

    #[test]
    fn test_experience_level_serde() {
        let level: ExperienceLevel = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(level, ExperienceLevel::Advanced);
        assert!(serde_json::from_str::<ExperienceLevel>("\"expert\"").is_err());
    }

    #[test]
    fn test_prompt_lists_skills() {
        let prompt = build_roadmap_prompt(&request(Some(9), &["SQL", "Airflow"]));
        assert!(prompt.contains("TARGET ROLE: Data Engineer"));
        assert!(prompt.contains("TIMEFRAME: 9 months"));
        assert!(prompt.contains("SKILLS ALREADY HELD: SQL, Airflow"));
        assert!(prompt.contains("CURRENT EXPERIENCE LEVEL: intermediate"));
    }

    #[test]
    fn test_prompt_without_skills() {
        let prompt = build_roadmap_prompt(&request(None, &[]));
        assert!(prompt.contains("SKILLS ALREADY HELD: None listed"));
    }

    #[test]
    fn test_empty_phases_rejected() {
        let content = RoadmapContent {
            title: "t".to_string(),
            overview: "o".to_string(),
            phases: vec![],
        };
        assert!(matches!(check_content(content), Err(AppError::Llm(_))));
    }

    #[test]
    fn test_content_parses_with_null_url_and_sums_weeks() {
        let json = r#"{
            "title": "Data Engineer in 6 months",
            "overview": "From SQL to pipelines.",
            "phases": [
                {"title": "Foundations", "duration_weeks": 4, "milestone": "Load a CSV into Postgres",
                 "resources": [{"title": "Docs", "kind": "documentation", "url": null}]},
                {"title": "Orchestration", "duration_weeks": 6, "goals": ["Schedule DAGs"],
                 "skills": ["Airflow"], "milestone": "Nightly pipeline"}
            ]
        }"#;
        let content: RoadmapContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.total_weeks(), 10);
        assert!(content.phases[0].resources[0].url.is_none());
        assert!(check_content(content).is_ok());
    }
}
