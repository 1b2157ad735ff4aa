//! Resume Analyzer — builds the analysis prompt, normalises the LLM output and persists it.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::errors::{require_text, AppError};
use crate::llm_client::prompts::{json_system, or_not_provided};
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeAnalysisRow;
use crate::resume::prompts::{RESUME_ANALYSIS_PREAMBLE, RESUME_ANALYSIS_PROMPT_TEMPLATE};

pub const MAX_RESUME_CHARS: usize = 50_000;

/// Request body for text-based resume analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResumeRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
    pub target_role: Option<String>,
}

impl AnalyzeResumeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("resume_text", &self.resume_text)?;
        check_resume_length("resume_text", &self.resume_text)
    }
}

/// Caps the text sent to the LLM, whether typed or extracted from a PDF.
pub fn check_resume_length(field: &str, text: &str) -> Result<(), AppError> {
    if text.chars().count() > MAX_RESUME_CHARS {
        return Err(AppError::Validation(format!(
            "{field} exceeds {MAX_RESUME_CHARS} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub section: String,
    pub feedback: String,
}

/// Structured analysis as returned to clients and stored in `resume_analyses.analysis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// 0 – 100
    pub ats_score: u8,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub section_feedback: Vec<SectionFeedback>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// What the model returns. The score may come back as a float or out of range.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    ats_score: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    missing_keywords: Vec<String>,
    #[serde(default)]
    section_feedback: Vec<SectionFeedback>,
    #[serde(default)]
    suggestions: Vec<String>,
}

impl From<RawAnalysis> for ResumeAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        Self {
            ats_score: clamp_score(raw.ats_score),
            summary: raw.summary.trim().to_string(),
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            missing_keywords: raw.missing_keywords,
            section_feedback: raw.section_feedback,
            suggestions: raw.suggestions,
        }
    }
}

fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

pub fn build_analysis_prompt(
    resume_text: &str,
    job_description: Option<&str>,
    target_role: Option<&str>,
) -> String {
    RESUME_ANALYSIS_PROMPT_TEMPLATE
        .replace("{target_role}", or_not_provided(target_role))
        .replace("{job_description}", or_not_provided(job_description))
        .replace("{resume_text}", resume_text.trim())
}

/// Runs the LLM analysis for a resume.
pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: Option<&str>,
    target_role: Option<&str>,
) -> Result<ResumeAnalysis, AppError> {
    let prompt = build_analysis_prompt(resume_text, job_description, target_role);
    let raw: RawAnalysis = llm
        .call_json(&prompt, &json_system(RESUME_ANALYSIS_PREAMBLE))
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;
    Ok(raw.into())
}

/// Source metadata for an analysis created from an uploaded file.
pub struct UploadedFile<'a> {
    pub file_name: &'a str,
    pub s3_key: &'a str,
}

pub struct NewAnalysis<'a> {
    pub user_email: &'a str,
    pub resume_text: &'a str,
    pub job_description: Option<&'a str>,
    pub target_role: Option<&'a str>,
    pub file: Option<UploadedFile<'a>>,
    pub analysis: &'a ResumeAnalysis,
}

pub async fn persist_analysis(
    pool: &PgPool,
    new: NewAnalysis<'_>,
) -> Result<ResumeAnalysisRow, AppError> {
    let analysis_json = serde_json::to_value(new.analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;

    let row = sqlx::query_as::<_, ResumeAnalysisRow>(
        r#"
        INSERT INTO resume_analyses
            (user_email, file_name, s3_key, resume_text, job_description, target_role,
             ats_score, analysis)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new.user_email)
    .bind(new.file.as_ref().map(|f| f.file_name))
    .bind(new.file.as_ref().map(|f| f.s3_key))
    .bind(new.resume_text)
    .bind(new.job_description)
    .bind(new.target_role)
    .bind(i32::from(new.analysis.ats_score))
    .bind(&analysis_json)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored resume analysis {} (ats_score={}) for {}",
        row.id, row.ats_score, new.user_email
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(72.4), 72);
        assert_eq!(clamp_score(72.5), 73);
        assert_eq!(clamp_score(130.0), 100);
        assert_eq!(clamp_score(-4.0), 0);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_raw_analysis_with_float_score_and_missing_lists() {
        let raw: RawAnalysis =
            serde_json::from_str(r#"{"ats_score": 88.7, "summary": "  Strong.  "}"#).unwrap();
        let analysis = ResumeAnalysis::from(raw);
        assert_eq!(analysis.ats_score, 89);
        assert_eq!(analysis.summary, "Strong.");
        assert!(analysis.strengths.is_empty());
        assert!(analysis.section_feedback.is_empty());
    }

    #[test]
    fn test_prompt_placeholders_filled() {
        let prompt = build_analysis_prompt("Jane Doe\nRust engineer", None, Some("SRE"));
        assert!(prompt.contains("TARGET ROLE: SRE"));
        assert!(prompt.contains("Not provided"));
        assert!(prompt.contains("Jane Doe\nRust engineer"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_validate_rejects_blank_and_oversized() {
        let mut req = AnalyzeResumeRequest {
            resume_text: "  ".to_string(),
            job_description: None,
            target_role: None,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.resume_text = "a".repeat(MAX_RESUME_CHARS + 1);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.resume_text = "Experienced backend engineer".to_string();
        assert!(req.validate().is_ok());
    }
}
