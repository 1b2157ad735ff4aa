//! Cover Letter Writer — tone calibration, prompt building and persistence.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::cover_letters::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::errors::{require_text, AppError};
use crate::llm_client::prompts::or_not_provided;
use crate::llm_client::LlmClient;
use crate::models::cover_letter::CoverLetterRow;

const MAX_FIELD_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Formal,
    Conversational,
}

impl LetterTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterTone::Professional => "professional",
            LetterTone::Enthusiastic => "enthusiastic",
            LetterTone::Formal => "formal",
            LetterTone::Conversational => "conversational",
        }
    }

    /// Style guidance handed to the model alongside the tone name.
    pub fn guidance(&self) -> &'static str {
        match self {
            LetterTone::Professional => "confident and polished, plain business English",
            LetterTone::Enthusiastic => {
                "energetic and warm, show genuine excitement without exclamation overload"
            }
            LetterTone::Formal => "traditional and reserved, no contractions",
            LetterTone::Conversational => "friendly and direct, short sentences, contractions allowed",
        }
    }
}

/// Request body for cover-letter generation.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub resume_text: Option<String>,
    #[serde(default)]
    pub tone: LetterTone,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("job_title", &self.job_title)?;
        require_text("company_name", &self.company_name)?;
        require_text("job_description", &self.job_description)?;
        for (field, value) in [
            ("job_description", Some(self.job_description.as_str())),
            ("resume_text", self.resume_text.as_deref()),
        ] {
            if value.is_some_and(|v| v.chars().count() > MAX_FIELD_CHARS) {
                return Err(AppError::Validation(format!(
                    "{field} exceeds {MAX_FIELD_CHARS} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Request body for manual edits.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCoverLetterRequest {
    pub content: String,
}

pub fn build_cover_letter_prompt(request: &CoverLetterRequest) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", request.job_title.trim())
        .replace("{company_name}", request.company_name.trim())
        .replace("{tone}", request.tone.as_str())
        .replace("{tone_guidance}", request.tone.guidance())
        .replace("{job_description}", request.job_description.trim())
        .replace("{resume_text}", or_not_provided(request.resume_text.as_deref()))
}

/// Generates a cover letter and stores it for the user.
pub async fn write_cover_letter(
    pool: &PgPool,
    llm: &LlmClient,
    user_email: &str,
    request: &CoverLetterRequest,
) -> Result<CoverLetterRow, AppError> {
    let prompt = build_cover_letter_prompt(request);
    let content = llm
        .call_text(&prompt, COVER_LETTER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))?;

    let row = sqlx::query_as::<_, CoverLetterRow>(
        r#"
        INSERT INTO cover_letters
            (user_email, job_title, company_name, job_description, tone, content)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user_email)
    .bind(request.job_title.trim())
    .bind(request.company_name.trim())
    .bind(request.job_description.trim())
    .bind(request.tone.as_str())
    .bind(&content)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored cover letter {} for {} at {}",
        row.id, row.job_title, row.company_name
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CoverLetterRequest {
        CoverLetterRequest {
            job_title: "Platform Engineer".to_string(),
            company_name: "Zerodha".to_string(),
            job_description: "Run Kubernetes at scale.".to_string(),
            resume_text: None,
            tone: LetterTone::default(),
        }
    }

    #[test]
    fn test_default_tone_is_professional() {
        let req: CoverLetterRequest = serde_json::from_str(
            r#"{"job_title": "a", "company_name": "b", "job_description": "c"}"#,
        )
        .unwrap();
        assert_eq!(req.tone, LetterTone::Professional);
    }

    #[test]
    fn test_unknown_tone_rejected() {
        let result = serde_json::from_str::<CoverLetterRequest>(
            r#"{"job_title": "a", "company_name": "b", "job_description": "c", "tone": "sarcastic"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_each_required_field_validated() {
        for field in ["job_title", "company_name", "job_description"] {
            let mut req = request();
            match field {
                "job_title" => req.job_title.clear(),
                "company_name" => req.company_name = "  ".to_string(),
                _ => req.job_description.clear(),
            }
            match req.validate() {
                Err(AppError::Validation(msg)) => assert!(msg.starts_with(field), "{msg}"),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_oversized_resume_rejected() {
        let mut req = request();
        req.resume_text = Some("x".repeat(MAX_FIELD_CHARS + 1));
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_prompt_includes_tone_guidance_and_company() {
        let mut req = request();
        req.tone = LetterTone::Formal;
        let prompt = build_cover_letter_prompt(&req);
        assert!(prompt.contains("Platform Engineer role at Zerodha"));
        assert!(prompt.contains("TONE: formal (traditional and reserved, no contractions)"));
        assert!(prompt.contains("why this role at Zerodha specifically"));
        assert!(prompt.contains("CANDIDATE BACKGROUND (resume or notes):\nNot provided"));
    }
}
