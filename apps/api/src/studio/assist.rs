//! Rewrite assistance for studio text. Results are returned, never stored.

use serde::{Deserialize, Serialize};

use crate::errors::{require_text, AppError};
use crate::llm_client::prompts::or_not_provided;
use crate::llm_client::LlmClient;
use crate::studio::prompts::{ASSIST_PROMPT_TEMPLATE, ASSIST_SYSTEM};

const MAX_ASSIST_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistAction {
    Improve,
    Shorten,
    Expand,
    FixGrammar,
    MakeProfessional,
}

impl AssistAction {
    pub fn instruction(&self) -> &'static str {
        match self {
            AssistAction::Improve => {
                "Improve clarity, flow and word choice while keeping the length similar."
            }
            AssistAction::Shorten => "Cut the length roughly in half without losing key points.",
            AssistAction::Expand => {
                "Expand with more detail and supporting sentences, using only ideas already present."
            }
            AssistAction::FixGrammar => {
                "Fix grammar, spelling and punctuation only. Change nothing else."
            }
            AssistAction::MakeProfessional => {
                "Rewrite in a polished, professional register suitable for a hiring manager."
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistRequest {
    pub text: String,
    pub action: AssistAction,
    pub instructions: Option<String>,
}

impl AssistRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("text", &self.text)?;
        if self.text.chars().count() > MAX_ASSIST_CHARS {
            return Err(AppError::Validation(format!(
                "text exceeds {MAX_ASSIST_CHARS} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistResponse {
    pub action: AssistAction,
    pub result: String,
}

pub fn build_assist_prompt(request: &AssistRequest) -> String {
    ASSIST_PROMPT_TEMPLATE
        .replace("{instruction}", request.action.instruction())
        .replace(
            "{extra_instructions}",
            or_not_provided(request.instructions.as_deref()),
        )
        .replace("{text}", request.text.trim())
}

pub async fn assist(llm: &LlmClient, request: &AssistRequest) -> Result<AssistResponse, AppError> {
    let prompt = build_assist_prompt(request);
    let result = llm
        .call_text(&prompt, ASSIST_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Writing assist failed: {e}")))?;
    Ok(AssistResponse {
        action: request.action,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde_snake_case() {
        let action: AssistAction = serde_json::from_str("\"fix_grammar\"").unwrap();
        assert_eq!(action, AssistAction::FixGrammar);
        assert_eq!(
            serde_json::to_string(&AssistAction::MakeProfessional).unwrap(),
            "\"make_professional\""
        );
        assert!(serde_json::from_str::<AssistAction>("\"translate\"").is_err());
    }

    #[test]
    fn test_prompt_contains_instruction_and_text() {
        let request = AssistRequest {
            text: "  i has led the team  ".to_string(),
            action: AssistAction::FixGrammar,
            instructions: Some("British spelling".to_string()),
        };
        let prompt = build_assist_prompt(&request);
        assert!(prompt.starts_with("TASK: Fix grammar"));
        assert!(prompt.contains("AUTHOR: British spelling"));
        assert!(prompt.ends_with("TEXT:\ni has led the team"));
    }

    #[test]
    fn test_validate() {
        let mut request = AssistRequest {
            text: String::new(),
            action: AssistAction::Shorten,
            instructions: None,
        };
        assert!(request.validate().is_err());
        request.text = "Hello".to_string();
        assert!(request.validate().is_ok());
    }
}
