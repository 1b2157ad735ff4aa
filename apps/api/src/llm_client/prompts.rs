// Shared prompt constants.
// Each feature module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Persona shared by every career-facing prompt.
pub const CAREER_COACH_PERSONA: &str = "You are Saarthi, an experienced career coach \
    and hiring manager who gives specific, honest, actionable guidance. \
    Never invent employers, degrees, certifications or metrics the user did not provide.";

/// Builds a system prompt from a task-specific preamble plus the JSON-only rule.
pub fn json_system(preamble: &str) -> String {
    format!("{CAREER_COACH_PERSONA} {preamble} {JSON_ONLY_SYSTEM}")
}

/// Renders an optional free-text field for prompt interpolation.
pub fn or_not_provided(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "Not provided",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_contains_rule() {
        let system = json_system("Analyse resumes.");
        assert!(system.starts_with(CAREER_COACH_PERSONA));
        assert!(system.contains("Analyse resumes."));
        assert!(system.ends_with(JSON_ONLY_SYSTEM));
    }

    #[test]
    fn test_or_not_provided() {
        assert_eq!(or_not_provided(None), "Not provided");
        assert_eq!(or_not_provided(Some("  ")), "Not provided");
        assert_eq!(or_not_provided(Some(" Rust ")), "Rust");
    }
}
