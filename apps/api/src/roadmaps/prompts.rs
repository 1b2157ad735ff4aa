// All LLM prompt constants for the Roadmaps module.

/// Task preamble for roadmap generation; wrapped by `json_system`.
pub const ROADMAP_PREAMBLE: &str = "You design realistic, phased learning roadmaps \
    that take someone from their current skills to a target role.";

/// Roadmap prompt template.
/// Replace: {target_role}, {experience_level}, {timeframe_months}, {current_skills}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a learning roadmap.

TARGET ROLE: {target_role}
CURRENT EXPERIENCE LEVEL: {experience_level}
TIMEFRAME: {timeframe_months} months
SKILLS ALREADY HELD: {current_skills}

Return a JSON object with this EXACT schema:
{
  "title": "Backend Engineer in 6 months",
  "overview": "One paragraph describing the path.",
  "phases": [
    {
      "title": "Foundations",
      "duration_weeks": 4,
      "goals": ["Write idiomatic Python"],
      "skills": ["Python", "Git"],
      "resources": [
        {"title": "The Rust Programming Language", "kind": "book", "url": "https://doc.rust-lang.org/book/"}
      ],
      "milestone": "Ship a CLI tool to GitHub"
    }
  ]
}

Rules:
1. The sum of duration_weeks must fit inside the timeframe.
2. Skip skills the user already holds; build on them instead.
3. kind is one of "course", "book", "documentation", "video", "project", "article".
4. Only include a url when you are confident it exists; otherwise set it to null.
5. Every phase ends with a concrete, demonstrable milestone."#;
