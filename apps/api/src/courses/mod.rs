// Course generation: LLM-authored outlines (modules → lessons) enriched with
// video suggestions, per-user lesson progress, and course history.

pub mod generator;
pub mod handlers;
pub mod history;
pub mod progress;
pub mod prompts;
