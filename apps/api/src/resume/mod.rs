// Resume analysis: ATS-style review of pasted text or an uploaded PDF,
// optionally scored against a target job description.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod upload;
