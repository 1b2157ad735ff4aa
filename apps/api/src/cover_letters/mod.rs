// Cover letters: generated per job application, then editable by the user.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod writer;
