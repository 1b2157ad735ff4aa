// Learning roadmaps: phased plans from a user's current skills to a target role.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
