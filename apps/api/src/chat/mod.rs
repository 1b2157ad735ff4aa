// Career chat agent: persistent multi-turn sessions, session listing by grouping
// stored messages, and public read-only sharing.

pub mod agent;
pub mod handlers;
pub mod prompts;
pub mod sessions;
pub mod sharing;
