// Writing studio: the user's saved documents plus stateless AI rewrite assistance.

pub mod assist;
pub mod documents;
pub mod handlers;
pub mod prompts;
