// All LLM prompt constants for the Studio module.

/// System prompt for rewrite assistance. Output is the rewritten text only.
pub const ASSIST_SYSTEM: &str = "You are Saarthi's writing assistant for professional \
    writing: emails, LinkedIn posts, bios and statements of purpose. \
    Preserve the author's meaning and facts. Never add claims that are not in the text. \
    Respond with the rewritten text only: no preamble, no quotes, no commentary.";

/// Rewrite prompt template.
/// Replace: {instruction}, {extra_instructions}, {text}
pub const ASSIST_PROMPT_TEMPLATE: &str = r#"TASK: {instruction}

ADDITIONAL INSTRUCTIONS FROM THE AUTHOR: {extra_instructions}

TEXT:
{text}"#;
