// All LLM prompt constants for the Cover Letters module.

/// System prompt for cover-letter writing. Output is plain text, not JSON.
pub const COVER_LETTER_SYSTEM: &str = "You are Saarthi, an expert career writer. \
    You write concise, specific cover letters that connect the candidate's real \
    experience to the employer's needs. Never invent employers, degrees, \
    certifications or metrics. Respond with the letter text only: no subject line, \
    no markdown, no commentary.";

/// Cover-letter prompt template.
/// Replace: {job_title}, {company_name}, {tone}, {tone_guidance}, {job_description}, {resume_text}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for the {job_title} role at {company_name}.

TONE: {tone} ({tone_guidance})

JOB DESCRIPTION:
{job_description}

CANDIDATE BACKGROUND (resume or notes):
{resume_text}

Rules:
1. 250 to 400 words, 3 or 4 paragraphs.
2. Open with why this role at {company_name} specifically; do not open with "I am writing to apply".
3. Tie two or three concrete items from the candidate background to requirements in the job description.
4. If the candidate background is not provided, keep claims general and never fabricate specifics.
5. Close with a confident call to action and sign off with "Sincerely," followed by a blank line for the name."#;
