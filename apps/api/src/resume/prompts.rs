// All LLM prompt constants for the Resume module.

/// Task preamble for resume analysis; wrapped by `json_system`.
pub const RESUME_ANALYSIS_PREAMBLE: &str = "You review resumes the way an applicant \
    tracking system and a senior recruiter would, and you score them honestly.";

/// Resume analysis prompt template.
/// Replace: {target_role}, {job_description}, {resume_text}
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyse the resume below.

TARGET ROLE: {target_role}

JOB DESCRIPTION (score keyword coverage against this when provided):
{job_description}

RESUME:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "ats_score": 72,
  "summary": "Two or three sentences on overall quality and fit.",
  "strengths": ["Quantified impact in most experience bullets"],
  "weaknesses": ["No summary section"],
  "missing_keywords": ["Kubernetes"],
  "section_feedback": [
    {"section": "Experience", "feedback": "Lead with outcomes, not duties."}
  ],
  "suggestions": ["Add a 2-line professional summary targeting the role"]
}

Rules:
1. ats_score is an integer from 0 to 100 reflecting parseability, keyword coverage and impact.
2. missing_keywords only lists terms from the job description that the resume lacks; use [] when no job description is provided.
3. Every suggestion must be specific to this resume. No generic advice.
4. Quote the resume only when pointing at a concrete problem."#;
