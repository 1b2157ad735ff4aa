// All LLM prompt constants for the Courses module.

/// Task preamble for course generation; wrapped by `json_system`.
pub const COURSE_PREAMBLE: &str = "You are also an expert instructional designer who \
    writes clear, self-contained lessons for working professionals.";

/// Course outline prompt template.
/// Replace: {topic}, {difficulty}, {module_count}
pub const COURSE_PROMPT_TEMPLATE: &str = r#"Design a course.

TOPIC: {topic}
DIFFICULTY: {difficulty}
NUMBER OF MODULES: {module_count}

Return a JSON object with this EXACT schema:
{
  "title": "Practical SQL for Analysts",
  "description": "Two sentences on what the learner will be able to do.",
  "modules": [
    {
      "title": "Querying a Single Table",
      "summary": "One sentence.",
      "lessons": [
        {
          "title": "SELECT and WHERE",
          "content": "Markdown lesson body: explanation, a worked example, and a short exercise.",
          "video_query": "sql select where tutorial for beginners"
        }
      ]
    }
  ]
}

Rules:
1. Produce exactly {module_count} modules with 2 to 4 lessons each, ordered from fundamentals to application.
2. Lesson content is Markdown, 250 to 500 words, and must include one worked example.
3. video_query is a short search phrase likely to find a good tutorial video for that lesson.
4. Match depth and vocabulary to the difficulty."#;
