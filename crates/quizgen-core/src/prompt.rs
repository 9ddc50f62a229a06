//! Prompt templates for the generation calls.
//!
//! Prompts ask for strict JSON with the canonical field names; the
//! builder still tolerates the legacy vocabulary in whatever comes back.

/// Character budget for course text embedded in the exam prompt.
const EXAM_TEXT_LIMIT: usize = 20_000;

/// Character budget for course text embedded in the lessons prompt.
const LESSON_TEXT_LIMIT: usize = 15_000;

/// Build the prompt for a dynamic exam of `count` questions.
pub fn exam_prompt(source_text: &str, count: usize) -> String {
    format!(
        r#"You are an expert educator in technology. Generate an exam of {count} questions based on the provided study text.

RULES:
1. Mix question kinds:
   - "multiple_choice" (classic multiple choice)
   - "fill_blank" (a sentence with one blank marked ____)
   - "true_false" (decide whether a statement holds)
2. For "fill_blank", put the correct answer plus 3 plausible distractors in "options".
3. Give each question 2-4 unique options, and make "answer" exactly one of them.
4. The output must be EXCLUSIVELY one valid JSON array, no prose before or after.

EXPECTED JSON FORMAT:
[
  {{
    "kind": "multiple_choice",
    "prompt": "Which protocol is lightweight?",
    "options": ["HTTP", "MQTT", "FTP"],
    "answer": "MQTT",
    "explanation": "MQTT is designed for low bandwidth.",
    "difficulty": "medium"
  }}
]

STUDY TEXT:
{}"#,
        truncate_chars(source_text, EXAM_TEXT_LIMIT)
    )
}

/// Build the prompt for `count` progressive lessons.
pub fn lessons_prompt(source_text: &str, count: usize) -> String {
    format!(
        r##"You are an expert educator creating interactive, easy-to-learn content.

TASK: Split the following material into {count} progressive lessons.

RULES:
1. Each lesson should take 5-10 minutes to read.
2. Use plain language, real-world examples, and analogies for hard concepts.
3. Code examples must be short and well commented.
4. The output must be EXCLUSIVELY one valid JSON array, no prose before or after.

EXPECTED JSON FORMAT:
[
  {{
    "title": "Introduction to IoT",
    "position": 1,
    "content_markdown": "# Introduction\n\nWhat is IoT?...",
    "code_examples": [
      {{"language": "python", "description": "Basic temperature read", "code": "temp = sensor.read()"}}
    ],
    "key_points": ["IoT connects devices to the internet"],
    "estimated_minutes": 7
  }}
]

COURSE MATERIAL:
{}"##,
        truncate_chars(source_text, LESSON_TEXT_LIMIT)
    )
}

/// Build the prompt for post-exam feedback. The reply is free text, not
/// JSON.
pub fn feedback_prompt(score: u32, missed_prompts: &[String]) -> String {
    let missed = if missed_prompts.is_empty() {
        "none".to_string()
    } else {
        missed_prompts.join("; ")
    };
    format!(
        "A student scored {score}/100 on their exam. They missed questions about: {missed}. \
         Give short (max 2 lines), constructive, encouraging feedback telling them what to review."
    )
}

/// Truncate on a char boundary; course text is arbitrary UTF-8.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_prompt_embeds_count_and_text() {
        let p = exam_prompt("Edge computing reduces latency.", 10);
        assert!(p.contains("10 questions"));
        assert!(p.contains("Edge computing reduces latency."));
        assert!(p.contains("valid JSON array"));
    }

    #[test]
    fn lessons_prompt_embeds_count_and_format_sample() {
        let p = lessons_prompt("MQTT basics.", 4);
        assert!(p.contains("4 progressive lessons"));
        assert!(p.contains("MQTT basics."));
        // The format sample ships a markdown heading inside a JSON string.
        assert!(p.contains("\"# Introduction\\n\\nWhat is IoT?...\""));
    }

    #[test]
    fn long_text_is_truncated_char_safely() {
        let text = "é".repeat(30_000);
        let p = exam_prompt(&text, 5);
        // 20k chars of 2-byte é plus the template itself.
        assert!(p.len() < 41_000 + 2_000);
        let l = lessons_prompt(&text, 5);
        assert!(l.len() < 31_000 + 2_000);
    }

    #[test]
    fn feedback_prompt_lists_missed_topics() {
        let p = feedback_prompt(70, &["What is MQTT?".into(), "Define edge.".into()]);
        assert!(p.contains("70/100"));
        assert!(p.contains("What is MQTT?; Define edge."));

        let clean = feedback_prompt(100, &[]);
        assert!(clean.contains("none"));
    }
}
