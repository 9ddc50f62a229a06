//! Builders that turn sanitized generator JSON into validated drafts.
//!
//! The generator's output shape drifts: field names come back in two
//! languages, optional fields go missing, and whole elements are
//! sometimes garbage. Everything loose is resolved here, once — nothing
//! past this boundary handles a partially-formed record.

use serde::Deserialize;

use crate::model::{
    normalize_answer, CodeExample, Difficulty, LessonDraft, QuestionDraft, QuestionKind,
};
use crate::sanitize::{flatten_whitespace, sanitize_response};

/// Upper bound on logged payload snippets.
const SNIPPET_MAX: usize = 200;

/// Option list bounds for a valid question.
const MIN_OPTIONS: usize = 2;
const MAX_OPTIONS: usize = 4;

const DEFAULT_LESSON_MINUTES: u32 = 5;

/// Intermediate decode target for one generated question.
///
/// Every field is optional here; requiredness is enforced in
/// `validate_question`, not by serde, so one missing field drops the
/// element instead of failing the batch. Aliases cover the legacy
/// generator vocabulary.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default, alias = "tipo", alias = "type")]
    kind: Option<String>,
    #[serde(default, alias = "pregunta", alias = "question")]
    prompt: Option<String>,
    #[serde(default, alias = "opciones")]
    options: Option<Vec<String>>,
    #[serde(default, alias = "correcta", alias = "correct_answer")]
    answer: Option<String>,
    #[serde(default, alias = "explicacion")]
    explanation: Option<String>,
    #[serde(default, alias = "dificultad")]
    difficulty: Option<String>,
}

/// Intermediate decode target for one generated lesson.
#[derive(Debug, Deserialize)]
struct RawLesson {
    #[serde(default, alias = "titulo")]
    title: Option<String>,
    #[serde(default, alias = "orden", alias = "order")]
    position: Option<u32>,
    #[serde(default, alias = "contenido_markdown", alias = "content")]
    content_markdown: Option<String>,
    #[serde(default, alias = "ejemplos_codigo")]
    code_examples: Option<Vec<RawCodeExample>>,
    #[serde(default, alias = "puntos_clave")]
    key_points: Option<Vec<String>>,
    #[serde(default, alias = "duracion_estimada", alias = "duration_minutes")]
    estimated_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawCodeExample {
    #[serde(default, alias = "lenguaje")]
    language: Option<String>,
    #[serde(default, alias = "descripcion")]
    description: Option<String>,
    #[serde(default, alias = "codigo")]
    code: Option<String>,
}

/// Build a validated question set from raw generator output.
///
/// Pure and infallible: any unusable input — unparseable text, a
/// non-array top level, a batch of all-invalid elements — yields an
/// empty vec with a warn log, never an error. Callers decide whether an
/// empty set is acceptable (course creation) or fatal (regeneration).
pub fn build_question_set(raw_model_text: &str) -> Vec<QuestionDraft> {
    match parse_json_array(raw_model_text) {
        Ok(elements) => {
            let mut drafts = Vec::new();
            for (index, element) in elements.into_iter().enumerate() {
                match decode_question(element) {
                    Ok(draft) => drafts.push(draft),
                    Err(reason) => {
                        tracing::warn!(index, %reason, "dropping invalid question element");
                    }
                }
            }
            drafts
        }
        Err(reason) => {
            tracing::warn!(
                %reason,
                snippet = %snippet(raw_model_text, SNIPPET_MAX),
                "question payload unusable, returning empty set"
            );
            Vec::new()
        }
    }
}

/// Build a validated lesson set from raw generator output. Same contract
/// as `build_question_set`.
pub fn build_lesson_set(raw_model_text: &str) -> Vec<LessonDraft> {
    match parse_json_array(raw_model_text) {
        Ok(elements) => {
            let mut drafts = Vec::new();
            for (index, element) in elements.into_iter().enumerate() {
                match decode_lesson(element, index) {
                    Ok(draft) => drafts.push(draft),
                    Err(reason) => {
                        tracing::warn!(index, %reason, "dropping invalid lesson element");
                    }
                }
            }
            drafts
        }
        Err(reason) => {
            tracing::warn!(
                %reason,
                snippet = %snippet(raw_model_text, SNIPPET_MAX),
                "lesson payload unusable, returning empty set"
            );
            Vec::new()
        }
    }
}

/// Sanitize and parse raw output down to the top-level JSON array.
///
/// A failed strict parse gets one retry with flattened whitespace; a top
/// level that is not an array is the one hard failure in the builder.
fn parse_json_array(raw: &str) -> Result<Vec<serde_json::Value>, String> {
    let sanitized = sanitize_response(raw);

    let value: serde_json::Value = match serde_json::from_str(&sanitized) {
        Ok(v) => v,
        Err(first_err) => {
            let flattened = flatten_whitespace(&sanitized);
            serde_json::from_str(&flattened)
                .map_err(|_| format!("not valid JSON: {first_err}"))?
        }
    };

    match value {
        serde_json::Value::Array(elements) => Ok(elements),
        other => Err(format!(
            "expected a JSON array at the top level, got {}",
            json_type_name(&other)
        )),
    }
}

fn decode_question(element: serde_json::Value) -> Result<QuestionDraft, String> {
    let raw: RawQuestion =
        serde_json::from_value(element).map_err(|e| format!("element does not decode: {e}"))?;
    validate_question(raw)
}

/// Apply defaults and enforce the question invariants.
fn validate_question(raw: RawQuestion) -> Result<QuestionDraft, String> {
    let prompt = raw
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or("missing prompt")?;

    let answer = raw
        .answer
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or("missing correct answer")?;

    // Absent or unrecognized kinds fall back to multiple choice.
    let kind = raw
        .kind
        .as_deref()
        .and_then(|k| k.parse::<QuestionKind>().ok())
        .unwrap_or(QuestionKind::MultipleChoice);

    let difficulty = raw
        .difficulty
        .as_deref()
        .and_then(|d| d.parse::<Difficulty>().ok())
        .unwrap_or(Difficulty::Medium);

    let options = match raw.options.filter(|o| !o.is_empty()) {
        Some(options) => options,
        None if kind == QuestionKind::TrueFalse => vec!["true".into(), "false".into()],
        None => return Err("missing options".into()),
    };

    if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
        return Err(format!(
            "expected {MIN_OPTIONS}-{MAX_OPTIONS} options, got {}",
            options.len()
        ));
    }

    let normalized: Vec<String> = options.iter().map(|o| normalize_answer(o)).collect();
    let mut seen = std::collections::HashSet::new();
    if !normalized.iter().all(|o| seen.insert(o.clone())) {
        return Err("duplicate options".into());
    }

    if !normalized.contains(&normalize_answer(&answer)) {
        return Err(format!(
            "correct answer '{}' not among options",
            snippet(&answer, 60)
        ));
    }

    Ok(QuestionDraft {
        kind,
        prompt,
        options,
        answer,
        explanation: raw.explanation.unwrap_or_default(),
        difficulty,
    })
}

fn decode_lesson(element: serde_json::Value, index: usize) -> Result<LessonDraft, String> {
    let raw: RawLesson =
        serde_json::from_value(element).map_err(|e| format!("element does not decode: {e}"))?;

    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or("missing title")?;

    let content_markdown = raw
        .content_markdown
        .filter(|c| !c.trim().is_empty())
        .ok_or("missing content")?;

    let code_examples = raw
        .code_examples
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| {
            Some(CodeExample {
                language: e.language?,
                description: e.description.unwrap_or_default(),
                code: e.code?,
            })
        })
        .collect();

    Ok(LessonDraft {
        title,
        // List order stands in for a missing position.
        position: raw.position.unwrap_or(index as u32 + 1),
        content_markdown,
        code_examples,
        key_points: raw.key_points.unwrap_or_default(),
        estimated_minutes: raw.estimated_minutes.unwrap_or(DEFAULT_LESSON_MINUTES),
    })
}

/// Char-boundary-safe prefix for log lines.
fn snippet(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}

fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_fenced_legacy_payload() {
        let raw = "```json\n[{\"tipo\":\"completar\",\"pregunta\":\"El ____ Computing procesa datos cerca de la fuente.\",\"opciones\":[\"Edge\",\"Cloud\",\"Fog\",\"Mist\"],\"correcta\":\"Edge\",\"explicacion\":\"Edge Computing reduce la latencia.\"}]\n```";
        let drafts = build_question_set(raw);
        assert_eq!(drafts.len(), 1);
        let q = &drafts[0];
        assert_eq!(q.kind, QuestionKind::FillBlank);
        assert_eq!(q.options, vec!["Edge", "Cloud", "Fog", "Mist"]);
        assert_eq!(q.answer, "Edge");
        assert_eq!(q.difficulty, Difficulty::Medium);
    }

    #[test]
    fn builds_from_canonical_payload() {
        let raw = r#"[{
            "kind": "multiple_choice",
            "prompt": "Which protocol is lightweight?",
            "options": ["HTTP", "MQTT", "FTP"],
            "answer": "MQTT",
            "explanation": "MQTT targets low-bandwidth links.",
            "difficulty": "hard"
        }]"#;
        let drafts = build_question_set(raw);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].kind, QuestionKind::MultipleChoice);
        assert_eq!(drafts[0].difficulty, Difficulty::Hard);
    }

    #[test]
    fn drops_answer_not_among_options_keeps_sibling_order() {
        let raw = r#"[
            {"pregunta": "first", "opciones": ["a", "b"], "correcta": "a"},
            {"pregunta": "bogus", "opciones": ["a", "b"], "correcta": "z"},
            {"pregunta": "third", "opciones": ["x", "y"], "correcta": "Y"}
        ]"#;
        let drafts = build_question_set(raw);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].prompt, "first");
        assert_eq!(drafts[1].prompt, "third");
    }

    #[test]
    fn answer_match_is_normalized() {
        let raw = r#"[{"pregunta": "p", "opciones": ["  MQTT ", "HTTP"], "correcta": "mqtt"}]"#;
        let drafts = build_question_set(raw);
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn missing_required_fields_skip_element() {
        let raw = r#"[
            {"opciones": ["a", "b"], "correcta": "a"},
            {"pregunta": "no answer", "opciones": ["a", "b"]},
            {"pregunta": "ok", "opciones": ["a", "b"], "correcta": "b"}
        ]"#;
        let drafts = build_question_set(raw);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].prompt, "ok");
    }

    #[test]
    fn unknown_kind_defaults_to_multiple_choice() {
        let raw = r#"[{"tipo": "essay", "pregunta": "p", "opciones": ["a", "b"], "correcta": "a"}]"#;
        let drafts = build_question_set(raw);
        assert_eq!(drafts[0].kind, QuestionKind::MultipleChoice);
    }

    #[test]
    fn true_false_defaults_options() {
        let raw = r#"[{"tipo": "verdadero_falso", "pregunta": "MQTT is lightweight.", "correcta": "true"}]"#;
        let drafts = build_question_set(raw);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].options, vec!["true", "false"]);
    }

    #[test]
    fn option_count_bounds_enforced() {
        let raw = r#"[
            {"pregunta": "one option", "opciones": ["a"], "correcta": "a"},
            {"pregunta": "five options", "opciones": ["a","b","c","d","e"], "correcta": "a"}
        ]"#;
        assert!(build_question_set(raw).is_empty());
    }

    #[test]
    fn duplicate_options_rejected() {
        let raw = r#"[{"pregunta": "p", "opciones": ["Edge", " edge "], "correcta": "edge"}]"#;
        assert!(build_question_set(raw).is_empty());
    }

    #[test]
    fn non_array_top_level_is_empty() {
        assert!(build_question_set(r#"{"pregunta": "not a list"}"#).is_empty());
        assert!(build_question_set("\"just a string\"").is_empty());
    }

    #[test]
    fn garbage_input_is_empty() {
        assert!(build_question_set("Sorry, I can't produce that quiz.").is_empty());
        assert!(build_question_set("").is_empty());
    }

    #[test]
    fn explanation_defaults_to_empty() {
        let raw = r#"[{"pregunta": "p", "opciones": ["a", "b"], "correcta": "a"}]"#;
        assert_eq!(build_question_set(raw)[0].explanation, "");
    }

    #[test]
    fn lesson_set_from_legacy_payload() {
        let raw = r##"[{
            "titulo": "Introducción a IoT",
            "orden": 1,
            "contenido_markdown": "# Introducción\n\n¿Qué es IoT?",
            "ejemplos_codigo": [{"lenguaje": "python", "descripcion": "sensor", "codigo": "print(1)"}],
            "puntos_clave": ["IoT conecta dispositivos"],
            "duracion_estimada": 7
        }]"##;
        let drafts = build_lesson_set(raw);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Introducción a IoT");
        assert_eq!(drafts[0].estimated_minutes, 7);
        assert_eq!(drafts[0].code_examples.len(), 1);
    }

    #[test]
    fn lesson_position_defaults_to_list_order() {
        let raw = r#"[
            {"titulo": "A", "contenido_markdown": "a"},
            {"titulo": "B", "contenido_markdown": "b"}
        ]"#;
        let drafts = build_lesson_set(raw);
        assert_eq!(drafts[0].position, 1);
        assert_eq!(drafts[1].position, 2);
        assert_eq!(drafts[0].estimated_minutes, DEFAULT_LESSON_MINUTES);
    }

    #[test]
    fn lesson_without_title_skipped() {
        let raw = r#"[{"contenido_markdown": "orphan content"}]"#;
        assert!(build_lesson_set(raw).is_empty());
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let s = "éééééééééé";
        assert_eq!(snippet(s, 4), "éééé…");
        assert_eq!(snippet("short", 10), "short");
    }
}
