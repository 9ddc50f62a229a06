//! Response sanitizer: free-form generator output → JSON-parseable text.
//!
//! Generators wrap their JSON in markdown fences, surround it with prose,
//! or leak control characters into it. This module strips all of that
//! without touching the payload itself.

/// Sanitize raw generator output into something a strict JSON parser can
/// consume.
///
/// Removes ```json / ``` fence markers (keeping the fenced content),
/// drops non-printable control characters (the historical cause of JSON
/// parse failures), and trims surrounding whitespace. Fenced input with
/// arbitrary leading/trailing whitespace sanitizes to the byte-identical
/// trimmed core content.
pub fn sanitize_response(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let cleaned: String = unfenced
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    cleaned.trim().to_string()
}

/// Second-chance pass for payloads that still fail to parse: collapse
/// escaped and literal newlines/tabs into single spaces and squeeze
/// repeated whitespace. Only called after a first strict parse attempt
/// fails, since it flattens multi-line text.
pub fn flatten_whitespace(s: &str) -> String {
    let replaced = s.replace("\\n", " ").replace("\\t", " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract content from markdown code fences.
///
/// Handles:
/// - a single fenced block (` ```json ` or bare ` ``` `), with any
///   leading/trailing prose discarded
/// - multiple fenced blocks (concatenated)
/// - truncated (unclosed) fences
/// - input with no fences at all (returned as-is)
fn strip_code_fences(raw: &str) -> String {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = String::new();

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if in_block {
                blocks.push(std::mem::take(&mut current));
            }
            in_block = !in_block;
            continue;
        }

        if in_block {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    // Unclosed fence: keep what accumulated
    if in_block && !current.is_empty() {
        blocks.push(current);
    }

    if blocks.is_empty() {
        raw.to_string()
    } else {
        blocks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_reduces_to_trimmed_core() {
        let core = r#"[{"tipo":"multiple","pregunta":"¿?"}]"#;
        let raw = format!("  \n```json\n{core}\n```\n\n");
        assert_eq!(sanitize_response(&raw), core);
    }

    #[test]
    fn bare_fences_and_surrounding_prose() {
        let raw = "Here is your quiz:\n```\n[1, 2, 3]\n```\nLet me know if you need more!";
        assert_eq!(sanitize_response(raw), "[1, 2, 3]");
    }

    #[test]
    fn unfenced_input_is_only_trimmed() {
        let raw = "   [\"a\", \"b\"]   ";
        assert_eq!(sanitize_response(raw), "[\"a\", \"b\"]");
    }

    #[test]
    fn control_characters_are_stripped() {
        let raw = "[\"ed\u{0007}ge\", \u{0000}\"cloud\"]\u{001b}";
        assert_eq!(sanitize_response(raw), "[\"edge\", \"cloud\"]");
    }

    #[test]
    fn newlines_inside_payload_survive_first_pass() {
        let raw = "```json\n[\n  1,\n  2\n]\n```";
        assert_eq!(sanitize_response(raw), "[\n  1,\n  2\n]");
    }

    #[test]
    fn unclosed_fence_is_recovered() {
        let raw = "```json\n[{\"pregunta\": \"truncated\"}]";
        assert_eq!(sanitize_response(raw), "[{\"pregunta\": \"truncated\"}]");
    }

    #[test]
    fn multiple_blocks_concatenate() {
        let raw = "```json\n[1]\n```\nand also\n```json\n[2]\n```";
        assert_eq!(sanitize_response(raw), "[1]\n[2]");
    }

    #[test]
    fn flatten_collapses_escapes_and_runs() {
        assert_eq!(
            flatten_whitespace("a\\n b\n\n  c\\td"),
            "a b c d".to_string()
        );
    }
}
