//! Recovery of a question list from free-text AI replies.
//!
//! Model replies often wrap the requested JSON in code fences or prefix it
//! with a `json` label. [`extract_json_array`] strips those markers and
//! parses the outermost `[ ... ]` span; [`sanitize_questions`] additionally
//! checks that every element is a `{question, answer}` pair.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::interview::QuestionAnswer;

/// Literal tokens removed before the array scan: the `json` label and
/// backtick / code-fence markers.
pub const FENCE_PATTERN: &str = r"(json|```|`)";

/// Greedy, dot-matches-newline scan for the outermost bracketed span.
pub const ARRAY_PATTERN: &str = r"(?s)\[.*\]";

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FENCE_PATTERN).expect("valid regex"));

static ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ARRAY_PATTERN).expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("No JSON array found in response")]
    NoArrayFound,

    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

/// Strip fence markers and parse the outermost JSON array in `text`.
///
/// The parsed value is returned as-is, without shape checks.
pub fn extract_json_array(text: &str) -> Result<Value, SanitizeError> {
    let cleaned = FENCE_RE.replace_all(text.trim(), "");
    let span = ARRAY_RE
        .find(&cleaned)
        .ok_or(SanitizeError::NoArrayFound)?;

    serde_json::from_str(span.as_str()).map_err(|e| SanitizeError::InvalidJson(e.to_string()))
}

/// Parse an AI reply into a non-empty list of question/answer pairs.
///
/// Fails closed: any element that is not an object with string `question`
/// and `answer` fields rejects the whole reply.
pub fn sanitize_questions(text: &str) -> Result<Vec<QuestionAnswer>, SanitizeError> {
    let value = extract_json_array(text)?;
    validate_questions(&value)
}

/// Check a parsed value is a non-empty array of `{question, answer}` pairs.
pub fn validate_questions(value: &Value) -> Result<Vec<QuestionAnswer>, SanitizeError> {
    let items = value
        .as_array()
        .ok_or_else(|| SanitizeError::MalformedResponse("expected a JSON array".into()))?;

    if items.is_empty() {
        return Err(SanitizeError::MalformedResponse(
            "array contains no questions".into(),
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let obj = item.as_object().ok_or_else(|| {
                SanitizeError::MalformedResponse(format!("element {idx} is not an object"))
            })?;
            let text_field = |name: &str| {
                obj.get(name)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        SanitizeError::MalformedResponse(format!(
                            "element {idx} is missing a text `{name}` field"
                        ))
                    })
            };
            Ok(QuestionAnswer {
                question: text_field("question")?,
                answer: text_field("answer")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    // -- extract_json_array --

    #[test]
    fn fenced_array_is_returned_unchanged() {
        let reply = "```json\n[{\"question\":\"What is a goroutine?\",\"answer\":\"...\"}]\n```";
        let value = extract_json_array(reply).unwrap();
        assert_eq!(
            value,
            json!([{ "question": "What is a goroutine?", "answer": "..." }])
        );
    }

    #[test]
    fn bare_json_label_is_stripped() {
        let reply = "json\n[{\"question\":\"Q1\",\"answer\":\"A1\"}]";
        let value = extract_json_array(reply).unwrap();
        assert_eq!(value[0]["question"], "Q1");
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let reply = "Here are your questions:\n[{\"question\":\"Q\",\"answer\":\"A\"}]\nGood luck!";
        assert!(extract_json_array(reply).unwrap().is_array());
    }

    #[test]
    fn multiline_array_is_matched() {
        let reply = "[\n  {\"question\": \"Q\",\n   \"answer\": \"A\"}\n]";
        assert_eq!(extract_json_array(reply).unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn missing_array_reports_no_array_found() {
        let err = extract_json_array("Sorry, I cannot help with that.").unwrap_err();
        assert_matches!(err, SanitizeError::NoArrayFound);
        assert_eq!(err.to_string(), "No JSON array found in response");
    }

    #[test]
    fn unbalanced_bracket_reports_no_array_found() {
        assert_matches!(
            extract_json_array("only an opening [ bracket"),
            Err(SanitizeError::NoArrayFound)
        );
    }

    #[test]
    fn bracketed_non_json_reports_invalid_format() {
        let err = extract_json_array("[this is not json]").unwrap_err();
        assert_matches!(err, SanitizeError::InvalidJson(_));
        assert!(err.to_string().starts_with("Invalid JSON format: "));
    }

    #[test]
    fn greedy_scan_spans_first_open_to_last_close() {
        // Two separate arrays joined by prose do not form valid JSON.
        let reply = "[1] and then [2]";
        assert_matches!(extract_json_array(reply), Err(SanitizeError::InvalidJson(_)));
    }

    // -- sanitize_questions --

    #[test]
    fn well_formed_pairs_are_accepted() {
        let reply = "```\n[{\"question\":\"Q1\",\"answer\":\"A1\"},{\"question\":\"Q2\",\"answer\":\"A2\",\"difficulty\":\"hard\"}]\n```";
        let questions = sanitize_questions(reply).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question, "Q2");
        assert_eq!(questions[1].answer, "A2");
    }

    #[test]
    fn non_object_elements_are_rejected() {
        assert_matches!(
            sanitize_questions("[\"just a string\"]"),
            Err(SanitizeError::MalformedResponse(_))
        );
    }

    #[test]
    fn missing_answer_is_rejected() {
        let err = sanitize_questions("[{\"question\":\"Q1\"}]").unwrap_err();
        assert_matches!(err, SanitizeError::MalformedResponse(ref msg) if msg.contains("answer"));
    }

    #[test]
    fn non_text_answer_is_rejected() {
        assert_matches!(
            sanitize_questions("[{\"question\":\"Q1\",\"answer\":42}]"),
            Err(SanitizeError::MalformedResponse(_))
        );
    }

    #[test]
    fn empty_array_is_rejected() {
        assert_matches!(
            sanitize_questions("[]"),
            Err(SanitizeError::MalformedResponse(_))
        );
    }
}
