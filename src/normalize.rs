//! Coercion of model text into structured values.
//!
//! Models are asked for JSON but wrap it in markdown fences, add prose, or
//! return something else entirely. Every call site goes through
//! [`normalize`], so the fallback policy lives in one place: parse what can
//! be parsed, otherwise hand back the caller's fallback and a diagnostic.
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Top-level JSON shape a call site expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
    /// A bare array, or an object carrying the array under the given key.
    ArrayOrWrapped(&'static str),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Object => f.write_str("a JSON object"),
            Shape::Array => f.write_str("a JSON array"),
            Shape::ArrayOrWrapped(key) => write!(f, "a JSON array or an object with `{key}`"),
        }
    }
}

/// A normalized value and, when the fallback was used, why.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub diagnostic: Option<String>,
}

/// Parse `raw` as `shape` into `T`, or return `fallback` unchanged.
///
/// Never fails. A fallback is logged at warn level and reported through
/// [`Normalized::diagnostic`].
pub fn normalize<T: DeserializeOwned>(raw: &str, shape: Shape, fallback: T) -> Normalized<T> {
    match parse_shaped(raw, shape) {
        Ok(value) => Normalized {
            value,
            diagnostic: None,
        },
        Err(reason) => {
            tracing::warn!(%reason, expected = %shape, "model response unusable; substituting fallback");
            Normalized {
                value: fallback,
                diagnostic: Some(reason),
            }
        }
    }
}

/// Strict variant of [`normalize`]: the reason on failure instead of a fallback.
pub fn parse_shaped<T: DeserializeOwned>(raw: &str, shape: Shape) -> Result<T, String> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err("response is empty".to_string());
    }
    let value: Value = serde_json::from_str(cleaned).map_err(|err| {
        format!(
            "response is not valid JSON: {err} (first 200 chars: {})",
            crate::util::truncate_string(cleaned, 200)
        )
    })?;
    let value = check_shape(value, shape)?;
    serde_json::from_value(value)
        .map_err(|err| format!("response does not match the expected fields: {err}"))
}

fn check_shape(value: Value, shape: Shape) -> Result<Value, String> {
    match (shape, value) {
        (Shape::Object, value @ Value::Object(_)) => Ok(value),
        (Shape::Array | Shape::ArrayOrWrapped(_), value @ Value::Array(_)) => Ok(value),
        (Shape::ArrayOrWrapped(key), Value::Object(mut map)) => match map.remove(key) {
            Some(inner @ Value::Array(_)) => Ok(inner),
            _ => Err(format!("expected {shape}, got an object without an array `{key}`")),
        },
        (shape, other) => Err(format!("expected {shape}, got {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Remove markdown code fences and surrounding whitespace.
///
/// When a fenced block is present (optionally tagged `json`, possibly with
/// prose around it) its contents are returned; an unterminated fence runs to
/// the end of the text. Text without fences, or that already opens as a
/// JSON object or array, is only trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with(['{', '[']) {
        return text;
    }
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + 3..];

    let tag_len = after
        .find(|ch: char| !ch.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let tag = &after[..tag_len];
    let body = if tag.eq_ignore_ascii_case("json") || after[tag_len..].starts_with(char::is_whitespace)
    {
        &after[tag_len..]
    } else {
        after
    };

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Clause {
        title: String,
    }

    fn fallback_clauses() -> Vec<Clause> {
        vec![Clause {
            title: "Key Terms".to_string(),
        }]
    }

    #[test]
    fn test_strip_plain_text() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"score\":55}\n```";
        assert_eq!(strip_code_fences(text), "{\"score\":55}");
    }

    #[test]
    fn test_strip_untagged_fence_with_prose() {
        let text = "Here is the analysis:\n```\n[1, 2]\n```\nLet me know!";
        assert_eq!(strip_code_fences(text), "[1, 2]");
    }

    #[test]
    fn test_strip_other_language_tag() {
        assert_eq!(strip_code_fences("```javascript\n[]\n```"), "[]");
    }

    #[test]
    fn test_strip_leaves_backticks_inside_bare_json() {
        let raw = r#"{"issues":[{"title":"uses ``` markers"}]}"#;
        assert_eq!(strip_code_fences(raw), raw);
        let value: Value = parse_shaped(raw, Shape::Object).unwrap();
        assert_eq!(value["issues"][0]["title"], "uses ``` markers");
    }

    #[test]
    fn test_strip_unterminated_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": true}"), "{\"a\": true}");
    }

    #[test]
    fn test_normalize_returns_parsed_value() {
        let result = normalize(
            "```json\n{\"score\":55,\"issues\":[]}\n```",
            Shape::Object,
            json!({"score": 70}),
        );
        assert!(result.diagnostic.is_none());
        assert_eq!(result.value, json!({"score": 55, "issues": []}));
    }

    #[test]
    fn test_normalize_invalid_json_uses_fallback() {
        let result = normalize("Sure! Here are the clauses.", Shape::Array, fallback_clauses());
        assert_eq!(result.value, fallback_clauses());
        assert!(result.diagnostic.unwrap().contains("not valid JSON"));
    }

    #[test]
    fn test_normalize_empty_response_uses_fallback() {
        let result = normalize("  \n", Shape::Object, json!({"fallback": true}));
        assert_eq!(result.value, json!({"fallback": true}));
        assert_eq!(result.diagnostic.as_deref(), Some("response is empty"));
    }

    #[test]
    fn test_array_shape_rejects_object() {
        let result = normalize(
            r#"{"clauses": [{"title": "Payment"}]}"#,
            Shape::Array,
            fallback_clauses(),
        );
        assert_eq!(result.value, fallback_clauses());
        assert!(result.diagnostic.unwrap().contains("got an object"));
    }

    #[test]
    fn test_object_shape_rejects_array() {
        let result = normalize("[]", Shape::Object, json!({"fallback": true}));
        assert!(result.diagnostic.is_some());
    }

    #[test]
    fn test_wrapped_shape_extracts_inner_array() {
        let result = normalize(
            r#"{"clauses": [{"title": "Payment"}, {"title": "Term"}]}"#,
            Shape::ArrayOrWrapped("clauses"),
            fallback_clauses(),
        );
        assert!(result.diagnostic.is_none());
        let titles: Vec<&str> = result.value.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Payment", "Term"]);
    }

    #[test]
    fn test_wrapped_shape_accepts_bare_array() {
        let result = normalize(
            r#"[{"title": "Payment"}]"#,
            Shape::ArrayOrWrapped("clauses"),
            fallback_clauses(),
        );
        assert_eq!(result.value.len(), 1);
        assert!(result.diagnostic.is_none());
    }

    #[test]
    fn test_wrapped_shape_rejects_other_objects() {
        let result = normalize(
            r#"{"items": [{"title": "Payment"}]}"#,
            Shape::ArrayOrWrapped("clauses"),
            fallback_clauses(),
        );
        assert_eq!(result.value, fallback_clauses());
    }

    #[test]
    fn test_untypeable_value_uses_fallback() {
        let result = normalize(r#"[{"title": 7}]"#, Shape::Array, fallback_clauses());
        assert!(result
            .diagnostic
            .unwrap()
            .contains("does not match the expected fields"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["```json\n[{\"title\": \"A\"}]\n```", "not json", "{}"] {
            let first = normalize(raw, Shape::Array, fallback_clauses());
            let second = normalize(raw, Shape::Array, fallback_clauses());
            assert_eq!(first, second);
        }
    }
}
