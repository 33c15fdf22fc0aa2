//! Structured-output extraction from near-JSON model text.
//!
//! Generative backends are asked for a JSON object but routinely wrap it in
//! prose or code fences, leave keys unquoted, or add trailing commas. The
//! extractor locates the object span, normalises it, and parses it. It either
//! returns a complete object or an [`ExtractionError`]; it never hands back a
//! partially parsed value.
//!
//! Candidate spans are tried in order:
//! 1. Greatest extent: first `{` to last `}`.
//! 2. First balanced `{...}` span (string-aware), for text that carries more
//!    than one brace group.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::ExtractionError;

/// Locate and parse the object embedded in `raw`.
///
/// # Errors
///
/// Returns [`ExtractionError::NoObject`] when `raw` has no brace span, and
/// [`ExtractionError::Malformed`] / [`ExtractionError::NotAnObject`] when no
/// candidate span parses into an object.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let mut candidates: Vec<&str> = Vec::with_capacity(2);
    if let Some(span) = greatest_span(raw) {
        candidates.push(span);
    }
    if let Some(span) = balanced_span(raw)
        && !candidates.contains(&span)
    {
        candidates.push(span);
    }

    let mut last_error = ExtractionError::NoObject;
    for span in candidates {
        match parse_span(span) {
            Ok(map) => return Ok(map),
            Err(error) => last_error = error,
        }
    }
    Err(last_error)
}

/// Extract the embedded object and deserialize it into `T`.
///
/// Field types are validated by `T`'s `Deserialize` impl; a mismatch is an
/// error rather than a silently coerced record.
///
/// # Errors
///
/// Any [`extract_object`] error, or [`ExtractionError::Schema`] when the
/// object does not fit `T`.
pub fn extract_record<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractionError> {
    let map = extract_object(raw)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| ExtractionError::Schema(e.to_string()))
}

fn greatest_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn balanced_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in raw[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&raw[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_span(span: &str) -> Result<Map<String, Value>, ExtractionError> {
    let normalized = normalize(span);
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExtractionError::NotAnObject),
        Err(e) => Err(ExtractionError::Malformed(e.to_string())),
    }
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether the next token in `out` would sit where an object key belongs.
fn at_key_position(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{' | ','))
}

/// Quote bare keys and drop trailing commas, leaving string literals intact.
fn normalize(span: &str) -> String {
    let chars: Vec<char> = span.chars().collect();
    let mut out = String::with_capacity(span.len() + 16);
    let mut in_string = false;
    let mut escape = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}' | ']')) {
                out.push(c);
            }
            i += 1;
        } else if is_ident_char(c) {
            let start = i;
            while i < chars.len() && is_ident_char(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let next = chars[i..].iter().find(|ch| !ch.is_whitespace());
            if next == Some(&':') && at_key_position(&out) {
                out.push('"');
                out.push_str(&word);
                out.push('"');
            } else {
                out.push_str(&word);
            }
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_plain_object() {
        let map = extract_object(r#"{"financial_beneficiary": "Mondelez International"}"#).unwrap();
        assert_eq!(map["financial_beneficiary"], json!("Mondelez International"));
    }

    #[test]
    fn tolerates_prose_around_object() {
        let raw = "Sure! Here is the answer:\n{\"confidence_score\": 80}\nLet me know if you need more.";
        let map = extract_object(raw).unwrap();
        assert_eq!(map["confidence_score"], json!(80));
    }

    #[test]
    fn quotes_bare_keys() {
        let raw = "Answer: {financial_beneficiary: \"Mondelez International\", confidence_score: 80, nested: {inner_key: true}}";
        let map = extract_object(raw).unwrap();
        assert_eq!(map["financial_beneficiary"], json!("Mondelez International"));
        assert_eq!(map["confidence_score"], json!(80));
        assert_eq!(map["nested"], json!({"inner_key": true}));
    }

    #[test]
    fn leaves_colons_inside_strings_alone() {
        let raw = r#"{sources: ["https://www.mondelezinternational.com/brands"], reasoning: "ratio 1:2"}"#;
        let map = extract_object(raw).unwrap();
        assert_eq!(
            map["sources"],
            json!(["https://www.mondelezinternational.com/brands"])
        );
        assert_eq!(map["reasoning"], json!("ratio 1:2"));
    }

    #[test]
    fn handles_escaped_quotes_and_braces_in_strings() {
        let raw = r#"{"reasoning": "the \"parent\" {company}", "ok": true}"#;
        let map = extract_object(raw).unwrap();
        assert_eq!(map["reasoning"], json!("the \"parent\" {company}"));
    }

    #[test]
    fn drops_trailing_commas() {
        let raw = "{\"sources\": [\"https://a.example\",], \"x\": 1,}";
        let map = extract_object(raw).unwrap();
        assert_eq!(map["sources"], json!(["https://a.example"]));
        assert_eq!(map["x"], json!(1));
    }

    #[test]
    fn reads_code_fenced_object() {
        let raw = "```json\n{\n  \"verification_status\": \"confirmed\"\n}\n```";
        let map = extract_object(raw).unwrap();
        assert_eq!(map["verification_status"], json!("confirmed"));
    }

    #[test]
    fn falls_back_to_first_balanced_span() {
        let raw = "First {\"a\": 1} then a stray note {not json at all}";
        let map = extract_object(raw).unwrap();
        assert_eq!(map["a"], json!(1));
    }

    #[test]
    fn no_braces_is_no_object() {
        assert_eq!(
            extract_object("I could not determine the owner."),
            Err(ExtractionError::NoObject)
        );
        assert_eq!(extract_object("} backwards {"), Err(ExtractionError::NoObject));
    }

    #[test]
    fn unparseable_span_is_malformed() {
        let err = extract_object("{owner: Mondelez}").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn truncated_output_is_an_error_not_partial() {
        let err = extract_object("{\"financial_beneficiary\": \"Mond").unwrap_err();
        assert_eq!(err, ExtractionError::NoObject);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
        score: u8,
    }

    #[test]
    fn extract_record_deserializes() {
        let probe: Probe = extract_record("{name: \"oreo\", score: 42}").unwrap();
        assert_eq!(
            probe,
            Probe {
                name: "oreo".into(),
                score: 42
            }
        );
    }

    #[test]
    fn extract_record_rejects_wrong_types() {
        let err = extract_record::<Probe>("{name: 7, score: 42}").unwrap_err();
        assert!(matches!(err, ExtractionError::Schema(_)));
    }

    #[test]
    fn normalize_ignores_values_followed_by_colon_outside_key_position() {
        assert_eq!(normalize("{a: [b: 1]}"), "{\"a\": [b: 1]}");
    }
}
