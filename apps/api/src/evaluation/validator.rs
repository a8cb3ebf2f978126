//! Response Validator — provider text in, typed `ScoreFields` out.
//!
//! Two separable stages:
//! 1. `locate_json_payload` finds the JSON object inside whatever the model
//!    returned (bare JSON, a ```json fence, or prose around either).
//! 2. `parse_score_fields` applies the strict schema: all four fields present,
//!    correct types, `score` an integer in 0..=100. Extra fields are ignored.
//!
//! Nothing is clamped or defaulted. Any violation is a `SchemaError`.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::evaluation::models::ScoreFields;

pub const MAX_SCORE: i128 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no JSON object found in provider response")]
    NoPayload,

    #[error("provider response is not valid JSON: {0}")]
    Malformed(String),

    #[error("provider response is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("score {0} is outside 0-100")]
    ScoreOutOfRange(i128),
}

/// Stage one: returns the substring holding the first balanced JSON object.
///
/// Brace matching skips over string literals so a `}` inside a value does not
/// end the object early.
pub fn locate_json_payload(text: &str) -> Result<&str, SchemaError> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        match matching_brace(bytes, start) {
            Some(end) => return Ok(&text[start..=end]),
            None => search_from = start + 1,
        }
    }

    Err(SchemaError::NoPayload)
}

/// Index of the `}` closing the object that opens at `start`, if balanced.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Stage two: strict-typed parse of an isolated JSON payload.
pub fn parse_score_fields(payload: &str) -> Result<ScoreFields, SchemaError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

    Ok(ScoreFields {
        score: score_field(object)?,
        suggestion: string_field(object, "suggestion")?,
        justification: string_field(object, "justification")?,
        edits: string_list_field(object, "edits")?,
    })
}

/// Both stages, in order.
pub fn validate_response(raw: &str) -> Result<ScoreFields, SchemaError> {
    let payload = locate_json_payload(raw)?;
    parse_score_fields(payload)
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaError> {
    match object.get(field) {
        Some(Value::Null) | None => Err(SchemaError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn score_field(object: &Map<String, Value>) -> Result<u8, SchemaError> {
    let wrong_type = SchemaError::WrongType {
        field: "score",
        expected: "an integer",
    };
    // Widened so integers past i64::MAX still report as out of range.
    let score: i128 = match required(object, "score")? {
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(v), _) => v.into(),
            (None, Some(v)) => v.into(),
            (None, None) => return Err(wrong_type),
        },
        _ => return Err(wrong_type),
    };
    if !(0..=MAX_SCORE).contains(&score) {
        return Err(SchemaError::ScoreOutOfRange(score));
    }
    // Range check above guarantees this fits.
    u8::try_from(score).map_err(|_| SchemaError::ScoreOutOfRange(score))
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    required(object, field)?
        .as_str()
        .map(str::to_string)
        .ok_or(SchemaError::WrongType {
            field,
            expected: "a string",
        })
}

fn string_list_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, SchemaError> {
    let wrong_type = SchemaError::WrongType {
        field,
        expected: "an array of strings",
    };
    let items = required(object, field)?
        .as_array()
        .ok_or_else(|| wrong_type.clone())?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| wrong_type.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"score":82,"suggestion":"Add metrics","justification":"Strong match","edits":["Quantify achievements"]}"#;

    #[test]
    fn test_bare_json_is_accepted() {
        let fields = validate_response(VALID).unwrap();
        assert_eq!(fields.score, 82);
        assert_eq!(fields.suggestion, "Add metrics");
        assert_eq!(fields.justification, "Strong match");
        assert_eq!(fields.edits, vec!["Quantify achievements".to_string()]);
    }

    #[test]
    fn test_prose_wrapped_fence_is_located() {
        let raw = "Here is the result: ```{\"score\":70,\"suggestion\":\"s\",\"justification\":\"j\",\"edits\":[]}```";
        let fields = validate_response(raw).unwrap();
        assert_eq!(fields.score, 70);
        assert!(fields.edits.is_empty());
    }

    #[test]
    fn test_json_tagged_fence_is_located() {
        let raw = format!("```json\n{VALID}\n```");
        assert_eq!(locate_json_payload(&raw).unwrap(), VALID);
    }

    #[test]
    fn test_braces_inside_strings_do_not_end_payload() {
        let raw = r#"Result {"score":50,"suggestion":"Use {braces} and \"quotes\" }","justification":"ok","edits":["a}"]} trailing }"#;
        let fields = validate_response(raw).unwrap();
        assert_eq!(fields.suggestion, "Use {braces} and \"quotes\" }");
        assert_eq!(fields.edits, vec!["a}".to_string()]);
    }

    #[test]
    fn test_unbalanced_brace_before_payload_is_skipped() {
        let raw = format!("stray {{ then {VALID}");
        assert_eq!(validate_response(&raw).unwrap().score, 82);
        let raw = format!("note: }} {VALID}");
        assert_eq!(validate_response(&raw).unwrap().score, 82);
    }

    #[test]
    fn test_no_json_is_explicit_failure() {
        assert_eq!(
            validate_response("I cannot score this resume."),
            Err(SchemaError::NoPayload)
        );
        assert_eq!(validate_response(""), Err(SchemaError::NoPayload));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = parse_score_fields("{\"score\": 10,}").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert_eq!(parse_score_fields("[1,2,3]"), Err(SchemaError::NotAnObject));
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for field in ["score", "suggestion", "justification", "edits"] {
            let mut value: Value = serde_json::from_str(VALID).unwrap();
            value.as_object_mut().unwrap().remove(field);
            let err = parse_score_fields(&value.to_string()).unwrap_err();
            assert_eq!(err, SchemaError::MissingField(field));
        }
    }

    #[test]
    fn test_null_field_counts_as_missing() {
        let raw = r#"{"score":null,"suggestion":"s","justification":"j","edits":[]}"#;
        assert_eq!(parse_score_fields(raw), Err(SchemaError::MissingField("score")));
    }

    #[test]
    fn test_score_out_of_range_is_not_clamped() {
        let high = r#"{"score":101,"suggestion":"s","justification":"j","edits":[]}"#;
        let low = r#"{"score":-1,"suggestion":"s","justification":"j","edits":[]}"#;
        assert_eq!(parse_score_fields(high), Err(SchemaError::ScoreOutOfRange(101)));
        assert_eq!(parse_score_fields(low), Err(SchemaError::ScoreOutOfRange(-1)));
    }

    #[test]
    fn test_huge_score_is_out_of_range_not_wrong_type() {
        let raw = r#"{"score":18446744073709551615,"suggestion":"s","justification":"j","edits":[]}"#;
        assert_eq!(
            parse_score_fields(raw),
            Err(SchemaError::ScoreOutOfRange(18_446_744_073_709_551_615))
        );
        let raw = r#"{"score":9223372036854775808,"suggestion":"s","justification":"j","edits":[]}"#;
        assert!(matches!(
            parse_score_fields(raw),
            Err(SchemaError::ScoreOutOfRange(_))
        ));
    }

    #[test]
    fn test_score_bounds_are_inclusive() {
        let zero = r#"{"score":0,"suggestion":"s","justification":"j","edits":[]}"#;
        let hundred = r#"{"score":100,"suggestion":"s","justification":"j","edits":[]}"#;
        assert_eq!(parse_score_fields(zero).unwrap().score, 0);
        assert_eq!(parse_score_fields(hundred).unwrap().score, 100);
    }

    #[test]
    fn test_fractional_or_string_score_is_wrong_type() {
        let fractional = r#"{"score":82.5,"suggestion":"s","justification":"j","edits":[]}"#;
        let string = r#"{"score":"82","suggestion":"s","justification":"j","edits":[]}"#;
        for raw in [fractional, string] {
            assert!(matches!(
                parse_score_fields(raw),
                Err(SchemaError::WrongType { field: "score", .. })
            ));
        }
    }

    #[test]
    fn test_edits_must_be_strings() {
        let raw = r#"{"score":5,"suggestion":"s","justification":"j","edits":["ok", 3]}"#;
        assert!(matches!(
            parse_score_fields(raw),
            Err(SchemaError::WrongType { field: "edits", .. })
        ));
        let raw = r#"{"score":5,"suggestion":"s","justification":"j","edits":"one edit"}"#;
        assert!(matches!(
            parse_score_fields(raw),
            Err(SchemaError::WrongType { field: "edits", .. })
        ));
    }

    #[test]
    fn test_suggestion_must_be_string() {
        let raw = r#"{"score":5,"suggestion":["s"],"justification":"j","edits":[]}"#;
        assert_eq!(
            parse_score_fields(raw),
            Err(SchemaError::WrongType {
                field: "suggestion",
                expected: "a string"
            })
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let raw = r#"{"score":64,"suggestion":"s","justification":"j","edits":[],"confidence":0.9,"notes":{"a":1}}"#;
        assert_eq!(parse_score_fields(raw).unwrap().score, 64);
    }
}
