//! Speaking session results as submitted by the client.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Client-supplied timestamp. Stored exactly as sent, never normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    Number(Number),
}

/// One logged speaking session.
///
/// Every field is optional: a payload that omits a field is stored with
/// `null` in its place rather than rejected. Numbers keep the JSON
/// representation they arrived with, so `42` reads back as `42`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub score: Option<Number>,
    pub duration: Option<Number>,
    pub timestamp: Option<Timestamp>,
}

/// Reasons a save-session payload could not be turned into a [`SessionRecord`].
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Invalid field: {0}")]
    InvalidField(#[source] serde_json::Error),
}

impl SessionRecord {
    /// Parse a raw request body.
    ///
    /// Unknown keys are ignored. Known keys must have a compatible type.
    pub fn from_json_slice(payload: &[u8]) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_slice(payload).map_err(PayloadError::InvalidJson)?;
        if !value.is_object() {
            return Err(PayloadError::NotAnObject(json_kind(&value)));
        }
        serde_json::from_value(value).map_err(PayloadError::InvalidField)
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_payload() {
        let record = SessionRecord::from_json_slice(
            br#"{"score":95.5,"duration":42,"timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(record.score, Number::from_f64(95.5));
        assert_eq!(record.duration, Some(Number::from(42)));
        assert_eq!(
            record.timestamp,
            Some(Timestamp::Text("2024-01-01T00:00:00Z".to_string()))
        );
    }

    #[test]
    fn test_missing_fields_become_none() {
        let record = SessionRecord::from_json_slice(br#"{"score": 10}"#).unwrap();
        assert_eq!(record.score, Some(Number::from(10)));
        assert!(record.duration.is_none());
        assert!(record.timestamp.is_none());

        let empty = SessionRecord::from_json_slice(b"{}").unwrap();
        assert_eq!(empty, SessionRecord::default());
    }

    #[test]
    fn test_numeric_timestamp_and_unknown_keys() {
        let record =
            SessionRecord::from_json_slice(br#"{"timestamp": 1704067200123, "extra": true}"#)
                .unwrap();
        assert_eq!(
            record.timestamp,
            Some(Timestamp::Number(Number::from(1704067200123u64)))
        );
    }

    #[test]
    fn test_numbers_keep_their_representation() {
        let payload = br#"{"score":80,"duration":42.25,"timestamp":9007199254740993}"#;
        let record = SessionRecord::from_json_slice(payload).unwrap();

        assert_eq!(serde_json::to_vec(&record).unwrap(), payload.to_vec());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = SessionRecord::from_json_slice(b"{not json").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON"));

        let err = SessionRecord::from_json_slice(b"").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidJson(_)));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = SessionRecord::from_json_slice(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, PayloadError::NotAnObject("an array")));

        let err = SessionRecord::from_json_slice(b"null").unwrap_err();
        assert_eq!(err.to_string(), "Expected a JSON object, got null");
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let err = SessionRecord::from_json_slice(br#"{"score": "high"}"#).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidField(_)));

        let err = SessionRecord::from_json_slice(br#"{"timestamp": true}"#).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidField(_)));
    }

    #[test]
    fn test_serialized_form_keeps_null_fields() {
        let value = serde_json::to_value(SessionRecord {
            score: Some(Number::from(50)),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(value, json!({"score": 50, "duration": null, "timestamp": null}));
    }
}
