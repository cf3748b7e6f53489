//! Payload validation ("serializer" layer)
//!
//! Reads a JSON object field by field and collects per-field error messages
//! in the shape REST clients expect:
//!
//! ```json
//! { "Price": ["A valid number is required."], "Title": ["This field is required."] }
//! ```
//!
//! Read-only and unknown keys are ignored. In partial mode (PATCH) absent
//! fields are not reported; the caller falls back to the stored values.

mod fields;

pub use fields::Fields;

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Key used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

// ── Messages ────────────────────────────────────────────────────────

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_NUMBER: &str = "A valid number is required.";
pub const INVALID_DATETIME: &str = "Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z].";

/// Per-field validation errors
///
/// Serializes transparently as `{"field": ["message", ...]}`; keys are kept
/// sorted so responses are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("invalid fields: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors with a single message on a single field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Type name used in "expected X but got Y" messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::single("Title", REQUIRED);
        errors.add("Price", INVALID_NUMBER);
        errors.add("Price", "second");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Price": [INVALID_NUMBER, "second"],
                "Title": [REQUIRED],
            })
        );
        assert_eq!(errors.to_string(), "invalid fields: Price, Title");
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!([1])), "list");
        assert_eq!(json_type_name(&serde_json::json!("x")), "str");
        assert_eq!(json_type_name(&serde_json::json!(1.5)), "float");
        assert_eq!(json_type_name(&serde_json::json!(3)), "int");
    }
}
