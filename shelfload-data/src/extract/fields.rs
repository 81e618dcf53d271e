//! Shared JSON helpers for the extractors.

use serde_json::{Map, Value};

use super::RecordError;

pub(super) type JsonObject = Map<String, Value>;

/// Drop the tag in front of the first `{` and parse the rest as an object.
pub(super) fn parse_tagged_object(line: &str) -> Result<JsonObject, RecordError> {
    let start = line.find('{').ok_or(RecordError::MissingObject)?;
    let mut payload = line.get(start..).unwrap_or_default().as_bytes().to_vec();
    let value: Value = simd_json::from_slice(payload.as_mut_slice())
        .map_err(|source| RecordError::Json { source })?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(RecordError::NotAnObject),
    }
}

/// Read an optional field as text.
///
/// Absent and `null` fields read as the empty string; strings are returned
/// as-is and every other value as its compact JSON text.
pub(super) fn optional_string(object: &JsonObject, field: &str) -> String {
    match object.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(value) => text_of(value),
    }
}

/// Read a field that must be present and hold a string.
pub(super) fn required_str<'a>(
    object: &'a JsonObject,
    field: &str,
    path: &str,
) -> Result<&'a str, RecordError> {
    match object.get(field) {
        Some(Value::String(text)) => Ok(text),
        None | Some(Value::Null) => Err(RecordError::missing(path)),
        Some(_) => Err(RecordError::invalid(path, "a string")),
    }
}

/// Return the nested object under `field`, treating any other shape as
/// absent.
pub(super) fn optional_object<'a>(object: &'a JsonObject, field: &str) -> Option<&'a JsonObject> {
    object.get(field).and_then(Value::as_object)
}

/// Return the array under `field`, treating any other shape as absent.
pub(super) fn optional_array<'a>(object: &'a JsonObject, field: &str) -> Option<&'a [Value]> {
    object
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

/// Render a scalar or container as text, leaving strings unquoted.
pub(super) fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Remove a leading `prefix` from an Open Library key.
pub(super) fn strip_key_prefix(key: &str, prefix: &str) -> String {
    key.strip_prefix(prefix).unwrap_or(key).to_owned()
}
