use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// A request field that does not satisfy its declared constraint.
///
/// `field` is a path into the request (`tools[1].function.name`), `constraint`
/// describes what was expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for '{field}': {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Re-roots the field path under `parent`.
    #[must_use]
    pub fn within(self, parent: impl fmt::Display) -> Self {
        Self {
            field: format!("{parent}.{}", self.field),
            constraint: self.constraint,
        }
    }
}

/// Checks a request against the field constraints of the Assistants API.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Key/value pairs attached to an object.
///
/// The API accepts at most 16 pairs, keys up to 64 characters and values up
/// to 512 characters.
pub type Metadata = BTreeMap<String, String>;

pub(crate) const METADATA_KEY_MAX: usize = 64;
pub(crate) const METADATA_VALUE_MAX: usize = 512;

pub(crate) fn max_chars(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn max_items<T>(field: &str, items: &[T], max: usize) -> Result<(), ValidationError> {
    if items.len() > max {
        return Err(ValidationError::new(
            field,
            format!("must contain at most {max} items"),
        ));
    }
    Ok(())
}

pub(crate) fn in_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

pub(crate) fn int_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

/// Function and schema names: `^[a-zA-Z0-9_-]+$`, at most 64 characters.
pub(crate) fn identifier_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::new(
            field,
            "must match the pattern ^[a-zA-Z0-9_-]+$",
        ));
    }
    max_chars(field, value, 64)
}

pub(crate) fn metadata(field: &str, metadata: &Metadata) -> Result<(), ValidationError> {
    for (key, value) in metadata {
        max_chars(&format!("{field}.{key}"), key, METADATA_KEY_MAX)?;
        max_chars(&format!("{field}.{key}"), value, METADATA_VALUE_MAX)?;
    }
    Ok(())
}

pub(crate) fn each<T: Validate>(field: &str, items: &[T]) -> Result<(), ValidationError> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(index, item)| item.validate().map_err(|e| e.within(format!("{field}[{index}]"))))
}

/// Nested request objects decode leniently so responses keep unknown fields;
/// requests must not carry any.
pub(crate) fn no_unknown_fields(extra: &Map<String, Value>) -> Result<(), ValidationError> {
    match extra.keys().next() {
        Some(field) => Err(ValidationError::new(field.as_str(), "unknown field")),
        None => Ok(()),
    }
}

pub(crate) fn known_value(field: &str, unknown: Option<&str>) -> Result<(), ValidationError> {
    match unknown {
        Some(value) => Err(ValidationError::new(field, format!("unknown value `{value}`"))),
        None => Ok(()),
    }
}

/// Identifiers are interpolated into the request path.
pub fn path_id<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() || value.contains(['/', '?', '#']) || value.trim() != value {
        return Err(ValidationError::new(
            field,
            "must be a non-empty identifier without '/', '?' or '#'",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_name_accepts_allowed_characters() {
        assert!(identifier_name("name", "get_current-weather_2").is_ok());
    }

    #[test]
    fn test_identifier_name_rejects_space() {
        let err = identifier_name("function.name", "get weather").unwrap_err();
        assert_eq!(err.field, "function.name");
        assert!(err.constraint.contains("^[a-zA-Z0-9_-]+$"));
    }

    #[test]
    fn test_identifier_name_rejects_long_names() {
        let name = "a".repeat(65);
        let err = identifier_name("name", &name).unwrap_err();
        assert_eq!(err.constraint, "must be at most 64 characters");
    }

    #[test]
    fn test_max_chars_counts_characters_not_bytes() {
        let value = "é".repeat(256);
        assert!(max_chars("name", &value, 256).is_ok());
        assert!(max_chars("name", &format!("{value}x"), 256).is_err());
    }

    #[test]
    fn test_in_range_rejects_nan() {
        assert!(in_range("temperature", f64::NAN, 0.0, 2.0).is_err());
        assert!(in_range("temperature", 2.0, 0.0, 2.0).is_ok());
        assert!(in_range("temperature", 2.01, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_metadata_limits() {
        let mut map = Metadata::new();
        map.insert("k".repeat(65), "v".to_string());
        let err = metadata("metadata", &map).unwrap_err();
        assert!(err.field.starts_with("metadata."));

        let mut map = Metadata::new();
        map.insert("key".to_string(), "v".repeat(513));
        assert!(metadata("metadata", &map).is_err());
    }

    #[test]
    fn test_path_id() {
        assert_eq!(path_id("thread_id", "thread_abc123").unwrap(), "thread_abc123");
        assert!(path_id("thread_id", "").is_err());
        assert!(path_id("thread_id", "thread/../assistants").is_err());
        assert!(path_id("thread_id", "thread?x=1").is_err());
    }

    #[test]
    fn test_no_unknown_fields_names_first_key() {
        assert!(no_unknown_fields(&Map::new()).is_ok());
        let mut extra = Map::new();
        extra.insert("new_knob".to_string(), Value::from(1));
        let err = no_unknown_fields(&extra).unwrap_err().within("file_search");
        assert_eq!(err.field, "file_search.new_knob");
        assert_eq!(err.constraint, "unknown field");
    }

    #[test]
    fn test_within_prefixes_field() {
        let err = ValidationError::new("function.name", "bad").within("tools[1]");
        assert_eq!(err.field, "tools[1].function.name");
        assert_eq!(err.to_string(), "invalid value for 'tools[1].function.name': bad");
    }
}
