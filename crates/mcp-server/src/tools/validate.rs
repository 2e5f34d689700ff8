//! Tool argument parsing and bounds checks

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{ToolError, ToolResult};
use crate::protocol::McpInputSchema;

/// Field-level checks run after deserialization
pub trait Validate {
    fn validate(&self) -> ToolResult<()>;
}

/// Parse tool arguments against `schema`.
///
/// Arguments must be an object; keys the schema does not declare are
/// rejected; top-level strings are trimmed before deserializing into `T`.
pub fn parse_arguments<T>(schema: &McpInputSchema, arguments: Option<Value>) -> ToolResult<T>
where
    T: DeserializeOwned + Validate,
{
    let mut map = match arguments {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(invalid("arguments must be an object")),
    };

    if let Some(properties) = &schema.properties {
        let mut unknown: Vec<&String> = map.keys().filter(|k| !properties.contains_key(*k)).collect();
        if !unknown.is_empty() {
            unknown.sort();
            let names: Vec<&str> = unknown.iter().map(|k| k.as_str()).collect();
            return Err(invalid(format!(
                "{}: extra inputs are not permitted",
                names.join(", ")
            )));
        }
    }

    for value in map.values_mut() {
        if let Value::String(s) = value {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }

    let parsed: T =
        serde_json::from_value(Value::Object(map)).map_err(|e| invalid(e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

pub(crate) fn invalid(message: impl Into<String>) -> ToolError {
    ToolError::InvalidInput(message.into())
}

/// Character-count bounds for a required string
pub(crate) fn check_len(field: &str, value: &str, min: usize, max: Option<usize>) -> ToolResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(invalid(format!(
            "{}: must be at least {} characters",
            field, min
        )));
    }
    if let Some(max) = max {
        if len > max {
            return Err(invalid(format!(
                "{}: must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}

/// Bounds for an optional string; `None` always passes
pub(crate) fn check_opt_len(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: Option<usize>,
) -> ToolResult<()> {
    match value {
        Some(value) => check_len(field, value, min, max),
        None => Ok(()),
    }
}

/// Inclusive integer range; `max` of `None` means unbounded
pub(crate) fn check_range(field: &str, value: i64, min: i64, max: Option<i64>) -> ToolResult<()> {
    let in_range = value >= min && max.map(|max| value <= max).unwrap_or(true);
    if in_range {
        return Ok(());
    }
    Err(match max {
        Some(max) => invalid(format!("{}: must be between {} and {}", field, min, max)),
        None => invalid(format!(
            "{}: must be greater than or equal to {}",
            field, min
        )),
    })
}

pub(crate) fn check_opt_range(
    field: &str,
    value: Option<i64>,
    min: i64,
    max: Option<i64>,
) -> ToolResult<()> {
    match value {
        Some(value) => check_range(field, value, min, max),
        None => Ok(()),
    }
}

pub(crate) fn check_items<T>(field: &str, items: Option<&[T]>, max: usize) -> ToolResult<()> {
    match items {
        Some(items) if items.len() > max => Err(invalid(format!(
            "{}: must have at most {} items",
            field, max
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::SchemaBuilder;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        #[serde(default)]
        count: Option<i64>,
    }

    impl Validate for Sample {
        fn validate(&self) -> ToolResult<()> {
            check_len("name", &self.name, 1, Some(5))?;
            check_opt_range("count", self.count, 1, Some(10))
        }
    }

    fn schema() -> McpInputSchema {
        SchemaBuilder::new()
            .string("name", "Name", true, Some(1), Some(5))
            .integer("count", "Count", false, Some(1), Some(10), None)
            .build()
    }

    #[test]
    fn test_trims_and_parses() {
        let sample: Sample =
            parse_arguments(&schema(), Some(json!({"name": "  abc  ", "count": 3}))).unwrap();
        assert_eq!(sample.name, "abc");
        assert_eq!(sample.count, Some(3));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = parse_arguments::<Sample>(&schema(), Some(json!({"name": "a", "zeta": 1, "alpha": 2})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: alpha, zeta: extra inputs are not permitted"
        );
    }

    #[test]
    fn test_rejects_non_object_and_missing_fields() {
        let err = parse_arguments::<Sample>(&schema(), Some(json!([1, 2]))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: arguments must be an object");

        let err = parse_arguments::<Sample>(&schema(), None).unwrap_err();
        assert!(err.to_string().contains("missing field `name`"));
    }

    #[test]
    fn test_bounds() {
        let err = parse_arguments::<Sample>(&schema(), Some(json!({"name": "   "}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: name: must be at least 1 characters"
        );

        let err = parse_arguments::<Sample>(&schema(), Some(json!({"name": "toolong"})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: name: must be at most 5 characters"
        );

        let err = parse_arguments::<Sample>(&schema(), Some(json!({"name": "ok", "count": 11})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: count: must be between 1 and 10"
        );

        assert!(check_range("page", 0, 1, None).is_err());
        assert!(check_items("tags", Some(&[1, 2, 3][..]), 2).is_err());
    }
}
