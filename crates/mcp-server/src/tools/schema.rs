//! JSON Schema builders for tool inputs

use serde_json::{json, Map, Value};

use crate::protocol::McpInputSchema;

/// Accumulates properties for a tool's `inputSchema`
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property with an explicit schema
    pub fn property(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// String property with optional length bounds
    pub fn string(
        self,
        name: &str,
        description: &str,
        required: bool,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> Self {
        let mut schema = json!({ "type": "string", "description": description });
        if let Some(min) = min_length {
            schema["minLength"] = json!(min);
        }
        if let Some(max) = max_length {
            schema["maxLength"] = json!(max);
        }
        self.property(name, schema, required)
    }

    /// Optional string with a default value
    pub fn string_with_default(self, name: &str, description: &str, default: &str) -> Self {
        self.property(
            name,
            json!({ "type": "string", "description": description, "default": default }),
            false,
        )
    }

    /// Integer property with optional bounds and default
    pub fn integer(
        self,
        name: &str,
        description: &str,
        required: bool,
        minimum: Option<i64>,
        maximum: Option<i64>,
        default: Option<i64>,
    ) -> Self {
        let mut schema = json!({ "type": "integer", "description": description });
        if let Some(min) = minimum {
            schema["minimum"] = json!(min);
        }
        if let Some(max) = maximum {
            schema["maximum"] = json!(max);
        }
        if let Some(default) = default {
            schema["default"] = json!(default);
        }
        self.property(name, schema, required)
    }

    pub fn boolean(self, name: &str, description: &str, default: bool) -> Self {
        self.property(
            name,
            json!({ "type": "boolean", "description": description, "default": default }),
            false,
        )
    }

    /// String restricted to `values`
    pub fn enumeration(
        self,
        name: &str,
        description: &str,
        values: &[&str],
        required: bool,
        default: Option<&str>,
    ) -> Self {
        let mut schema = json!({ "type": "string", "description": description, "enum": values });
        if let Some(default) = default {
            schema["default"] = json!(default);
        }
        self.property(name, schema, required)
    }

    /// Array of integer IDs
    pub fn id_list(self, name: &str, description: &str, max_items: usize) -> Self {
        self.property(
            name,
            json!({
                "type": "array",
                "description": description,
                "items": { "type": "integer" },
                "maxItems": max_items
            }),
            false,
        )
    }

    /// `markdown` / `json` output selector
    pub fn response_format(self) -> Self {
        self.enumeration(
            "response_format",
            "Output format: 'markdown' or 'json'",
            &["markdown", "json"],
            false,
            Some("markdown"),
        )
    }

    pub fn build(self) -> McpInputSchema {
        McpInputSchema {
            schema_type: "object".to_string(),
            properties: Some(self.properties),
            required: if self.required.is_empty() {
                None
            } else {
                Some(self.required)
            },
            additional_properties: Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_object_schema() {
        let schema = SchemaBuilder::new()
            .string("host", "Server hostname", true, Some(1), Some(255))
            .integer("port", "Server port", false, Some(1), Some(65535), None)
            .response_format()
            .build();

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["additionalProperties"], false);
        assert_eq!(value["required"], json!(["host"]));
        assert_eq!(value["properties"]["host"]["maxLength"], 255);
        assert_eq!(value["properties"]["port"]["minimum"], 1);
        assert_eq!(value["properties"]["response_format"]["default"], "markdown");
    }
}
