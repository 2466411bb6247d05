use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{self, Validate, ValidationError};

/// Output format the model must produce.
///
/// Either the `"auto"` string or a tagged object; the `json_schema` variant
/// nests the schema payload beneath a `json_schema` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResponseFormat {
    Auto(AutoFormat),
    Format(OutputFormat),
}

/// The `"auto"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AutoFormat {
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    JsonObject,
    JsonSchema { json_schema: JsonSchemaFormat },
}

/// A named JSON Schema for structured outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct JsonSchemaFormat {
    /// Name of the format: a-z, A-Z, 0-9, underscores and dashes, at most 64 characters.
    #[schemars(length(min = 1, max = 64))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The schema for the response format, described as a JSON Schema object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    /// Whether to enable strict schema adherence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl ResponseFormat {
    pub fn auto() -> Self {
        Self::Auto(AutoFormat::Auto)
    }

    pub fn text() -> Self {
        Self::Format(OutputFormat::Text)
    }

    pub fn json_object() -> Self {
        Self::Format(OutputFormat::JsonObject)
    }

    /// Helper for constructing the `json_schema` variant without repeating the type tag.
    pub fn json_schema(json_schema: JsonSchemaFormat) -> Self {
        Self::Format(OutputFormat::JsonSchema { json_schema })
    }
}

impl Validate for ResponseFormat {
    fn validate(&self) -> Result<(), ValidationError> {
        let Self::Format(OutputFormat::JsonSchema { json_schema }) = self else {
            return Ok(());
        };

        validation::identifier_name("json_schema.name", &json_schema.name)?;
        if json_schema.schema.as_ref().is_some_and(|schema| !schema.is_object()) {
            return Err(ValidationError::new(
                "json_schema.schema",
                "must be a JSON Schema object",
            ));
        }
        validation::no_unknown_fields(&json_schema.extra).map_err(|e| e.within("json_schema"))
    }
}
