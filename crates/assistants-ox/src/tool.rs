use bon::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{self, Validate, ValidationError};

/// A tool enabled on an assistant or run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantTool {
    /// Lets the model write and run Python code in a sandbox.
    CodeInterpreter,
    /// Lets the model search attached vector stores.
    FileSearch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_search: Option<FileSearchSettings>,
    },
    /// A developer-defined function the model may ask the caller to run.
    Function { function: FunctionDefinition },
}

impl AssistantTool {
    pub fn code_interpreter() -> Self {
        Self::CodeInterpreter
    }

    pub fn file_search() -> Self {
        Self::FileSearch { file_search: None }
    }

    pub fn function(function: FunctionDefinition) -> Self {
        Self::Function { function }
    }
}

impl Validate for AssistantTool {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::CodeInterpreter => Ok(()),
            Self::FileSearch { file_search } => file_search
                .as_ref()
                .map_or(Ok(()), |settings| settings.validate().map_err(|e| e.within("file_search"))),
            Self::Function { function } => function.validate().map_err(|e| e.within("function")),
        }
    }
}

/// Overrides for the file search tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct FileSearchSettings {
    /// Maximum number of results to return, 1-50.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 50))]
    pub max_num_results: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_options: Option<RankingOptions>,

    /// Fields this crate does not model. Requests must leave it empty.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Validate for FileSearchSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(max) = self.max_num_results {
            validation::int_range("max_num_results", max, 1, 50)?;
        }
        if let Some(options) = &self.ranking_options {
            options.validate().map_err(|e| e.within("ranking_options"))?;
        }
        validation::no_unknown_fields(&self.extra)
    }
}

/// Ranking configuration for file search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct RankingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranker: Option<Ranker>,

    /// Minimum relevance score, 0-1.
    #[schemars(range(min = 0.0, max = 1.0))]
    pub score_threshold: f64,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Validate for RankingOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::known_value("ranker", self.ranker.as_ref().and_then(Ranker::as_unknown))?;
        validation::in_range("score_threshold", self.score_threshold, 0.0, 1.0)?;
        validation::no_unknown_fields(&self.extra)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Ranker {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "default_2024_08_21")]
    Default20240821,
    /// A ranker this crate does not name yet.
    #[serde(untagged)]
    #[schemars(skip)]
    Other(String),
}

impl Ranker {
    pub fn as_unknown(&self) -> Option<&str> {
        match self {
            Self::Other(value) => Some(value),
            _ => None,
        }
    }
}

/// A function the model can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[schemars(extend("additionalProperties" = false))]
pub struct FunctionDefinition {
    /// Function name: a-z, A-Z, 0-9, underscores and dashes, at most 64 characters.
    #[builder(into)]
    #[schemars(length(min = 1, max = 64))]
    pub name: String,

    /// What the function does, used by the model to choose when to call it.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,

    /// Parameters the function accepts, described as a JSON Schema object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    /// Whether to enable strict schema adherence for the arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    #[builder(default)]
    pub extra: Map<String, Value>,
}

impl Validate for FunctionDefinition {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::identifier_name("name", &self.name)?;
        if let Some(parameters) = &self.parameters {
            if !parameters.is_object() {
                return Err(ValidationError::new(
                    "parameters",
                    "must be a JSON Schema object",
                ));
            }
        }
        validation::no_unknown_fields(&self.extra)
    }
}

/// Resources made available to the tools, keyed by tool type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct ToolResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<CodeInterpreterResources>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Validate for ToolResources {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(resources) = &self.code_interpreter {
            validation::no_unknown_fields(&resources.extra).map_err(|e| e.within("code_interpreter"))?;
        }
        if let Some(resources) = &self.file_search {
            validation::no_unknown_fields(&resources.extra).map_err(|e| e.within("file_search"))?;
        }
        if let Some(files) = self
            .code_interpreter
            .as_ref()
            .and_then(|resources| resources.file_ids.as_deref())
        {
            validation::max_items("code_interpreter.file_ids", files, 20)?;
        }
        if let Some(stores) = self
            .file_search
            .as_ref()
            .and_then(|resources| resources.vector_store_ids.as_deref())
        {
            validation::max_items("file_search.vector_store_ids", stores, 1)?;
        }
        validation::no_unknown_fields(&self.extra)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct CodeInterpreterResources {
    /// File IDs available to the code interpreter, at most 20.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 20))]
    pub file_ids: Option<Vec<String>>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct FileSearchResources {
    /// Vector store attached to the file search tool, at most 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 1))]
    pub vector_store_ids: Option<Vec<String>>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_function() -> Value {
        json!({
            "type": "function",
            "function": {
                "name": "get_current_weather",
                "description": "Get the current weather in a given location",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "location": {"type": "string"},
                        "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]}
                    },
                    "required": ["location"]
                }
            }
        })
    }

    #[test]
    fn test_tool_variants_roundtrip() {
        let payload = json!([{"type": "code_interpreter"}, weather_function()]);
        let tools: Vec<AssistantTool> = serde_json::from_value(payload.clone()).unwrap();

        assert_eq!(tools[0], AssistantTool::CodeInterpreter);
        let AssistantTool::Function { function } = &tools[1] else {
            panic!("expected function tool");
        };
        assert_eq!(function.name, "get_current_weather");
        assert!(validation::each("tools", &tools).is_ok());

        assert_eq!(serde_json::to_value(&tools).unwrap(), payload);
    }

    #[test]
    fn test_function_name_with_space_is_rejected() {
        let mut payload = weather_function();
        payload["function"]["name"] = json!("get current weather");
        let tools: Vec<AssistantTool> =
            serde_json::from_value(json!([{"type": "code_interpreter"}, payload])).unwrap();

        let err = validation::each("tools", &tools).unwrap_err();
        assert_eq!(err.field, "tools[1].function.name");
    }

    #[test]
    fn test_file_search_settings() {
        let tool: AssistantTool = serde_json::from_value(json!({
            "type": "file_search",
            "file_search": {
                "max_num_results": 51,
                "ranking_options": {"ranker": "default_2024_08_21", "score_threshold": 0.5}
            }
        }))
        .unwrap();
        let err = tool.validate().unwrap_err();
        assert_eq!(err.field, "file_search.max_num_results");

        let tool: AssistantTool = serde_json::from_value(json!({"type": "file_search"})).unwrap();
        assert_eq!(tool, AssistantTool::file_search());
        assert_eq!(serde_json::to_value(&tool).unwrap(), json!({"type": "file_search"}));
    }

    #[test]
    fn test_nested_unknown_fields_are_kept_but_fail_validation() {
        let payload = json!({
            "type": "file_search",
            "file_search": {
                "max_num_results": 20,
                "new_knob": 1,
                "ranking_options": {"ranker": "default_2025_01_01", "score_threshold": 0.0}
            }
        });
        let tool: AssistantTool = serde_json::from_value(payload.clone()).unwrap();
        let AssistantTool::FileSearch { file_search: Some(settings) } = &tool else {
            panic!("expected file search settings");
        };
        assert_eq!(settings.extra["new_knob"], json!(1));
        assert_eq!(
            settings.ranking_options.as_ref().and_then(|o| o.ranker.clone()),
            Some(Ranker::Other("default_2025_01_01".into()))
        );
        assert_eq!(serde_json::to_value(&tool).unwrap(), payload);

        let err = tool.validate().unwrap_err();
        assert_eq!(err.field, "file_search.ranking_options.ranker");

        let AssistantTool::FileSearch { file_search: Some(mut settings) } = tool else {
            unreachable!();
        };
        settings.ranking_options = None;
        let err = settings.validate().unwrap_err().within("file_search");
        assert_eq!(err.field, "file_search.new_knob");
        assert_eq!(err.constraint, "unknown field");
    }

    #[test]
    fn test_unknown_ranker_fails_validation() {
        let options: RankingOptions =
            serde_json::from_value(json!({"ranker": "default_2025_01_01", "score_threshold": 0.5})).unwrap();
        let err = options.validate().unwrap_err();
        assert_eq!(err.field, "ranker");
        assert_eq!(err.constraint, "unknown value `default_2025_01_01`");
    }

    #[test]
    fn test_unknown_tool_type_is_rejected() {
        assert!(serde_json::from_value::<AssistantTool>(json!({"type": "retrieval"})).is_err());
    }

    #[test]
    fn test_tool_resources_limits() {
        let resources = ToolResources {
            file_search: Some(FileSearchResources {
                vector_store_ids: Some(vec!["vs_1".into(), "vs_2".into()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            resources.validate().unwrap_err().field,
            "file_search.vector_store_ids"
        );

        let resources = ToolResources {
            code_interpreter: Some(CodeInterpreterResources {
                file_ids: Some((0..21).map(|i| format!("file_{i}")).collect()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(resources.validate().is_err());
    }

    #[test]
    fn test_function_builder() {
        let function = FunctionDefinition::builder()
            .name("lookup")
            .description("Look something up")
            .build();
        let tool = AssistantTool::function(function);
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({"type": "function", "function": {"name": "lookup", "description": "Look something up"}})
        );
    }
}
