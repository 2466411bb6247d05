use bon::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::internal::{Endpoint, HttpMethod};
use crate::response_format::ResponseFormat;
use crate::tool::{AssistantTool, ToolResources};
use crate::validation::{self, Metadata, Validate, ValidationError};
use crate::{AssistantsClient, AssistantsError, DeletionStatus, ListQuery, ListResponse, ReasoningEffort};

/// An assistant as returned by the API.
///
/// Fields the API did not return stay `None` and are skipped on serialization.
/// Fields this type does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AssistantTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for `POST /assistants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct CreateAssistantRequest {
    /// ID of the model to use.
    #[builder(into)]
    pub model: String,

    /// Name of the assistant, at most 256 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 256))]
    #[builder(into)]
    pub name: Option<String>,

    /// Description of the assistant, at most 512 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 512))]
    #[builder(into)]
    pub description: Option<String>,

    /// System instructions, at most 256,000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 256000))]
    #[builder(into)]
    pub instructions: Option<String>,

    /// Tools enabled on the assistant, at most 128.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 128))]
    pub tools: Option<Vec<AssistantTool>>,

    /// Resources used by the assistant's tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    /// Up to 16 key-value pairs; keys at most 64 and values at most 512 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Sampling temperature, 0-2.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f64>,

    /// Nucleus sampling probability mass, 0-1.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f64>,

    /// Output format: "auto", {"type": "text"}, {"type": "json_object"} or {"type": "json_schema", ...}.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Reasoning effort for reasoning models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// Request body for `POST /assistants/{assistant_id}`. Only provided fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ModifyAssistantRequest {
    /// ID of the model to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,

    /// Name of the assistant, at most 256 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 256))]
    #[builder(into)]
    pub name: Option<String>,

    /// Description of the assistant, at most 512 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 512))]
    #[builder(into)]
    pub description: Option<String>,

    /// System instructions, at most 256,000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 256000))]
    #[builder(into)]
    pub instructions: Option<String>,

    /// Tools enabled on the assistant, at most 128. Replaces the existing list.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 128))]
    pub tools: Option<Vec<AssistantTool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    /// Up to 16 key-value pairs; keys at most 64 and values at most 512 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Sampling temperature, 0-2.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f64>,

    /// Nucleus sampling probability mass, 0-1.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// Constraints shared by create and modify.
#[allow(clippy::too_many_arguments)]
fn validate_assistant_fields(
    name: Option<&str>,
    description: Option<&str>,
    instructions: Option<&str>,
    tools: Option<&[AssistantTool]>,
    tool_resources: Option<&ToolResources>,
    metadata: Option<&Metadata>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    response_format: Option<&ResponseFormat>,
    reasoning_effort: Option<&ReasoningEffort>,
) -> Result<(), ValidationError> {
    if let Some(name) = name {
        validation::max_chars("name", name, 256)?;
    }
    if let Some(description) = description {
        validation::max_chars("description", description, 512)?;
    }
    if let Some(instructions) = instructions {
        validation::max_chars("instructions", instructions, 256_000)?;
    }
    if let Some(tools) = tools {
        validation::max_items("tools", tools, 128)?;
        validation::each("tools", tools)?;
    }
    if let Some(resources) = tool_resources {
        resources.validate().map_err(|e| e.within("tool_resources"))?;
    }
    if let Some(metadata) = metadata {
        validation::metadata("metadata", metadata)?;
    }
    if let Some(temperature) = temperature {
        validation::in_range("temperature", temperature, 0.0, 2.0)?;
    }
    if let Some(top_p) = top_p {
        validation::in_range("top_p", top_p, 0.0, 1.0)?;
    }
    if let Some(format) = response_format {
        format.validate().map_err(|e| e.within("response_format"))?;
    }
    validation::known_value(
        "reasoning_effort",
        reasoning_effort.and_then(ReasoningEffort::as_unknown),
    )
}

impl Validate for CreateAssistantRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("model", &self.model)?;
        validate_assistant_fields(
            self.name.as_deref(),
            self.description.as_deref(),
            self.instructions.as_deref(),
            self.tools.as_deref(),
            self.tool_resources.as_ref(),
            self.metadata.as_ref(),
            self.temperature,
            self.top_p,
            self.response_format.as_ref(),
            self.reasoning_effort.as_ref(),
        )
    }
}

impl Validate for ModifyAssistantRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(model) = &self.model {
            validation::non_empty("model", model)?;
        }
        validate_assistant_fields(
            self.name.as_deref(),
            self.description.as_deref(),
            self.instructions.as_deref(),
            self.tools.as_deref(),
            self.tool_resources.as_ref(),
            self.metadata.as_ref(),
            self.temperature,
            self.top_p,
            self.response_format.as_ref(),
            self.reasoning_effort.as_ref(),
        )
    }
}

impl AssistantsClient {
    /// Create an assistant
    pub async fn create_assistant(
        &self,
        request: &CreateAssistantRequest,
    ) -> Result<Assistant, AssistantsError> {
        request.validate()?;
        let endpoint = Endpoint::new("assistants", HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Retrieve an assistant
    pub async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant, AssistantsError> {
        let assistant_id = validation::path_id("assistant_id", assistant_id)?;
        let endpoint = Endpoint::new(format!("assistants/{assistant_id}"), HttpMethod::Get);
        self.request_builder().request(&endpoint).await
    }

    /// List assistants
    pub async fn list_assistants(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<Assistant>, AssistantsError> {
        query.validate()?;
        let endpoint = Endpoint::new("assistants", HttpMethod::Get).with_query(query)?;
        self.request_builder().request(&endpoint).await
    }

    /// Modify an assistant
    pub async fn modify_assistant(
        &self,
        assistant_id: &str,
        request: &ModifyAssistantRequest,
    ) -> Result<Assistant, AssistantsError> {
        let assistant_id = validation::path_id("assistant_id", assistant_id)?;
        request.validate()?;
        let endpoint = Endpoint::new(format!("assistants/{assistant_id}"), HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Delete an assistant
    pub async fn delete_assistant(&self, assistant_id: &str) -> Result<DeletionStatus, AssistantsError> {
        let assistant_id = validation::path_id("assistant_id", assistant_id)?;
        let endpoint = Endpoint::new(format!("assistants/{assistant_id}"), HttpMethod::Delete);
        let status: DeletionStatus = self.request_builder().request(&endpoint).await?;
        Ok(status.with_default_object("assistant.deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_skips_unset_fields() {
        let request = CreateAssistantRequest::builder()
            .model("gpt-4o")
            .name("Math Tutor")
            .build();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"model": "gpt-4o", "name": "Math Tutor"})
        );
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateAssistantRequest::builder()
            .model("gpt-4o")
            .temperature(2.5)
            .build();
        assert_eq!(request.validate().unwrap_err().field, "temperature");

        let request = CreateAssistantRequest::builder()
            .model("gpt-4o")
            .name("n".repeat(257))
            .build();
        assert_eq!(request.validate().unwrap_err().field, "name");

        let request = CreateAssistantRequest::builder()
            .model("gpt-4o")
            .tools(vec![AssistantTool::CodeInterpreter; 129])
            .build();
        assert_eq!(request.validate().unwrap_err().field, "tools");

        let request = CreateAssistantRequest::builder().model("  ").build();
        assert_eq!(request.validate().unwrap_err().field, "model");
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let err = serde_json::from_value::<CreateAssistantRequest>(json!({
            "model": "gpt-4o",
            "file_ids": ["file_1"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `file_ids`"));
    }

    #[test]
    fn test_modify_request_sends_only_provided_fields() {
        let request = ModifyAssistantRequest::builder()
            .instructions("Be concise.")
            .build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"instructions": "Be concise."})
        );
        assert_eq!(
            serde_json::to_value(ModifyAssistantRequest::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_assistant_roundtrip_preserves_fields() {
        let payload = json!({
            "id": "asst_abc123",
            "object": "assistant",
            "created_at": 1699009709,
            "name": "HR Helper",
            "model": "gpt-4o",
            "instructions": "You are an HR bot.",
            "tools": [{"type": "file_search"}],
            "tool_resources": {"file_search": {"vector_store_ids": ["vs_abc123"]}},
            "metadata": {},
            "top_p": 1.0,
            "temperature": 1.0,
            "response_format": "auto",
            "future_field": {"kept": true}
        });

        let assistant: Assistant = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(assistant.name.as_deref(), Some("HR Helper"));
        assert_eq!(assistant.response_format, Some(ResponseFormat::auto()));
        assert!(assistant.description.is_none());
        assert_eq!(assistant.extra["future_field"], json!({"kept": true}));

        let value = serde_json::to_value(&assistant).unwrap();
        assert_eq!(value, payload);
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_assistant_decodes_nested_unknown_values() {
        let payload = json!({
            "id": "asst_abc123",
            "object": "assistant",
            "created_at": 1699009709,
            "model": "o3-mini",
            "tools": [{
                "type": "file_search",
                "file_search": {
                    "max_num_results": 20,
                    "new_knob": 1,
                    "ranking_options": {"ranker": "default_2025_01_01", "score_threshold": 0.0}
                }
            }],
            "tool_resources": {
                "file_search": {"vector_store_ids": ["vs_abc123"], "vector_stores": []},
                "web_search": {}
            },
            "reasoning_effort": "minimal"
        });

        let assistant: Assistant = serde_json::from_value(payload.clone()).unwrap();
        let resources = assistant.tool_resources.as_ref().unwrap();
        assert_eq!(resources.extra["web_search"], json!({}));
        assert_eq!(assistant.reasoning_effort, Some(ReasoningEffort::Other("minimal".into())));
        assert_eq!(serde_json::to_value(&assistant).unwrap(), payload);
    }

    #[test]
    fn test_create_request_rejects_nested_unknown_fields() {
        let request: CreateAssistantRequest = serde_json::from_value(json!({
            "model": "gpt-4o",
            "tools": [{"type": "file_search", "file_search": {"max_num_results": 20, "new_knob": 1}}]
        }))
        .unwrap();
        assert_eq!(request.validate().unwrap_err().field, "tools[0].file_search.new_knob");

        let request: CreateAssistantRequest = serde_json::from_value(json!({
            "model": "gpt-4o",
            "tool_resources": {"code_interpreter": {"file_ids": [], "files": []}}
        }))
        .unwrap();
        assert_eq!(
            request.validate().unwrap_err().field,
            "tool_resources.code_interpreter.files"
        );
    }
}
