use bon::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::internal::{Endpoint, HttpMethod};
use crate::message::CreateMessageRequest;
use crate::response_format::ResponseFormat;
use crate::thread::CreateThreadRequest;
use crate::tool::{AssistantTool, ToolResources};
use crate::validation::{self, Metadata, Validate, ValidationError};
use crate::{
    AssistantsClient, AssistantsError, IncompleteDetails, ListQuery, ListResponse, ReasoningEffort,
    Usage,
};

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Whether the run can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Failed | Self::Completed | Self::Incomplete | Self::Expired
        )
    }
}

/// An execution of an assistant on a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AssistantTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_strategy: Option<TruncationStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Run {
    /// Tool calls the run is waiting on, empty unless the run requires action.
    pub fn pending_tool_calls(&self) -> &[RequiredToolCall] {
        match &self.required_action {
            Some(RequiredAction::SubmitToolOutputs { submit_tool_outputs }) => {
                &submit_tool_outputs.tool_calls
            }
            None => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredAction {
    SubmitToolOutputs { submit_tool_outputs: SubmitToolOutputsAction },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitToolOutputsAction {
    pub tool_calls: Vec<RequiredToolCall>,
}

/// A function call the caller must execute and report back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments as produced by the model.
    pub arguments: String,
}

/// The last error of a run or run step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastError {
    pub code: LastErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastErrorCode {
    ServerError,
    RateLimitExceeded,
    InvalidPrompt,
}

/// Which tool, if any, the model is allowed or forced to call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    Named(NamedToolChoice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoiceMode {
    None,
    Auto,
    Required,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NamedToolChoice {
    Function { function: FunctionName },
    CodeInterpreter,
    FileSearch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct FunctionName {
    pub name: String,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        Self::Named(NamedToolChoice::Function {
            function: FunctionName {
                name: name.into(),
                extra: Map::new(),
            },
        })
    }
}

impl Validate for ToolChoice {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Named(NamedToolChoice::Function { function }) => {
                validation::identifier_name("function.name", &function.name)?;
                validation::no_unknown_fields(&function.extra).map_err(|e| e.within("function"))
            }
            _ => Ok(()),
        }
    }
}

/// How the thread is truncated before a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct TruncationStrategy {
    #[serde(rename = "type")]
    pub kind: TruncationType,

    /// Number of most recent messages to keep, required for `last_messages`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub last_messages: Option<u32>,

    /// Fields the API returns that this crate does not model.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TruncationType {
    Auto,
    LastMessages,
    #[serde(untagged)]
    #[schemars(skip)]
    Other(String),
}

impl TruncationStrategy {
    pub fn auto() -> Self {
        Self {
            kind: TruncationType::Auto,
            last_messages: None,
            extra: Map::new(),
        }
    }

    pub fn last_messages(count: u32) -> Self {
        Self {
            kind: TruncationType::LastMessages,
            last_messages: Some(count),
            extra: Map::new(),
        }
    }
}

impl Validate for TruncationStrategy {
    fn validate(&self) -> Result<(), ValidationError> {
        match (&self.kind, self.last_messages) {
            (TruncationType::Other(kind), _) => {
                return validation::known_value("type", Some(kind.as_str()));
            }
            (_, Some(0)) => {
                return Err(ValidationError::new("last_messages", "must be at least 1"));
            }
            (TruncationType::LastMessages, None) => {
                return Err(ValidationError::new(
                    "last_messages",
                    "is required when type is last_messages",
                ));
            }
            _ => {}
        }
        validation::no_unknown_fields(&self.extra)
    }
}

/// Request body for `POST /threads/{thread_id}/runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct CreateRunRequest {
    /// ID of the assistant that executes the run.
    #[builder(into)]
    pub assistant_id: String,

    /// Overrides the assistant's model.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,

    /// Overrides the assistant's instructions, at most 256,000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 256000))]
    #[builder(into)]
    pub instructions: Option<String>,

    /// Appended to the assistant's instructions for this run only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub additional_instructions: Option<String>,

    /// Messages added to the thread before the run starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_messages: Option<Vec<CreateMessageRequest>>,

    /// Overrides the assistant's tools, at most 128.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 128))]
    pub tools: Option<Vec<AssistantTool>>,

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

    /// Maximum number of prompt tokens used over the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prompt_tokens: Option<u32>,

    /// Maximum number of completion tokens used over the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// "none", "auto", "required" or a named tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_strategy: Option<TruncationStrategy>,

    /// Whether function calls may be made in parallel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// Request body for `POST /threads/runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct CreateThreadAndRunRequest {
    /// ID of the assistant that executes the run.
    #[builder(into)]
    pub assistant_id: String,

    /// The thread to create, optionally seeded with messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<CreateThreadRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,

    /// Overrides the assistant's instructions, at most 256,000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 256000))]
    #[builder(into)]
    pub instructions: Option<String>,

    /// Overrides the assistant's tools, at most 128.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 128))]
    pub tools: Option<Vec<AssistantTool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

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
    pub max_prompt_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_strategy: Option<TruncationStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
}

/// Per-run overrides shared by both create endpoints.
struct RunOverrides<'a> {
    instructions: Option<&'a str>,
    tools: Option<&'a [AssistantTool]>,
    metadata: Option<&'a Metadata>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    response_format: Option<&'a ResponseFormat>,
    tool_choice: Option<&'a ToolChoice>,
    truncation_strategy: Option<&'a TruncationStrategy>,
    reasoning_effort: Option<&'a ReasoningEffort>,
}

impl Validate for RunOverrides<'_> {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(instructions) = self.instructions {
            validation::max_chars("instructions", instructions, 256_000)?;
        }
        if let Some(tools) = self.tools {
            validation::max_items("tools", tools, 128)?;
            validation::each("tools", tools)?;
        }
        if let Some(metadata) = self.metadata {
            validation::metadata("metadata", metadata)?;
        }
        if let Some(temperature) = self.temperature {
            validation::in_range("temperature", temperature, 0.0, 2.0)?;
        }
        if let Some(top_p) = self.top_p {
            validation::in_range("top_p", top_p, 0.0, 1.0)?;
        }
        if let Some(format) = self.response_format {
            format.validate().map_err(|e| e.within("response_format"))?;
        }
        if let Some(choice) = self.tool_choice {
            choice.validate().map_err(|e| e.within("tool_choice"))?;
        }
        if let Some(strategy) = self.truncation_strategy {
            strategy.validate().map_err(|e| e.within("truncation_strategy"))?;
        }
        validation::known_value(
            "reasoning_effort",
            self.reasoning_effort.and_then(ReasoningEffort::as_unknown),
        )
    }
}

impl Validate for CreateRunRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("assistant_id", &self.assistant_id)?;
        if let Some(messages) = &self.additional_messages {
            validation::each("additional_messages", messages)?;
        }
        RunOverrides {
            instructions: self.instructions.as_deref(),
            tools: self.tools.as_deref(),
            metadata: self.metadata.as_ref(),
            temperature: self.temperature,
            top_p: self.top_p,
            response_format: self.response_format.as_ref(),
            tool_choice: self.tool_choice.as_ref(),
            truncation_strategy: self.truncation_strategy.as_ref(),
            reasoning_effort: self.reasoning_effort.as_ref(),
        }
        .validate()
    }
}

impl Validate for CreateThreadAndRunRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("assistant_id", &self.assistant_id)?;
        if let Some(thread) = &self.thread {
            thread.validate().map_err(|e| e.within("thread"))?;
        }
        if let Some(resources) = &self.tool_resources {
            resources.validate().map_err(|e| e.within("tool_resources"))?;
        }
        RunOverrides {
            instructions: self.instructions.as_deref(),
            tools: self.tools.as_deref(),
            metadata: self.metadata.as_ref(),
            temperature: self.temperature,
            top_p: self.top_p,
            response_format: self.response_format.as_ref(),
            tool_choice: self.tool_choice.as_ref(),
            truncation_strategy: self.truncation_strategy.as_ref(),
            reasoning_effort: None,
        }
        .validate()
    }
}

/// Request body for `POST /threads/{thread_id}/runs/{run_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModifyRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Validate for ModifyRunRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.metadata
            .as_ref()
            .map_or(Ok(()), |metadata| validation::metadata("metadata", metadata))
    }
}

/// Request body for `POST /threads/{thread_id}/runs/{run_id}/submit_tool_outputs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmitToolOutputsRequest {
    /// Outputs keyed by the tool call they answer.
    #[schemars(length(min = 1))]
    pub tool_outputs: Vec<ToolOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ToolOutput {
    /// ID of the tool call from `required_action.submit_tool_outputs.tool_calls`.
    pub tool_call_id: String,
    /// Output of the tool call, passed back to the model.
    pub output: String,
}

impl ToolOutput {
    pub fn new(tool_call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: output.into(),
        }
    }
}

impl Validate for ToolOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("tool_call_id", &self.tool_call_id)
    }
}

impl Validate for SubmitToolOutputsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.tool_outputs.is_empty() {
            return Err(ValidationError::new(
                "tool_outputs",
                "must contain at least one output",
            ));
        }
        validation::each("tool_outputs", &self.tool_outputs)
    }
}

impl AssistantsClient {
    /// Create a run on a thread
    pub async fn create_run(
        &self,
        thread_id: &str,
        request: &CreateRunRequest,
    ) -> Result<Run, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        request.validate()?;
        let endpoint = Endpoint::new(format!("threads/{thread_id}/runs"), HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Create a thread and run it in one request
    pub async fn create_thread_and_run(
        &self,
        request: &CreateThreadAndRunRequest,
    ) -> Result<Run, AssistantsError> {
        request.validate()?;
        let endpoint = Endpoint::new("threads/runs", HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// List the runs of a thread
    pub async fn list_runs(
        &self,
        thread_id: &str,
        query: &ListQuery,
    ) -> Result<ListResponse<Run>, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        query.validate()?;
        let endpoint =
            Endpoint::new(format!("threads/{thread_id}/runs"), HttpMethod::Get).with_query(query)?;
        self.request_builder().request(&endpoint).await
    }

    /// Retrieve a run
    pub async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantsError> {
        let endpoint = run_endpoint(thread_id, run_id, "", HttpMethod::Get)?;
        self.request_builder().request(&endpoint).await
    }

    /// Modify a run's metadata
    pub async fn modify_run(
        &self,
        thread_id: &str,
        run_id: &str,
        request: &ModifyRunRequest,
    ) -> Result<Run, AssistantsError> {
        let endpoint = run_endpoint(thread_id, run_id, "", HttpMethod::Post)?;
        request.validate()?;
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Submit tool outputs for a run in `requires_action`
    ///
    /// Returns the run as reported right after submission.
    pub async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: &SubmitToolOutputsRequest,
    ) -> Result<Run, AssistantsError> {
        let endpoint = run_endpoint(thread_id, run_id, "/submit_tool_outputs", HttpMethod::Post)?;
        request.validate()?;
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Request cancellation of a run
    ///
    /// The run usually comes back as `cancelling`; poll [`Self::retrieve_run`]
    /// to observe `cancelled`.
    pub async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantsError> {
        let endpoint = run_endpoint(thread_id, run_id, "/cancel", HttpMethod::Post)?;
        self.request_builder().request(&endpoint).await
    }
}

fn run_endpoint(
    thread_id: &str,
    run_id: &str,
    action: &str,
    method: HttpMethod,
) -> Result<Endpoint, ValidationError> {
    let thread_id = validation::path_id("thread_id", thread_id)?;
    let run_id = validation::path_id("run_id", run_id)?;
    Ok(Endpoint::new(format!("threads/{thread_id}/runs/{run_id}{action}"), method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run_payload() -> Value {
        json!({
            "id": "run_abc123",
            "object": "thread.run",
            "created_at": 1699063290,
            "assistant_id": "asst_abc123",
            "thread_id": "thread_abc123",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {
                    "tool_calls": [{
                        "id": "call_001",
                        "type": "function",
                        "function": {"name": "get_current_weather", "arguments": "{\"location\":\"Paris\"}"}
                    }]
                }
            },
            "started_at": 1699063291,
            "expires_at": 1699063890,
            "cancelled_at": null,
            "failed_at": null,
            "completed_at": null,
            "last_error": null,
            "model": "gpt-4o",
            "instructions": null,
            "tools": [{"type": "code_interpreter"}],
            "metadata": {},
            "usage": null,
            "temperature": 1.0,
            "top_p": 1.0,
            "max_prompt_tokens": 1000,
            "max_completion_tokens": 1000,
            "truncation_strategy": {"type": "auto", "last_messages": null},
            "response_format": "auto",
            "tool_choice": "auto",
            "parallel_tool_calls": true
        })
    }

    #[test]
    fn test_run_decodes_required_action() {
        let run: Run = serde_json::from_value(run_payload()).unwrap();
        assert_eq!(run.status, Some(RunStatus::RequiresAction));
        assert_eq!(run.pending_tool_calls().len(), 1);
        assert_eq!(run.pending_tool_calls()[0].function.name, "get_current_weather");
        assert_eq!(run.tool_choice, Some(ToolChoice::Mode(ToolChoiceMode::Auto)));
        assert_eq!(run.truncation_strategy, Some(TruncationStrategy::auto()));
        assert!(run.instructions.is_none());

        let value = serde_json::to_value(&run).unwrap();
        assert!(value.get("instructions").is_none());
        assert!(value.get("cancelled_at").is_none());
        assert_eq!(value["model"], "gpt-4o");
    }

    #[test]
    fn test_run_keeps_unknown_nested_fields() {
        let mut payload = run_payload();
        payload["truncation_strategy"] = json!({"type": "auto", "last_messages": null, "extra": 1});
        payload["tool_choice"] = json!({"type": "function", "function": {"name": "lookup", "strict": true}});
        payload["reasoning_effort"] = json!("minimal");

        let run: Run = serde_json::from_value(payload).unwrap();
        let strategy = run.truncation_strategy.as_ref().unwrap();
        assert_eq!(strategy.kind, TruncationType::Auto);
        assert_eq!(strategy.extra["extra"], json!(1));
        assert_eq!(run.reasoning_effort, Some(ReasoningEffort::Other("minimal".into())));

        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["truncation_strategy"], json!({"type": "auto", "extra": 1}));
        assert_eq!(value["tool_choice"]["function"]["strict"], json!(true));
        assert_eq!(value["reasoning_effort"], "minimal");
    }

    #[test]
    fn test_unknown_truncation_type_is_kept() {
        let strategy: TruncationStrategy =
            serde_json::from_value(json!({"type": "first_messages", "last_messages": 3})).unwrap();
        assert_eq!(strategy.kind, TruncationType::Other("first_messages".into()));
        let err = strategy.validate().unwrap_err();
        assert_eq!(err.field, "type");
        assert_eq!(err.constraint, "unknown value `first_messages`");
    }

    #[test]
    fn test_run_status_terminal_states() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(!RunStatus::Cancelling.is_terminal());
        assert!(!RunStatus::RequiresAction.is_terminal());
    }

    #[test]
    fn test_last_error_codes() {
        let error: LastError = serde_json::from_value(json!({
            "code": "rate_limit_exceeded",
            "message": "Rate limit reached"
        }))
        .unwrap();
        assert_eq!(error.code, LastErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_tool_choice_forms() {
        let choice: ToolChoice = serde_json::from_value(json!("required")).unwrap();
        assert_eq!(choice, ToolChoice::Mode(ToolChoiceMode::Required));

        let choice: ToolChoice = serde_json::from_value(json!({
            "type": "function",
            "function": {"name": "get_current_weather"}
        }))
        .unwrap();
        assert_eq!(choice, ToolChoice::function("get_current_weather"));

        let choice: ToolChoice = serde_json::from_value(json!({"type": "file_search"})).unwrap();
        assert_eq!(choice, ToolChoice::Named(NamedToolChoice::FileSearch));

        assert!(serde_json::from_value::<ToolChoice>(json!("sometimes")).is_err());
    }

    #[test]
    fn test_truncation_strategy_validation() {
        assert!(TruncationStrategy::last_messages(10).validate().is_ok());
        assert!(TruncationStrategy::last_messages(0).validate().is_err());

        let strategy: TruncationStrategy =
            serde_json::from_value(json!({"type": "last_messages"})).unwrap();
        assert_eq!(strategy.validate().unwrap_err().field, "last_messages");
    }

    #[test]
    fn test_create_run_request_validation() {
        let request = CreateRunRequest::builder()
            .assistant_id("asst_abc123")
            .top_p(1.5)
            .build();
        assert_eq!(request.validate().unwrap_err().field, "top_p");

        let request = CreateRunRequest::builder()
            .assistant_id("asst_abc123")
            .truncation_strategy(TruncationStrategy {
                kind: TruncationType::LastMessages,
                last_messages: None,
                extra: Map::new(),
            })
            .build();
        assert_eq!(
            request.validate().unwrap_err().field,
            "truncation_strategy.last_messages"
        );

        let request = CreateRunRequest::builder()
            .assistant_id("asst_abc123")
            .tool_choice(ToolChoice::function("bad name"))
            .build();
        assert_eq!(request.validate().unwrap_err().field, "tool_choice.function.name");

        let request: CreateRunRequest = serde_json::from_value(json!({
            "assistant_id": "asst_abc123",
            "truncation_strategy": {"type": "auto", "keep_system": true}
        }))
        .unwrap();
        assert_eq!(
            request.validate().unwrap_err().field,
            "truncation_strategy.keep_system"
        );

        let request: CreateRunRequest = serde_json::from_value(json!({
            "assistant_id": "asst_abc123",
            "reasoning_effort": "extreme"
        }))
        .unwrap();
        assert_eq!(request.validate().unwrap_err().field, "reasoning_effort");
    }

    #[test]
    fn test_create_run_request_serializes_only_set_fields() {
        let request = CreateRunRequest::builder()
            .assistant_id("asst_abc123")
            .additional_instructions("Address the user as Jane.")
            .parallel_tool_calls(false)
            .build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "assistant_id": "asst_abc123",
                "additional_instructions": "Address the user as Jane.",
                "parallel_tool_calls": false
            })
        );
    }

    #[test]
    fn test_stream_is_not_accepted() {
        let err = serde_json::from_value::<CreateRunRequest>(json!({
            "assistant_id": "asst_abc123",
            "stream": true
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `stream`"));
    }

    #[test]
    fn test_thread_and_run_nested_errors() {
        let request = CreateThreadAndRunRequest::builder()
            .assistant_id("asst_abc123")
            .thread(
                CreateThreadRequest::builder()
                    .messages(vec![CreateMessageRequest::user("  ")])
                    .build(),
            )
            .build();
        assert_eq!(
            request.validate().unwrap_err().field,
            "thread.messages[0].content"
        );
    }

    #[test]
    fn test_submit_tool_outputs_requires_outputs() {
        let request = SubmitToolOutputsRequest { tool_outputs: vec![] };
        assert_eq!(request.validate().unwrap_err().field, "tool_outputs");

        let request = SubmitToolOutputsRequest {
            tool_outputs: vec![ToolOutput::new("call_001", "22C")],
        };
        assert!(request.validate().is_ok());
    }
}
