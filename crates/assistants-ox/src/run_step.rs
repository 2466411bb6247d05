use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::internal::{Endpoint, HttpMethod};
use crate::run::LastError;
use crate::tool::RankingOptions;
use crate::validation::{self, Metadata, Validate, ValidationError};
use crate::{AssistantsClient, AssistantsError, ListOrder, ListResponse, Usage, common::validate_limit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStepType {
    MessageCreation,
    ToolCalls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStepStatus {
    InProgress,
    Cancelled,
    Failed,
    Completed,
    Expired,
}

/// A single action taken while executing a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStep {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RunStepType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStepStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_details: Option<StepDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDetails {
    MessageCreation { message_creation: MessageCreation },
    ToolCalls { tool_calls: Vec<RunStepToolCall> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreation {
    pub message_id: String,
}

/// A tool invocation recorded in a run step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunStepToolCall {
    CodeInterpreter {
        id: String,
        code_interpreter: CodeInterpreterCall,
    },
    FileSearch {
        id: String,
        file_search: FileSearchCall,
    },
    Function {
        id: String,
        function: FunctionCallDetails,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeInterpreterCall {
    pub input: String,
    #[serde(default)]
    pub outputs: Vec<CodeInterpreterOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeInterpreterOutput {
    Logs { logs: String },
    Image { image: CodeInterpreterImage },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeInterpreterImage {
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileSearchCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_options: Option<RankingOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<FileSearchResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchResult {
    pub file_id: String,
    pub file_name: String,
    pub score: f64,
    /// Only present when requested with `include`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<FileSearchResultContent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchResultContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallDetails {
    pub name: String,
    pub arguments: String,
    /// `None` until outputs have been submitted.
    pub output: Option<String>,
}

/// Extra fields that can be inlined into run step responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RunStepInclude {
    #[serde(rename = "step_details.tool_calls[*].file_search.results[*].content")]
    FileSearchResultContent,
}

/// Query for `GET /threads/{thread_id}/runs/{run_id}/steps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListRunStepsQuery {
    /// Number of run steps to return, 1-100 (API default 20).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub limit: Option<u32>,

    /// Sort order by creation time (API default `desc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ListOrder>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    /// Additional fields to include, e.g. file search result content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<RunStepInclude>>,
}

impl Validate for ListRunStepsQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_limit(self.limit)
    }
}

/// Query for `GET /threads/{thread_id}/runs/{run_id}/steps/{step_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RetrieveRunStepQuery {
    /// Additional fields to include, e.g. file search result content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<RunStepInclude>>,
}

impl Validate for RetrieveRunStepQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl AssistantsClient {
    /// List the steps of a run
    pub async fn list_run_steps(
        &self,
        thread_id: &str,
        run_id: &str,
        query: &ListRunStepsQuery,
    ) -> Result<ListResponse<RunStep>, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let run_id = validation::path_id("run_id", run_id)?;
        query.validate()?;
        let endpoint = Endpoint::new(
            format!("threads/{thread_id}/runs/{run_id}/steps"),
            HttpMethod::Get,
        )
        .with_query(query)?;
        self.request_builder().request(&endpoint).await
    }

    /// Retrieve a run step
    pub async fn retrieve_run_step(
        &self,
        thread_id: &str,
        run_id: &str,
        step_id: &str,
        query: &RetrieveRunStepQuery,
    ) -> Result<RunStep, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let run_id = validation::path_id("run_id", run_id)?;
        let step_id = validation::path_id("step_id", step_id)?;
        let endpoint = Endpoint::new(
            format!("threads/{thread_id}/runs/{run_id}/steps/{step_id}"),
            HttpMethod::Get,
        )
        .with_query(query)?;
        self.request_builder().request(&endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_step_decodes() {
        let step: RunStep = serde_json::from_value(json!({
            "id": "step_abc123",
            "object": "thread.run.step",
            "created_at": 1699063291,
            "run_id": "run_abc123",
            "assistant_id": "asst_abc123",
            "thread_id": "thread_abc123",
            "type": "tool_calls",
            "status": "completed",
            "cancelled_at": null,
            "completed_at": 1699063291,
            "expired_at": null,
            "failed_at": null,
            "last_error": null,
            "step_details": {
                "type": "tool_calls",
                "tool_calls": [
                    {
                        "id": "call_1",
                        "type": "code_interpreter",
                        "code_interpreter": {
                            "input": "print(2 + 2)",
                            "outputs": [{"type": "logs", "logs": "4\n"}]
                        }
                    },
                    {
                        "id": "call_2",
                        "type": "file_search",
                        "file_search": {
                            "results": [{
                                "file_id": "file_abc123",
                                "file_name": "report.pdf",
                                "score": 0.82,
                                "content": [{"type": "text", "text": "Revenue grew."}]
                            }]
                        }
                    },
                    {
                        "id": "call_3",
                        "type": "function",
                        "function": {"name": "lookup", "arguments": "{}", "output": null}
                    }
                ]
            },
            "usage": {"prompt_tokens": 123, "completion_tokens": 456, "total_tokens": 579}
        }))
        .unwrap();

        assert_eq!(step.kind, Some(RunStepType::ToolCalls));
        let Some(StepDetails::ToolCalls { tool_calls }) = &step.step_details else {
            panic!("expected tool call details");
        };
        assert_eq!(tool_calls.len(), 3);
        let RunStepToolCall::FileSearch { file_search, .. } = &tool_calls[1] else {
            panic!("expected file search call");
        };
        let results = file_search.results.as_ref().unwrap();
        assert_eq!(results[0].content.as_ref().unwrap()[0].text, "Revenue grew.");
        assert_eq!(step.usage.unwrap().total_tokens, 579);
    }

    #[test]
    fn test_message_creation_step() {
        let details: StepDetails = serde_json::from_value(json!({
            "type": "message_creation",
            "message_creation": {"message_id": "msg_abc123"}
        }))
        .unwrap();
        assert_eq!(
            details,
            StepDetails::MessageCreation {
                message_creation: MessageCreation {
                    message_id: "msg_abc123".into()
                }
            }
        );
    }

    #[test]
    fn test_include_serializes_to_api_path() {
        let query = RetrieveRunStepQuery {
            include: Some(vec![RunStepInclude::FileSearchResultContent]),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"include": ["step_details.tool_calls[*].file_search.results[*].content"]})
        );
        assert!(serde_json::from_value::<RetrieveRunStepQuery>(json!({"include": ["usage"]})).is_err());
    }
}
