use bon::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::internal::{Endpoint, HttpMethod};
use crate::message::CreateMessageRequest;
use crate::tool::ToolResources;
use crate::validation::{self, Metadata, Validate, ValidationError};
use crate::{AssistantsClient, AssistantsError, DeletionStatus};

/// A conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for `POST /threads`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct CreateThreadRequest {
    /// Initial messages of the thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<CreateMessageRequest>>,

    /// Up to 16 key-value pairs; keys at most 64 and values at most 512 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Resources made available to the assistant's tools in this thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

impl Validate for CreateThreadRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(messages) = &self.messages {
            validation::each("messages", messages)?;
        }
        validate_thread_fields(self.metadata.as_ref(), self.tool_resources.as_ref())
    }
}

/// Request body for `POST /threads/{thread_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ModifyThreadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

impl Validate for ModifyThreadRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_thread_fields(self.metadata.as_ref(), self.tool_resources.as_ref())
    }
}

fn validate_thread_fields(
    metadata: Option<&Metadata>,
    tool_resources: Option<&ToolResources>,
) -> Result<(), ValidationError> {
    if let Some(metadata) = metadata {
        validation::metadata("metadata", metadata)?;
    }
    if let Some(resources) = tool_resources {
        resources.validate().map_err(|e| e.within("tool_resources"))?;
    }
    Ok(())
}

impl AssistantsClient {
    /// Create a thread
    pub async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread, AssistantsError> {
        request.validate()?;
        let endpoint = Endpoint::new("threads", HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Retrieve a thread
    pub async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let endpoint = Endpoint::new(format!("threads/{thread_id}"), HttpMethod::Get);
        self.request_builder().request(&endpoint).await
    }

    /// Modify a thread
    pub async fn modify_thread(
        &self,
        thread_id: &str,
        request: &ModifyThreadRequest,
    ) -> Result<Thread, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        request.validate()?;
        let endpoint = Endpoint::new(format!("threads/{thread_id}"), HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Delete a thread
    pub async fn delete_thread(&self, thread_id: &str) -> Result<DeletionStatus, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let endpoint = Endpoint::new(format!("threads/{thread_id}"), HttpMethod::Delete);
        let status: DeletionStatus = self.request_builder().request(&endpoint).await?;
        Ok(status.with_default_object("thread.deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_create_request_serializes_to_empty_object() {
        assert_eq!(
            serde_json::to_value(CreateThreadRequest::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_nested_message_errors_name_the_index() {
        let request = CreateThreadRequest::builder()
            .messages(vec![
                CreateMessageRequest::user("Hello"),
                CreateMessageRequest::user(""),
            ])
            .build();
        assert_eq!(request.validate().unwrap_err().field, "messages[1].content");
    }

    #[test]
    fn test_metadata_value_limit() {
        let mut metadata = Metadata::new();
        metadata.insert("note".into(), "x".repeat(513));
        let request = ModifyThreadRequest::builder().metadata(metadata).build();
        assert_eq!(request.validate().unwrap_err().field, "metadata.note");
    }

    #[test]
    fn test_thread_decodes_with_null_fields() {
        let thread: Thread = serde_json::from_value(json!({
            "id": "thread_abc123",
            "object": "thread",
            "created_at": 1699012949,
            "metadata": {},
            "tool_resources": null
        }))
        .unwrap();
        assert!(thread.tool_resources.is_none());
        assert_eq!(thread.created_at, Some(1699012949));
    }
}
