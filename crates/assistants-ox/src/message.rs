use bon::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::internal::{Endpoint, HttpMethod};
use crate::validation::{self, Metadata, Validate, ValidationError};
use crate::{
    AssistantsClient, AssistantsError, DeletionStatus, IncompleteDetails, ListOrder, ListResponse,
    common::validate_limit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    InProgress,
    Incomplete,
    Completed,
}

/// Message content as supplied by the caller: plain text or a list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MessageContentInput {
    Text(String),
    Parts(Vec<MessageContentPart>),
}

impl From<String> for MessageContentInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContentInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<MessageContentPart>> for MessageContentInput {
    fn from(parts: Vec<MessageContentPart>) -> Self {
        Self::Parts(parts)
    }
}

impl Validate for MessageContentInput {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Text(text) => validation::non_empty("content", text),
            Self::Parts(parts) => {
                if parts.is_empty() {
                    return Err(ValidationError::new("content", "must contain at least one part"));
                }
                validation::each("content", parts)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum MessageContentPart {
    Text { text: String },
    ImageFile { image_file: ImageFile },
    ImageUrl { image_url: ImageUrl },
}

impl MessageContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image_file(file_id: impl Into<String>) -> Self {
        Self::ImageFile {
            image_file: ImageFile {
                file_id: file_id.into(),
                detail: None,
                extra: Map::new(),
            },
        }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
                extra: Map::new(),
            },
        }
    }
}

impl Validate for MessageContentPart {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Text { text } => validation::non_empty("text", text),
            Self::ImageFile { image_file } => image_file.validate().map_err(|e| e.within("image_file")),
            Self::ImageUrl { image_url } => image_url.validate().map_err(|e| e.within("image_url")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct ImageFile {
    /// ID of an uploaded image file.
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Validate for ImageFile {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("file_id", &self.file_id)?;
        validation::known_value("detail", self.detail.as_ref().and_then(ImageDetail::as_unknown))?;
        validation::no_unknown_fields(&self.extra)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct ImageUrl {
    /// External URL of the image.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Validate for ImageUrl {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("url", &self.url)?;
        validation::known_value("detail", self.detail.as_ref().and_then(ImageDetail::as_unknown))?;
        validation::no_unknown_fields(&self.extra)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageDetail {
    Low,
    High,
    Auto,
    #[serde(untagged)]
    #[schemars(skip)]
    Other(String),
}

impl ImageDetail {
    pub fn as_unknown(&self) -> Option<&str> {
        match self {
            Self::Other(value) => Some(value),
            _ => None,
        }
    }
}

/// A file attached to a message and the tools it should be added to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct Attachment {
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AttachmentTool>>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Validate for Attachment {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("file_id", &self.file_id)?;
        validation::no_unknown_fields(&self.extra)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttachmentTool {
    CodeInterpreter,
    FileSearch,
}

/// A message within a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MessageRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<MessageContent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Concatenated text of all `text` content blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flatten()
            .filter_map(|content| match content {
                MessageContent::Text { text } => Some(text.value.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A content block of a message returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    ImageFile { image_file: ImageFile },
    ImageUrl { image_url: ImageUrl },
    Refusal { refusal: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    FileCitation {
        text: String,
        file_citation: FileReference,
        start_index: u32,
        end_index: u32,
    },
    FilePath {
        text: String,
        file_path: FileReference,
        start_index: u32,
        end_index: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub file_id: String,
}

/// Request body for `POST /threads/{thread_id}/messages`, also used for the
/// initial messages of a new thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder)]
#[serde(deny_unknown_fields)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct CreateMessageRequest {
    /// Who sent the message: `user` or `assistant`.
    pub role: MessageRole,

    /// Text, or a list of text / image_file / image_url parts.
    #[builder(into)]
    pub content: MessageContentInput,

    /// Files attached to the message and the tools to add them to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    /// Up to 16 key-value pairs; keys at most 64 and values at most 512 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreateMessageRequest {
    pub fn user(content: impl Into<MessageContentInput>) -> Self {
        Self::builder().role(MessageRole::User).content(content).build()
    }
}

impl Validate for CreateMessageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.content.validate()?;
        if let Some(attachments) = &self.attachments {
            validation::each("attachments", attachments)?;
        }
        if let Some(metadata) = &self.metadata {
            validation::metadata("metadata", metadata)?;
        }
        Ok(())
    }
}

/// Request body for `POST /threads/{thread_id}/messages/{message_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModifyMessageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Validate for ModifyMessageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.metadata
            .as_ref()
            .map_or(Ok(()), |metadata| validation::metadata("metadata", metadata))
    }
}

/// Query for `GET /threads/{thread_id}/messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListMessagesQuery {
    /// Number of messages to return, 1-100 (API default 20).
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

    /// Only return messages created by this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl Validate for ListMessagesQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_limit(self.limit)
    }
}

impl AssistantsClient {
    /// Create a message in a thread
    pub async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<Message, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        request.validate()?;
        let endpoint = Endpoint::new(format!("threads/{thread_id}/messages"), HttpMethod::Post);
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Retrieve a message
    pub async fn retrieve_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> Result<Message, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let message_id = validation::path_id("message_id", message_id)?;
        let endpoint = Endpoint::new(
            format!("threads/{thread_id}/messages/{message_id}"),
            HttpMethod::Get,
        );
        self.request_builder().request(&endpoint).await
    }

    /// List the messages of a thread
    pub async fn list_messages(
        &self,
        thread_id: &str,
        query: &ListMessagesQuery,
    ) -> Result<ListResponse<Message>, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        query.validate()?;
        let endpoint = Endpoint::new(format!("threads/{thread_id}/messages"), HttpMethod::Get)
            .with_query(query)?;
        self.request_builder().request(&endpoint).await
    }

    /// Modify a message's metadata
    pub async fn modify_message(
        &self,
        thread_id: &str,
        message_id: &str,
        request: &ModifyMessageRequest,
    ) -> Result<Message, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let message_id = validation::path_id("message_id", message_id)?;
        request.validate()?;
        let endpoint = Endpoint::new(
            format!("threads/{thread_id}/messages/{message_id}"),
            HttpMethod::Post,
        );
        self.request_builder().request_json(&endpoint, Some(request)).await
    }

    /// Delete a message
    pub async fn delete_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> Result<DeletionStatus, AssistantsError> {
        let thread_id = validation::path_id("thread_id", thread_id)?;
        let message_id = validation::path_id("message_id", message_id)?;
        let endpoint = Endpoint::new(
            format!("threads/{thread_id}/messages/{message_id}"),
            HttpMethod::Delete,
        );
        let status: DeletionStatus = self.request_builder().request(&endpoint).await?;
        Ok(status.with_default_object("thread.message.deleted"))
    }
}
