//! OpenAI Assistants API (v2) client for Rust
//!
//! This crate provides typed, validated access to the Assistants API:
//! - Assistants: create, retrieve, list, modify, delete
//! - Threads: create (optionally seeded with messages), retrieve, modify, delete
//! - Messages: create, retrieve, list, modify, delete
//! - Runs: create, create thread and run, list, retrieve, modify, submit tool outputs, cancel
//! - Run steps: list, retrieve (optionally inlining file search content)
//!
//! Every request type implements [`Validate`] and derives a JSON Schema, so
//! malformed input is rejected before any network traffic.
//!
//! # Example
//!
//! ```rust,no_run
//! use assistants_ox::{AssistantsClient, CreateAssistantRequest, CreateRunRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AssistantsClient::from_env()?;
//!
//!     let assistant = client
//!         .create_assistant(
//!             &CreateAssistantRequest::builder()
//!                 .model("gpt-4o")
//!                 .name("Math Tutor")
//!                 .instructions("You are a personal math tutor.")
//!                 .build(),
//!         )
//!         .await?;
//!
//!     let thread = client.create_thread(&Default::default()).await?;
//!     let run = client
//!         .create_run(&thread.id, &CreateRunRequest::builder().assistant_id(&assistant.id).build())
//!         .await?;
//!     println!("run {} is {:?}", run.id, run.status);
//!
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod client;
pub mod common;
pub mod error;
mod internal;
pub mod message;
pub mod response_format;
pub mod run;
pub mod run_step;
pub mod thread;
pub mod tool;
pub mod validation;

pub use client::{AssistantsClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiErrorKind, AssistantsError};
pub use validation::{Metadata, Validate, ValidationError};

pub use common::{
    DeletionStatus, IncompleteDetails, ListOrder, ListQuery, ListResponse, ReasoningEffort, Usage,
};
pub use response_format::{JsonSchemaFormat, OutputFormat, ResponseFormat};
pub use tool::{
    AssistantTool, CodeInterpreterResources, FileSearchResources, FileSearchSettings,
    FunctionDefinition, Ranker, RankingOptions, ToolResources,
};

pub use assistant::{Assistant, CreateAssistantRequest, ModifyAssistantRequest};
pub use message::{
    Attachment, AttachmentTool, CreateMessageRequest, ImageDetail, ListMessagesQuery, Message,
    MessageContent, MessageContentInput, MessageContentPart, MessageRole, MessageStatus,
    ModifyMessageRequest,
};
pub use run::{
    CreateRunRequest, CreateThreadAndRunRequest, LastError, LastErrorCode, ModifyRunRequest, Run,
    RunStatus, SubmitToolOutputsRequest, ToolChoice, ToolChoiceMode, ToolOutput,
    TruncationStrategy, TruncationType,
};
pub use run_step::{
    ListRunStepsQuery, RetrieveRunStepQuery, RunStep, RunStepInclude, RunStepStatus,
    RunStepToolCall, RunStepType, StepDetails,
};
pub use thread::{CreateThreadRequest, ModifyThreadRequest, Thread};
