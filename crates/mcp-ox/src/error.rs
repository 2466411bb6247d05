use assistants_ox::{AssistantsError, ValidationError};
use serde_json::{Value, json};
use thiserror::Error;

use crate::credentials::CredentialError;

/// Represents errors that can occur during tool invocation.
///
/// Every variant except [`ToolError::NotFound`] is reported to the MCP client
/// as a tool result with `isError: true` (see [`ToolError::payload`]).
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    /// The arguments did not decode into the tool's input type or violated a constraint.
    #[error("Invalid arguments for tool '{name}': {source}")]
    InvalidArguments {
        name: String,
        #[source]
        source: ValidationError,
    },

    /// No usable API key for this invocation.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The Assistants API call failed.
    #[error("Tool execution failed for tool '{name}': {source}")]
    Execution {
        name: String,
        #[source]
        source: AssistantsError,
    },

    /// Failed to serialize the output of a successful tool execution.
    #[error("Output serialization failed for tool '{name}'")]
    OutputSerialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    /// Creates a "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates an "invalid arguments" error.
    pub fn invalid_arguments(name: impl Into<String>, source: ValidationError) -> Self {
        Self::InvalidArguments {
            name: name.into(),
            source,
        }
    }

    /// Creates a "tool execution" error, wrapping the client error.
    pub fn execution(name: impl Into<String>, source: AssistantsError) -> Self {
        Self::Execution {
            name: name.into(),
            source,
        }
    }

    /// Stable, machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "tool_not_found",
            Self::InvalidArguments { .. } => "validation_error",
            Self::Credential(error) => error.code(),
            Self::Execution { source, .. } => source.code(),
            Self::OutputSerialization { .. } => "unexpected_response",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidArguments { source, .. } => source.to_string(),
            Self::Execution { source, .. } => match source.api_error() {
                Some(api) => api.message.clone(),
                None => source.to_string(),
            },
            other => other.to_string(),
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidArguments { source, .. }
            | Self::Execution {
                source: AssistantsError::Validation(source),
                ..
            } => Some(&source.field),
            _ => None,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            Self::Execution { source, .. } => source.api_error().map(|api| api.status),
            _ => None,
        }
    }

    /// The structured error body returned as tool output:
    /// `{"error": {"code", "message", "field"?, "status"?}}`.
    pub fn payload(&self) -> Value {
        let mut error = json!({
            "code": self.code(),
            "message": self.message(),
        });
        if let Some(field) = self.field() {
            error["field"] = json!(field);
        }
        if let Some(status) = self.status() {
            error["status"] = json!(status);
        }
        json!({ "error": error })
    }
}
