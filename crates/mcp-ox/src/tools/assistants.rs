use assistants_ox::{CreateAssistantRequest, ListQuery, ModifyAssistantRequest};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::ToolError;
use crate::protocol::ToolDefinition;
use crate::tool::{NoArguments, ToolBox, ToolCall, ToolContext, respond, tool_definition};

/// `create_assistant`, `get_assistant`, `list_assistants`, `modify_assistant`, `delete_assistant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssistantTools;

impl ToolBox for AssistantTools {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            tool_definition::<CreateAssistantRequest>(
                "create_assistant",
                "Create an assistant. This is typically the first step before creating threads and runs.",
                &[],
            ),
            tool_definition::<NoArguments>(
                "get_assistant",
                "Retrieve an assistant by ID.",
                &["assistant_id"],
            ),
            tool_definition::<ListQuery>(
                "list_assistants",
                "List assistants, newest first unless order is asc.",
                &[],
            ),
            tool_definition::<ModifyAssistantRequest>(
                "modify_assistant",
                "Modify an assistant. Only the provided fields are changed; tools replaces the whole list.",
                &["assistant_id"],
            ),
            tool_definition::<NoArguments>(
                "delete_assistant",
                "Delete an assistant.",
                &["assistant_id"],
            ),
        ]
    }

    fn invoke<'a>(&'a self, mut call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let name = call.name.clone();
            match name.as_str() {
                "create_assistant" => {
                    let request: CreateAssistantRequest = call.parse()?;
                    respond(&name, ctx.client()?.create_assistant(&request).await)
                }
                "get_assistant" => {
                    let assistant_id = call.take_id("assistant_id")?;
                    call.parse::<NoArguments>()?;
                    respond(&name, ctx.client()?.retrieve_assistant(&assistant_id).await)
                }
                "list_assistants" => {
                    let query: ListQuery = call.parse()?;
                    respond(&name, ctx.client()?.list_assistants(&query).await)
                }
                "modify_assistant" => {
                    let assistant_id = call.take_id("assistant_id")?;
                    let request: ModifyAssistantRequest = call.parse()?;
                    respond(
                        &name,
                        ctx.client()?.modify_assistant(&assistant_id, &request).await,
                    )
                }
                "delete_assistant" => {
                    let assistant_id = call.take_id("assistant_id")?;
                    call.parse::<NoArguments>()?;
                    respond(&name, ctx.client()?.delete_assistant(&assistant_id).await)
                }
                _ => Err(ToolError::not_found(name.as_str())),
            }
        })
    }
}
