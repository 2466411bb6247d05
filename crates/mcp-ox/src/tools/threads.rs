use assistants_ox::{CreateThreadRequest, ModifyThreadRequest};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::ToolError;
use crate::protocol::ToolDefinition;
use crate::tool::{NoArguments, ToolBox, ToolCall, ToolContext, respond, tool_definition};

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTools;

impl ToolBox for ThreadTools {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            tool_definition::<CreateThreadRequest>(
                "create_thread",
                "Create a thread, optionally seeded with an ordered list of messages.",
                &[],
            ),
            tool_definition::<NoArguments>("get_thread", "Retrieve a thread by ID.", &["thread_id"]),
            tool_definition::<ModifyThreadRequest>(
                "modify_thread",
                "Modify a thread's metadata or tool resources.",
                &["thread_id"],
            ),
            tool_definition::<NoArguments>("delete_thread", "Delete a thread.", &["thread_id"]),
        ]
    }

    fn invoke<'a>(&'a self, mut call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let name = call.name.clone();
            match name.as_str() {
                "create_thread" => {
                    let request: CreateThreadRequest = call.parse()?;
                    respond(&name, ctx.client()?.create_thread(&request).await)
                }
                "get_thread" => {
                    let thread_id = call.take_id("thread_id")?;
                    call.parse::<NoArguments>()?;
                    respond(&name, ctx.client()?.retrieve_thread(&thread_id).await)
                }
                "modify_thread" => {
                    let thread_id = call.take_id("thread_id")?;
                    let request: ModifyThreadRequest = call.parse()?;
                    respond(&name, ctx.client()?.modify_thread(&thread_id, &request).await)
                }
                "delete_thread" => {
                    let thread_id = call.take_id("thread_id")?;
                    call.parse::<NoArguments>()?;
                    respond(&name, ctx.client()?.delete_thread(&thread_id).await)
                }
                _ => Err(ToolError::not_found(name.as_str())),
            }
        })
    }
}
