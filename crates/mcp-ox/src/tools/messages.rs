use assistants_ox::{CreateMessageRequest, ListMessagesQuery, ModifyMessageRequest};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::ToolError;
use crate::protocol::ToolDefinition;
use crate::tool::{NoArguments, ToolBox, ToolCall, ToolContext, respond, tool_definition};

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTools;

impl ToolBox for MessageTools {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            tool_definition::<CreateMessageRequest>(
                "create_message",
                "Add a message to a thread. Content is a string or a list of text/image parts.",
                &["thread_id"],
            ),
            tool_definition::<NoArguments>(
                "get_message",
                "Retrieve a message.",
                &["thread_id", "message_id"],
            ),
            tool_definition::<ListMessagesQuery>(
                "list_messages",
                "List the messages of a thread, optionally only those created by one run.",
                &["thread_id"],
            ),
            tool_definition::<ModifyMessageRequest>(
                "modify_message",
                "Modify a message's metadata.",
                &["thread_id", "message_id"],
            ),
            tool_definition::<NoArguments>(
                "delete_message",
                "Delete a message.",
                &["thread_id", "message_id"],
            ),
        ]
    }

    fn invoke<'a>(&'a self, mut call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let name = call.name.clone();
            match name.as_str() {
                "create_message" => {
                    let thread_id = call.take_id("thread_id")?;
                    let request: CreateMessageRequest = call.parse()?;
                    respond(&name, ctx.client()?.create_message(&thread_id, &request).await)
                }
                "get_message" => {
                    let thread_id = call.take_id("thread_id")?;
                    let message_id = call.take_id("message_id")?;
                    call.parse::<NoArguments>()?;
                    respond(
                        &name,
                        ctx.client()?.retrieve_message(&thread_id, &message_id).await,
                    )
                }
                "list_messages" => {
                    let thread_id = call.take_id("thread_id")?;
                    let query: ListMessagesQuery = call.parse()?;
                    respond(&name, ctx.client()?.list_messages(&thread_id, &query).await)
                }
                "modify_message" => {
                    let thread_id = call.take_id("thread_id")?;
                    let message_id = call.take_id("message_id")?;
                    let request: ModifyMessageRequest = call.parse()?;
                    respond(
                        &name,
                        ctx.client()?
                            .modify_message(&thread_id, &message_id, &request)
                            .await,
                    )
                }
                "delete_message" => {
                    let thread_id = call.take_id("thread_id")?;
                    let message_id = call.take_id("message_id")?;
                    call.parse::<NoArguments>()?;
                    respond(
                        &name,
                        ctx.client()?.delete_message(&thread_id, &message_id).await,
                    )
                }
                _ => Err(ToolError::not_found(name.as_str())),
            }
        })
    }
}
