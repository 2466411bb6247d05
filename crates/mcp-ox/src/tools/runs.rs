use assistants_ox::{
    CreateRunRequest, CreateThreadAndRunRequest, ListQuery, ModifyRunRequest,
    SubmitToolOutputsRequest,
};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::ToolError;
use crate::protocol::ToolDefinition;
use crate::tool::{NoArguments, ToolBox, ToolCall, ToolContext, respond, tool_definition};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunTools;

impl ToolBox for RunTools {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            tool_definition::<CreateRunRequest>(
                "create_run",
                "Start a run of an assistant on a thread. Poll get_run to follow its status.",
                &["thread_id"],
            ),
            tool_definition::<CreateThreadAndRunRequest>(
                "create_thread_and_run",
                "Create a thread and start a run on it in one request.",
                &[],
            ),
            tool_definition::<ListQuery>("list_runs", "List the runs of a thread.", &["thread_id"]),
            tool_definition::<NoArguments>("get_run", "Retrieve a run.", &["thread_id", "run_id"]),
            tool_definition::<ModifyRunRequest>(
                "modify_run",
                "Modify a run's metadata.",
                &["thread_id", "run_id"],
            ),
            tool_definition::<SubmitToolOutputsRequest>(
                "submit_tool_outputs",
                "Submit function call outputs for a run in requires_action. Returns the run as reported right after submission.",
                &["thread_id", "run_id"],
            ),
            tool_definition::<NoArguments>(
                "cancel_run",
                "Request cancellation of a run. The run moves to cancelled asynchronously; poll get_run to observe it.",
                &["thread_id", "run_id"],
            ),
        ]
    }

    fn invoke<'a>(&'a self, mut call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let name = call.name.clone();
            match name.as_str() {
                "create_run" => {
                    let thread_id = call.take_id("thread_id")?;
                    let request: CreateRunRequest = call.parse()?;
                    respond(&name, ctx.client()?.create_run(&thread_id, &request).await)
                }
                "create_thread_and_run" => {
                    let request: CreateThreadAndRunRequest = call.parse()?;
                    respond(&name, ctx.client()?.create_thread_and_run(&request).await)
                }
                "list_runs" => {
                    let thread_id = call.take_id("thread_id")?;
                    let query: ListQuery = call.parse()?;
                    respond(&name, ctx.client()?.list_runs(&thread_id, &query).await)
                }
                "get_run" => {
                    let thread_id = call.take_id("thread_id")?;
                    let run_id = call.take_id("run_id")?;
                    call.parse::<NoArguments>()?;
                    respond(&name, ctx.client()?.retrieve_run(&thread_id, &run_id).await)
                }
                "modify_run" => {
                    let thread_id = call.take_id("thread_id")?;
                    let run_id = call.take_id("run_id")?;
                    let request: ModifyRunRequest = call.parse()?;
                    respond(
                        &name,
                        ctx.client()?.modify_run(&thread_id, &run_id, &request).await,
                    )
                }
                "submit_tool_outputs" => {
                    let thread_id = call.take_id("thread_id")?;
                    let run_id = call.take_id("run_id")?;
                    let request: SubmitToolOutputsRequest = call.parse()?;
                    respond(
                        &name,
                        ctx.client()?
                            .submit_tool_outputs(&thread_id, &run_id, &request)
                            .await,
                    )
                }
                "cancel_run" => {
                    let thread_id = call.take_id("thread_id")?;
                    let run_id = call.take_id("run_id")?;
                    call.parse::<NoArguments>()?;
                    respond(&name, ctx.client()?.cancel_run(&thread_id, &run_id).await)
                }
                _ => Err(ToolError::not_found(name.as_str())),
            }
        })
    }
}
