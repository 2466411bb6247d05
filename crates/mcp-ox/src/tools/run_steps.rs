use assistants_ox::{ListRunStepsQuery, RetrieveRunStepQuery};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::ToolError;
use crate::protocol::ToolDefinition;
use crate::tool::{ToolBox, ToolCall, ToolContext, respond, tool_definition};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunStepTools;

impl ToolBox for RunStepTools {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            tool_definition::<ListRunStepsQuery>(
                "list_run_steps",
                "List the steps of a run. include can inline file search result content.",
                &["thread_id", "run_id"],
            ),
            tool_definition::<RetrieveRunStepQuery>(
                "get_run_step",
                "Retrieve a run step. include can inline file search result content.",
                &["thread_id", "run_id", "step_id"],
            ),
        ]
    }

    fn invoke<'a>(&'a self, mut call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let name = call.name.clone();
            let thread_id = call.take_id("thread_id")?;
            let run_id = call.take_id("run_id")?;
            match name.as_str() {
                "list_run_steps" => {
                    let query: ListRunStepsQuery = call.parse()?;
                    respond(
                        &name,
                        ctx.client()?.list_run_steps(&thread_id, &run_id, &query).await,
                    )
                }
                "get_run_step" => {
                    let step_id = call.take_id("step_id")?;
                    let query: RetrieveRunStepQuery = call.parse()?;
                    respond(
                        &name,
                        ctx.client()?
                            .retrieve_run_step(&thread_id, &run_id, &step_id, &query)
                            .await,
                    )
                }
                _ => Err(ToolError::not_found(name.as_str())),
            }
        })
    }
}

