//! JSON-RPC dispatch for the MCP methods this server answers.

use std::sync::Arc;

use mcp_sdk::types::{CallToolRequest, CallToolResponse, ToolResponseContent};
use serde_json::{Map, Value, json};

use crate::credentials::{CredentialResolver, RequestContext};
use crate::protocol::{
    JSONRPC_VERSION, PROTOCOL_VERSION, RpcError, ServerInfo, error_response, success_response,
};
use crate::tool::{ToolCall, ToolContext, ToolSet};
use crate::tools::assistants_toolset;

const INSTRUCTIONS: &str = "Tools for the OpenAI Assistants API. Create an assistant, \
create a thread, add messages, then start a run with create_run (or create_thread_and_run) \
and poll get_run until it reaches a terminal status. When a run is requires_action, answer \
its tool calls with submit_tool_outputs. Every result is the API object as JSON text; \
failures carry an error object with a code.";

/// An MCP server exposing a [`ToolSet`]. Shared between transports.
#[derive(Debug, Clone)]
pub struct McpServer {
    info: ServerInfo,
    tools: Arc<ToolSet>,
    credentials: Arc<CredentialResolver>,
}

impl McpServer {
    pub fn new(info: ServerInfo, tools: ToolSet, credentials: CredentialResolver) -> Self {
        Self {
            info,
            tools: Arc::new(tools),
            credentials: Arc::new(credentials),
        }
    }

    /// Server with every Assistants API tool registered.
    pub fn assistants(info: ServerInfo, credentials: CredentialResolver) -> Self {
        Self::new(info, assistants_toolset(), credentials)
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Handles one raw JSON-RPC payload. Returns `None` when nothing should be sent back.
    pub async fn handle_raw(&self, text: &str, request: Option<&RequestContext>) -> Option<Value> {
        match serde_json::from_str::<Value>(text) {
            Ok(incoming) => self.handle_message(incoming, request).await,
            Err(e) => Some(error_response(
                Value::Null,
                RpcError::parse_error(format!("Parse error: {e}")),
            )),
        }
    }

    /// Handles a single message or a batch.
    pub async fn handle_message(&self, incoming: Value, request: Option<&RequestContext>) -> Option<Value> {
        let Value::Array(batch) = incoming else {
            return self.handle_single_message(incoming, request).await;
        };

        if batch.is_empty() {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Batch request must not be empty"),
            ));
        }

        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = self.handle_single_message(item, request).await {
                responses.push(response);
            }
        }
        (!responses.is_empty()).then_some(Value::Array(responses))
    }

    async fn handle_single_message(&self, incoming: Value, request: Option<&RequestContext>) -> Option<Value> {
        let Value::Object(mut message) = incoming else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if message.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            let id = message.remove("id").unwrap_or(Value::Null);
            return Some(error_response(id, RpcError::invalid_request("jsonrpc must be '2.0'")));
        }

        // Client responses carry no method; this server never sends requests.
        let method = message.get("method").and_then(Value::as_str)?.to_string();
        let params = message.remove("params").unwrap_or(Value::Null);

        let Some(id) = message.remove("id") else {
            tracing::debug!(method = %method, "notification received");
            return None;
        };

        Some(match self.handle_request(&method, params, request).await {
            Ok(result) => success_response(id, result),
            Err(error) => error_response(id, error),
        })
    }

    async fn handle_request(
        &self,
        method: &str,
        params: Value,
        request: Option<&RequestContext>,
    ) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.definitions() })),
            "tools/call" => self.call_tool(params, request).await,
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": self.info,
            "instructions": INSTRUCTIONS,
        })
    }

    /// Runs a `tools/call`. Tool failures become results with `isError: true`;
    /// only malformed params and unknown tools are JSON-RPC errors.
    pub async fn call_tool(&self, params: Value, request: Option<&RequestContext>) -> Result<Value, RpcError> {
        let CallToolRequest { name, arguments, .. } = serde_json::from_value(params)
            .map_err(|e| RpcError::invalid_params(format!("Invalid tools/call params: {e}")))?;

        if !self.tools.has_tool(&name) {
            return Err(RpcError::invalid_params(format!("Unknown tool: {name}")));
        }

        let arguments = match arguments {
            Some(Value::Object(arguments)) => arguments,
            Some(Value::Null) | None => Map::new(),
            Some(_) => return Err(RpcError::invalid_params("tools/call 'arguments' must be an object")),
        };

        let ctx = ToolContext::new(&self.credentials, request);
        let response = match self.tools.invoke(ToolCall::new(name.clone(), arguments), ctx).await {
            Ok(output) => text_response(output.to_string(), false),
            Err(error) => {
                tracing::warn!(tool = %name, code = error.code(), "tool call failed: {error}");
                text_response(error.payload().to_string(), true)
            }
        };

        serde_json::to_value(response).map_err(|e| RpcError::internal(e.to_string()))
    }
}

fn text_response(text: String, is_error: bool) -> CallToolResponse {
    CallToolResponse {
        content: vec![ToolResponseContent::Text { text }],
        is_error: Some(is_error),
        meta: None,
    }
}
