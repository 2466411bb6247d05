use std::collections::HashMap;
use std::sync::Arc;

use assistants_ox::validation::path_id;
use assistants_ox::{AssistantsClient, AssistantsError, Validate, ValidationError};
use futures_util::future::BoxFuture;
use schemars::{JsonSchema, generate::SchemaSettings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::credentials::{CredentialError, CredentialResolver, RequestContext};
use crate::error::ToolError;
use crate::protocol::ToolDefinition;

/// A `tools/call` invocation: the tool name and its argument object.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Removes a path identifier from the arguments.
    pub fn take_id(&mut self, field: &str) -> Result<String, ToolError> {
        let id = match self.arguments.remove(field) {
            Some(Value::String(id)) => id,
            Some(_) => return Err(self.invalid(ValidationError::new(field, "must be a string"))),
            None => return Err(self.invalid(ValidationError::new(field, "is required"))),
        };
        path_id(field, &id).map_err(|e| self.invalid(e))?;
        Ok(id)
    }

    /// Decodes the remaining arguments into `T` and checks its constraints.
    ///
    /// Unknown, missing and mistyped fields are reported as validation errors.
    pub fn parse<T: DeserializeOwned + Validate>(&mut self) -> Result<T, ToolError> {
        let arguments = Value::Object(std::mem::take(&mut self.arguments));
        let input: T = serde_json::from_value(arguments).map_err(|e| self.invalid(decode_error(&e)))?;
        input.validate().map_err(|e| self.invalid(e))?;
        Ok(input)
    }

    fn invalid(&self, source: ValidationError) -> ToolError {
        ToolError::invalid_arguments(&self.name, source)
    }
}

/// Maps a serde error onto the field it names, when it names one.
fn decode_error(error: &serde_json::Error) -> ValidationError {
    let message = error.to_string();
    let field = ["unknown field `", "missing field `"]
        .iter()
        .find_map(|prefix| {
            let rest = message.split_once(prefix)?.1;
            rest.split_once('`').map(|(field, _)| field.to_string())
        })
        .unwrap_or_else(|| "arguments".to_string());
    ValidationError::new(field, message)
}

/// Input of tools that only take path identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoArguments {}

impl Validate for NoArguments {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// What a tool invocation may use besides its arguments.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub credentials: &'a CredentialResolver,
    pub request: Option<&'a RequestContext>,
}

impl<'a> ToolContext<'a> {
    pub fn new(credentials: &'a CredentialResolver, request: Option<&'a RequestContext>) -> Self {
        Self {
            credentials,
            request,
        }
    }

    /// Client for this invocation. Resolve only after the input was validated.
    pub fn client(&self) -> Result<AssistantsClient, CredentialError> {
        self.credentials.client(self.request)
    }
}

/// Serializes a client result into tool output.
pub fn respond<T: Serialize>(name: &str, result: Result<T, AssistantsError>) -> Result<Value, ToolError> {
    let output = result.map_err(|source| ToolError::execution(name, source))?;
    serde_json::to_value(output).map_err(|source| ToolError::OutputSerialization {
        name: name.to_string(),
        source,
    })
}

/// Builds a tool definition whose input schema is `T`'s schema plus the
/// given path identifiers as required string properties.
pub fn tool_definition<T: JsonSchema>(
    name: &str,
    description: &str,
    path_ids: &[&str],
) -> ToolDefinition {
    let mut schema = schema_for_type::<T>();

    if let Some(object) = schema.as_object_mut() {
        let properties = object
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(properties) = properties.as_object_mut() {
            for id in path_ids {
                properties.insert(
                    (*id).to_string(),
                    json!({"type": "string", "description": format!("The {} path identifier.", id.replace('_', " "))}),
                );
            }
        }

        let required = object
            .entry("required")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Some(required) = required.as_array_mut() {
            for (index, id) in path_ids.iter().enumerate() {
                required.insert(index, json!(id));
            }
        }
    }

    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: schema,
    }
}

/// Generates a JSON schema for the given type using schemars.
///
/// Subschemas are inlined and the meta-schema and title are dropped so the
/// result can be used directly as an MCP `inputSchema`.
pub fn schema_for_type<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::draft2020_12().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let generator = schemars::generate::SchemaGenerator::new(settings);
    let mut schema_value = Value::from(generator.into_root_schema_for::<T>());

    if let Some(obj) = schema_value.as_object_mut() {
        obj.remove("title");
        obj.entry("type").or_insert_with(|| json!("object"));
    }

    schema_value
}

/// A group of tools for one resource family.
pub trait ToolBox: Send + Sync + 'static {
    /// Returns the tools provided by this toolbox.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Invokes one of this toolbox's tools and returns its JSON output.
    fn invoke<'a>(&'a self, call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>>;

    /// Checks if this toolbox has a tool with the given name.
    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|tool| tool.name == name)
    }
}

impl<T: ToolBox + ?Sized> ToolBox for Arc<T> {
    fn tools(&self) -> Vec<ToolDefinition> {
        self.as_ref().tools()
    }

    fn invoke<'a>(&'a self, call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        self.as_ref().invoke(call, ctx)
    }

    fn has_tool(&self, name: &str) -> bool {
        self.as_ref().has_tool(name)
    }
}

/// A container that holds multiple toolboxes and provides a unified interface
/// for tool discovery and invocation.
///
/// Definitions are computed once when a toolbox is added.
#[derive(Clone, Default)]
pub struct ToolSet {
    toolboxes: Vec<Arc<dyn ToolBox>>,
    definitions: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("toolboxes_count", &self.toolboxes.len())
            .field("tools", &self.definitions.iter().map(|t| &t.name).collect::<Vec<_>>())
            .finish()
    }
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a toolbox to this set. Later toolboxes never shadow earlier tool names.
    pub fn add_toolbox(&mut self, toolbox: impl ToolBox + 'static) {
        let position = self.toolboxes.len();
        for definition in toolbox.tools() {
            if self.index.contains_key(&definition.name) {
                tracing::warn!(tool = %definition.name, "duplicate tool name ignored");
                continue;
            }
            self.index.insert(definition.name.clone(), position);
            self.definitions.push(definition);
        }
        self.toolboxes.push(Arc::new(toolbox));
    }

    /// Adds a toolbox to this set using a builder pattern.
    #[must_use]
    pub fn with_toolbox(mut self, toolbox: impl ToolBox + 'static) -> Self {
        self.add_toolbox(toolbox);
        self
    }

    /// Returns all tools from all toolboxes in this set.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Invokes a tool by delegating the call to the toolbox that owns it.
    pub async fn invoke(&self, call: ToolCall, ctx: ToolContext<'_>) -> Result<Value, ToolError> {
        let toolbox = self
            .index
            .get(&call.name)
            .and_then(|&position| self.toolboxes.get(position))
            .ok_or_else(|| ToolError::not_found(&call.name))?;

        toolbox.invoke(call, ctx).await
    }
}

impl ToolBox for ToolSet {
    fn tools(&self) -> Vec<ToolDefinition> {
        self.definitions.clone()
    }

    fn invoke<'a>(&'a self, call: ToolCall, ctx: ToolContext<'a>) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move { ToolSet::invoke(self, call, ctx).await })
    }

    fn has_tool(&self, name: &str) -> bool {
        ToolSet::has_tool(self, name)
    }
}
