//! Tool System
//!
//! Tools are registered once when the agent is built and invoked by name
//! from the tool calls the planner extracts from the model's reply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Keyword arguments passed to a tool
pub type ToolParams = serde_json::Map<String, Value>;

/// One tool invocation requested by the planner
///
/// Wraps the JSON object the model emitted. The planner only checks that it
/// is an object; the typed accessors below are where missing or mistyped
/// fields are reported, at execution time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCallRequest {
    entry: serde_json::Map<String, Value>,
}

impl ToolCallRequest {
    /// Build a well-formed request
    pub fn new(tool_name: impl Into<String>, reason: impl Into<String>, params: ToolParams) -> Self {
        let mut entry = serde_json::Map::new();
        entry.insert("tool_name".into(), Value::String(tool_name.into()));
        entry.insert("reason".into(), Value::String(reason.into()));
        entry.insert("params".into(), Value::Object(params));
        Self { entry }
    }

    /// Wrap a raw object exactly as the model produced it
    pub fn from_object(entry: serde_json::Map<String, Value>) -> Self {
        Self { entry }
    }

    /// Name of the tool to invoke
    pub fn tool_name(&self) -> Result<&str> {
        match self.entry.get("tool_name") {
            Some(Value::String(name)) => Ok(name),
            Some(other) => Err(AgentError::ToolValidation(format!(
                "`tool_name` must be a string, got {}",
                other
            ))),
            None => Err(AgentError::ToolValidation(
                "tool call is missing `tool_name`".into(),
            )),
        }
    }

    /// Why the model wants this call; informational only
    pub fn reason(&self) -> Option<&str> {
        self.entry.get("reason").and_then(Value::as_str)
    }

    /// Keyword arguments for the tool
    pub fn params(&self) -> Result<&ToolParams> {
        match self.entry.get("params") {
            Some(Value::Object(params)) => Ok(params),
            Some(other) => Err(AgentError::ToolValidation(format!(
                "`params` must be an object, got {}",
                other
            ))),
            None => Err(AgentError::ToolValidation(
                "tool call is missing `params`".into(),
            )),
        }
    }

    /// The underlying JSON object
    pub fn as_object(&self) -> &serde_json::Map<String, Value> {
        &self.entry
    }
}

/// Parameter definition for a tool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

impl ParameterSchema {
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique, case-sensitive identifier the model refers to
    fn name(&self) -> &str;

    /// Short description, copied verbatim into the planning prompt
    fn description(&self) -> &str;

    /// Keyword parameters this tool accepts
    fn parameters(&self) -> Vec<ParameterSchema> {
        Vec::new()
    }

    /// Execute the tool with already validated parameters
    async fn call(&self, params: &ToolParams) -> Result<String>;

    /// Validate arguments before execution
    ///
    /// The default accepts exactly the declared parameters: every required
    /// one must be present and nothing undeclared may appear.
    fn validate(&self, params: &ToolParams) -> Result<()> {
        let schema = self.parameters();

        for param in &schema {
            if param.required && !params.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "{}: missing required parameter: {}",
                    self.name(),
                    param.name
                )));
            }
        }

        if let Some(unexpected) = params
            .keys()
            .find(|key| !schema.iter().any(|p| &p.name == *key))
        {
            return Err(AgentError::ToolValidation(format!(
                "{}: unexpected parameter: {}",
                self.name(),
                unexpected
            )));
        }

        Ok(())
    }
}

/// Fetch a required string parameter
pub fn required_str<'a>(params: &'a ToolParams, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::ToolValidation(format!("`{}` must be a string", key)))
}

/// Registry for available tools
///
/// Keeps registration order so the planning prompt lists tools the same way
/// on every call.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool; a tool with the same name is replaced in place
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if let Some(&slot) = self.index.get(&name) {
            tracing::warn!(tool = %name, "Replacing previously registered tool");
            self.tools[slot] = tool;
        } else {
            self.index.insert(name, self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.tools[slot]))
    }

    /// Get a tool by name, treating a miss as an error
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
    }

    /// Look up, validate and run the tool a request names
    ///
    /// An unknown name is reported before the request's params are checked.
    pub async fn invoke(&self, request: &ToolCallRequest) -> Result<String> {
        let name = request.tool_name()?;
        let tool = self.resolve(name)?;
        let params = request.params()?;

        tracing::debug!(tool = name, reason = request.reason().unwrap_or(""), "Invoking tool");
        tool.validate(params)?;

        tool.call(params).await
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Bulleted `- name: description` list for the planning prompt
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
