//! Test doubles for the provider and tool seams

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::tool::{ParameterSchema, Tool, ToolParams};

/// Replays queued replies and records every prompt it receives
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn from_results(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion> {
        assert_eq!(messages.len(), 1, "agent sends single-message exchanges");
        self.prompts.lock().unwrap().push(messages[0].content.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Provider("script exhausted".into())))?;
        Ok(Completion::new(reply, options.model.clone()))
    }
}

enum Behavior {
    Fixed(String),
    Echo,
    Fail(String),
}

/// A deterministic tool with a configurable name and output
pub struct StaticTool {
    name: String,
    description: String,
    parameters: Vec<ParameterSchema>,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl StaticTool {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.into(),
            description: "Static test tool.".into(),
            parameters: Vec::new(),
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always returns `output`
    pub fn new(name: &str, output: &str) -> Self {
        Self::with_behavior(name, Behavior::Fixed(output.into()))
    }

    /// Returns its `text` parameter
    pub fn echo(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Echo)
            .with_parameter(ParameterSchema::required("text", "string", "Text to repeat"))
    }

    /// Always fails with a tool execution error
    pub fn failing(name: &str, message: &str) -> Self {
        Self::with_behavior(name, Behavior::Fail(message.into()))
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Shared counter of completed `call`s
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Vec<ParameterSchema> {
        self.parameters.clone()
    }

    async fn call(&self, params: &ToolParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Fixed(output) => Ok(output.clone()),
            Behavior::Echo => crate::tool::required_str(params, "text").map(str::to_string),
            Behavior::Fail(message) => Err(AgentError::ToolExecution(message.clone())),
        }
    }
}
