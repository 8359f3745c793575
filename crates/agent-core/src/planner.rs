//! Planner
//!
//! Asks the model which tools to call for a question and turns its reply
//! into [`ToolCallRequest`]s. Malformed replies are resampled with the same
//! prompt a bounded number of times.

use serde_json::Value;

use crate::error::{AgentError, PlanFailure, Result};
use crate::message::Message;
use crate::provider::LlmProvider;
use crate::reasoning::{AgentConfig, trace_step};
use crate::tool::{ToolCallRequest, ToolRegistry};

/// A planning reply that could not be used
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanRejection {
    pub kind: PlanFailure,
    pub detail: String,
}

/// Remove a surrounding Markdown code fence from a model reply
///
/// Strips a leading ```` ```json ```` (or bare ```` ``` ````) and a trailing
/// ```` ``` ````, each only if present. An unterminated fence loses just its
/// opening marker.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Parse a planning reply into tool call requests
///
/// Only the shape is checked: the reply must be a JSON array whose elements
/// are all objects. Field checks happen when the calls are executed.
pub fn parse_plan(raw: &str) -> std::result::Result<Vec<ToolCallRequest>, PlanRejection> {
    let value: Value = serde_json::from_str(strip_code_fence(raw)).map_err(|e| PlanRejection {
        kind: PlanFailure::Syntax,
        detail: e.to_string(),
    })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(PlanRejection {
                kind: PlanFailure::Shape,
                detail: format!("expected a JSON array, got {}", json_kind(&other)),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(entry) => Ok(ToolCallRequest::from_object(entry)),
            other => Err(PlanRejection {
                kind: PlanFailure::Shape,
                detail: format!("element {} is {}, expected an object", i, json_kind(&other)),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Turns a question into tool calls via the model
pub struct Planner<'a> {
    provider: &'a dyn LlmProvider,
    config: &'a AgentConfig,
}

impl<'a> Planner<'a> {
    pub fn new(provider: &'a dyn LlmProvider, config: &'a AgentConfig) -> Self {
        Self { provider, config }
    }

    /// Plan the tool calls for `question`
    ///
    /// Issues the same prompt up to `config.retry` times. Provider errors are
    /// returned immediately; only unusable replies are retried.
    pub async fn plan(&self, question: &str, tools: &ToolRegistry) -> Result<Vec<ToolCallRequest>> {
        let prompt = self.config.prompts.render_planner(question, &tools.describe());
        trace_step(self.config.verbose, "plan.prompt", &prompt);

        let messages = [Message::user(prompt)];
        let max_attempts = self.config.retry.max(1);
        let mut attempts = 0;

        let rejection = loop {
            attempts += 1;

            let completion = self
                .provider
                .complete(&messages, &self.config.generation)
                .await?;
            trace_step(self.config.verbose, "plan.reply", &completion.content);

            match parse_plan(&completion.content) {
                Ok(calls) => {
                    tracing::debug!(attempts, calls = calls.len(), "Plan accepted");
                    for call in &calls {
                        tracing::debug!(
                            tool = call.tool_name().unwrap_or("<missing>"),
                            reason = call.reason().unwrap_or(""),
                            "Planned tool call"
                        );
                    }
                    return Ok(calls);
                }
                Err(rejection) if attempts >= max_attempts => break rejection,
                Err(rejection) => {
                    tracing::warn!(
                        attempt = attempts,
                        max_attempts,
                        kind = %rejection.kind,
                        "Rejected planning reply: {}",
                        rejection.detail
                    );
                }
            }
        };

        Err(AgentError::PlanParse {
            attempts,
            kind: rejection.kind,
            detail: rejection.detail,
        })
    }
}
