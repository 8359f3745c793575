//! Executor
//!
//! Runs planned tool calls one after another and collects their output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::reasoning::trace_step;
use crate::tool::{ToolCallRequest, ToolRegistry};

/// Tool outputs of one turn, keyed by tool name
///
/// Keys keep first-insertion order; a later result for the same tool
/// replaces the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionResult(serde_json::Map<String, Value>);

impl ActionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tool's output, replacing any previous output for that tool
    pub fn insert(&mut self, tool_name: impl Into<String>, output: impl Into<String>) -> Option<String> {
        self.0
            .insert(tool_name.into(), Value::String(output.into()))
            .and_then(|prev| prev.as_str().map(str::to_string))
    }

    pub fn get(&self, tool_name: &str) -> Option<&str> {
        self.0.get(tool_name).and_then(Value::as_str)
    }

    /// Tool names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Runs tool calls against a registry
pub struct Executor {
    verbose: bool,
}

impl Executor {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Execute `requests` in order
    ///
    /// The first failure aborts the batch and is returned as is: an unknown
    /// tool name, a malformed request, or whatever the tool itself reports.
    pub async fn execute(&self, requests: &[ToolCallRequest], registry: &ToolRegistry) -> Result<ActionResult> {
        let mut results = ActionResult::new();

        for request in requests {
            let output = registry.invoke(request).await?;
            let name = request.tool_name()?;

            if results.insert(name, output).is_some() {
                tracing::debug!(tool = name, "Overwriting earlier result");
            }
        }

        if let Ok(json) = serde_json::to_string(&results) {
            trace_step(self.verbose, "act.results", &json);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentError;
    use crate::testing::StaticTool;
    use crate::tool::{ParameterSchema, ToolParams};
    use serde_json::json;
    use std::collections::BTreeSet;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("CurrentTime", "Mon Jan  1 00:00:00 2024"));
        registry.register(StaticTool::echo("Echo"));
        registry
    }

    fn echo(text: &str) -> ToolCallRequest {
        let params = json!({"text": text}).as_object().cloned().unwrap();
        ToolCallRequest::new("Echo", "repeat", params)
    }

    fn time() -> ToolCallRequest {
        ToolCallRequest::new("CurrentTime", "need time", ToolParams::new())
    }

    #[tokio::test]
    async fn test_keys_match_requested_names() {
        let requests = vec![time(), echo("first"), echo("second")];
        let results = Executor::new(false).execute(&requests, &registry()).await.unwrap();

        let names: BTreeSet<&str> = results.names().collect();
        assert_eq!(names, BTreeSet::from(["CurrentTime", "Echo"]));
        assert_eq!(results.get("Echo"), Some("second"));
        assert_eq!(results.names().collect::<Vec<_>>(), vec!["CurrentTime", "Echo"]);
    }

    #[tokio::test]
    async fn test_empty_plan_gives_empty_result() {
        let results = Executor::new(false).execute(&[], &registry()).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(serde_json::to_string(&results).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_idempotent_with_pure_tools() {
        let requests = vec![echo("a"), time()];
        let executor = Executor::new(false);
        let registry = registry();

        let first = executor.execute(&requests, &registry).await.unwrap();
        let second = executor.execute(&requests, &registry).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_tool_aborts_batch() {
        let counter = StaticTool::new("CurrentTime", "now");
        let calls = counter.calls();
        let mut registry = ToolRegistry::new();
        registry.register(counter);

        let requests = vec![
            ToolCallRequest::new("Weather", "forecast", ToolParams::new()),
            time(),
        ];
        let err = Executor::new(false).execute(&requests, &registry).await.unwrap_err();

        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "Weather"));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_request_is_validation_error() {
        let missing_params = ToolCallRequest::from_object(
            json!({"tool_name": "CurrentTime"}).as_object().cloned().unwrap(),
        );
        let err = Executor::new(false)
            .execute(&[missing_params], &registry())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));

        let unexpected = ToolCallRequest::new(
            "CurrentTime",
            "r",
            json!({"zone": "UTC"}).as_object().cloned().unwrap(),
        );
        let err = Executor::new(false)
            .execute(&[unexpected], &registry())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }

    #[tokio::test]
    async fn test_tool_error_propagates_unchanged() {
        let mut registry = ToolRegistry::new();
        registry.register(
            StaticTool::failing("GoogleSearch", "No snippets found in the search results.")
                .with_parameter(ParameterSchema::required("query", "string", "query")),
        );
        let request = ToolCallRequest::new(
            "GoogleSearch",
            "search",
            json!({"query": "rust"}).as_object().cloned().unwrap(),
        );

        let err = Executor::new(false).execute(&[request], &registry).await.unwrap_err();
        assert!(
            matches!(err, AgentError::ToolExecution(msg) if msg == "No snippets found in the search results.")
        );
    }
}
