//! # agent-tools
//!
//! The tools the agent ships with:
//!
//! - **`GoogleSearch`**: web search via the Serper API (`SERPER_API_KEY`)
//! - **`CurrentTime`**: the local system time
//!
//! Both are gathered in the closed [`BuiltinTool`] set so the command line
//! can build its registry without knowing the concrete types.

pub mod clock;
pub mod error;
pub mod search;

pub use clock::CurrentTime;
pub use error::{Result, ToolError};
pub use search::GoogleSearch;

use agent_core::{ParameterSchema, PromptLanguage, Result as CoreResult, Tool, ToolParams, ToolRegistry};
use async_trait::async_trait;

/// Every tool this crate provides
pub enum BuiltinTool {
    GoogleSearch(GoogleSearch),
    CurrentTime(CurrentTime),
}

impl BuiltinTool {
    fn inner(&self) -> &dyn Tool {
        match self {
            BuiltinTool::GoogleSearch(tool) => tool,
            BuiltinTool::CurrentTime(tool) => tool,
        }
    }
}

#[async_trait]
impl Tool for BuiltinTool {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn description(&self) -> &str {
        self.inner().description()
    }

    fn parameters(&self) -> Vec<ParameterSchema> {
        self.inner().parameters()
    }

    async fn call(&self, params: &ToolParams) -> CoreResult<String> {
        self.inner().call(params).await
    }
}

/// The default tool set, configured from the environment and described in
/// `language`
pub fn default_tools(language: PromptLanguage) -> Vec<BuiltinTool> {
    vec![
        BuiltinTool::GoogleSearch(GoogleSearch::from_env().with_language(language)),
        BuiltinTool::CurrentTime(CurrentTime::new(language)),
    ]
}

/// A registry holding [`default_tools`]
pub fn default_registry(language: PromptLanguage) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in default_tools(language) {
        registry.register(tool);
    }
    registry
}
