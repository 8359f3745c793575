//! Error Types for Built-in Tools

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("Search API returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("No snippets found in the search results.")]
    NoResults,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        AgentError::ToolExecution(err.to_string())
    }
}
