//! Command-line arguments

use agent_core::PromptLanguage;
use agent_core::reasoning::DEFAULT_RETRY;
use agent_runtime::ollama::DEFAULT_OLLAMA_MODEL;
use clap::{Parser, ValueEnum};

/// Which provider answers the prompts
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Any OpenAI-compatible `/chat/completions` endpoint
    Openai,
    /// A local Ollama server
    Ollama,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Openai => agent_core::provider::DEFAULT_MODEL,
            ProviderKind::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "min-agent", version, about = "Answer a question by planning tool calls, running them and summarising the results")]
pub struct Args {
    /// User input
    #[arg(long, default_value = "Please introduce LLM agents.")]
    pub message: String,

    /// Model name (falls back to MODEL_NAME, then a per-provider default)
    #[arg(long)]
    pub model_name: Option<String>,

    /// API root for OpenAI-compatible providers, host URL for Ollama
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model provider
    #[arg(long, value_enum, default_value_t = ProviderKind::Openai)]
    pub provider: ProviderKind,

    /// Planning attempts before giving up on malformed replies
    #[arg(long, default_value_t = DEFAULT_RETRY)]
    pub retry: usize,

    /// Prompt language (en, zh)
    #[arg(long, default_value = "en")]
    pub lang: PromptLanguage,

    /// Print prompts, model replies and tool results
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    /// Explicit flag, then `MODEL_NAME`, then the provider default
    pub fn resolve_model(&self, from_env: Option<String>) -> String {
        self.model_name
            .clone()
            .or(from_env.filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }
}
