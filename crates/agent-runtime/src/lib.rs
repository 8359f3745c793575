//! # agent-runtime
//!
//! Runtime providers for the plan-act-solve agent.
//!
//! ## Providers
//!
//! - **OpenAI-compatible** (always available): any `/chat/completions` endpoint
//! - **Ollama** (feature `ollama`, default): local inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use openai::{OpenAiConfig, OpenAiProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentBuilder, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry};
