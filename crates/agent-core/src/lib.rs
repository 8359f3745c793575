//! # agent-core
//!
//! Plan, act and solve loop with a provider-agnostic LLM abstraction and a
//! name-keyed tool registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             Agent                                │
//! │  ┌───────────┐      ┌────────────┐      ┌───────────┐            │
//! │  │  Planner  │─────▶│  Executor  │─────▶│  Solver   │            │
//! │  └─────┬─────┘      └─────┬──────┘      └─────┬─────┘            │
//! │        │                  │                   │                  │
//! │  ┌─────▼──────────────────┼───────────────────▼─────┐            │
//! │  │               LlmProvider (Strategy)             │            │
//! │  └──────────────────────────────────────────────────┘            │
//! │                    ┌──────▼───────┐                              │
//! │                    │ ToolRegistry │                              │
//! │                    └──────────────┘                              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each [`Agent::chat`] call makes one planning request (more if the reply
//! is malformed and retried), runs the requested tools in order, and makes
//! one solving request. The `LlmProvider` trait enables swapping between
//! OpenAI-compatible endpoints, Ollama, or any other provider without
//! changing agent logic.

pub mod error;
pub mod executor;
pub mod message;
pub mod planner;
pub mod prompt;
pub mod provider;
pub mod reasoning;
pub mod solver;
pub mod tool;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AgentError, PlanFailure, Result};
pub use executor::{ActionResult, Executor};
pub use message::{Message, Role};
pub use planner::{Planner, parse_plan, strip_code_fence};
pub use prompt::{PromptLanguage, PromptTemplates, render_planner_prompt, render_solver_prompt};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use solver::Solver;
pub use tool::{ParameterSchema, Tool, ToolCallRequest, ToolParams, ToolRegistry};
