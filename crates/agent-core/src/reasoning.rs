//! Plan, Act, Solve
//!
//! One `chat` turn is a fixed pipeline: the [`Planner`] asks the model which
//! tools to call, the [`Executor`] runs them, and the [`Solver`] asks the
//! model to answer from their output. Nothing is carried between turns.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::executor::Executor;
use crate::planner::Planner;
use crate::prompt::{PromptLanguage, PromptTemplates};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::solver::Solver;
use crate::tool::{Tool, ToolRegistry};

/// Default number of planning attempts
pub const DEFAULT_RETRY: usize = 3;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Planning attempts before giving up on malformed replies
    pub retry: usize,

    /// Emit prompts, replies and tool results at `info` instead of `debug`
    pub verbose: bool,

    /// Generation options
    pub generation: GenerationOptions,

    /// Planner and solver templates
    pub prompts: PromptTemplates,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            retry: DEFAULT_RETRY,
            verbose: false,
            generation: GenerationOptions::default(),
            prompts: PromptTemplates::default(),
        }
    }
}

/// Trace one step of a turn
pub(crate) fn trace_step(verbose: bool, step: &'static str, text: &str) {
    if verbose {
        tracing::info!(step, "{}", text);
    } else {
        tracing::debug!(step, "{}", text);
    }
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Answer one message: plan, execute the tools, solve
    ///
    /// Any failure ends the turn; tool output gathered so far is dropped.
    pub async fn chat(&self, message: &str) -> Result<String> {
        let span = tracing::info_span!(
            "chat",
            turn = %Uuid::new_v4(),
            provider = self.provider.name(),
            model = %self.config.generation.model,
        );

        async {
            let provider = self.provider.as_ref();

            let requests = Planner::new(provider, &self.config)
                .plan(message, &self.tools)
                .await?;

            let results = Executor::new(self.config.verbose)
                .execute(&requests, &self.tools)
                .await?;

            Solver::new(provider, &self.config)
                .solve(message, &results)
                .await
        }
        .instrument(span)
        .await
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = Some(temp);
        self
    }

    pub fn retry(mut self, retry: usize) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn language(mut self, language: PromptLanguage) -> Self {
        self.config.prompts = PromptTemplates::for_language(language);
        self
    }

    pub fn prompts(mut self, prompts: PromptTemplates) -> Self {
        self.config.prompts = prompts;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.retry == 0 {
            return Err(AgentError::Config("retry must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
