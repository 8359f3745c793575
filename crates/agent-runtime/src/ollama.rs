//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, GenerationOptions, LlmProvider},
};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, MessageRole, request::ChatMessageRequest},
    models::ModelOptions,
};
use reqwest::Url;

/// Default model for local inference
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port, used when `host` does not carry one
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST")
            .unwrap_or_else(|_| "http://localhost".into());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);

        Self { host, port }
    }

    /// Server URL; an explicit port in `host` wins over `port`
    pub fn url(&self) -> Result<Url> {
        let invalid = |reason: &dyn std::fmt::Display| {
            AgentError::Config(format!("invalid Ollama host `{}`: {}", self.host, reason))
        };

        let mut url = Url::parse(self.host.trim()).map_err(|e| invalid(&e))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid(&"expected an http(s) URL such as http://localhost"));
        }
        if url.port().is_none() {
            url.set_port(Some(self.port))
                .map_err(|()| invalid(&"URL cannot carry a port"))?;
        }

        Ok(url)
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
    url: Url,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::from_config(&OllamaConfig {
            host: host.into(),
            port,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        let url = config.url()?;
        Ok(Self {
            client: Ollama::from_url(url.clone()),
            url,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&OllamaConfig::from_env())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Convert agent messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User => MessageRole::User,
                    Role::Assistant => MessageRole::Assistant,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }

    /// Map generation options onto Ollama model options
    ///
    /// Returns `None` when nothing is set so the server defaults apply.
    fn build_options(opts: &GenerationOptions) -> Option<ModelOptions> {
        if opts.temperature.is_none() && opts.max_tokens.is_none() {
            return None;
        }

        let mut options = ModelOptions::default();
        if let Some(temperature) = opts.temperature {
            options = options.temperature(temperature);
        }
        if let Some(max_tokens) = opts.max_tokens {
            options = options.num_predict(i32::try_from(max_tokens).unwrap_or(i32::MAX));
        }
        Some(options)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        tracing::debug!(
            url = %self.url,
            model = %options.model,
            "Sending Ollama chat request"
        );

        let mut request = ChatMessageRequest::new(
            options.model.clone(),
            Self::convert_messages(messages),
        );
        if let Some(model_options) = Self::build_options(options) {
            request = request.options(model_options);
        }

        let response = self.client
            .send_chat_messages(request)
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(Completion::new(response.message.content, options.model.clone()))
    }
}
