//! OpenAI-compatible LLM Provider
//!
//! Implementation of `LlmProvider` for any endpoint that speaks the
//! `/chat/completions` protocol (OpenAI, DeepSeek, vLLM, LM Studio, ...).

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API root; `/chat/completions` is appended
    pub base_url: String,

    /// Bearer token, if the endpoint needs one
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            base_url,
            api_key,
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env())
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn build_request<'a>(messages: &'a [Message], options: &'a GenerationOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// Convert a chat completion body to an agent completion
    fn convert_completion(response: ChatResponse, model: &str) -> Result<Completion> {
        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentError::Provider("response contained no message content".into()))?;

        Ok(Completion {
            content,
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage,
        })
    }

    /// Map a non-success HTTP status to the matching error
    fn status_error(status: StatusCode, body: &str) -> AgentError {
        let detail = format!("{}: {}", status, body.trim());
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            AgentError::Auth(detail)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            AgentError::RateLimited(detail)
        } else if status.is_server_error() {
            AgentError::ProviderUnavailable(detail)
        } else {
            AgentError::Provider(detail)
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options);

        tracing::debug!(
            endpoint = %self.config.endpoint(),
            model = %options.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self.client.post(self.config.endpoint()).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AgentError::ProviderUnavailable(e.to_string())
            } else {
                AgentError::Provider(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("invalid response body: {}", e)))?;

        Self::convert_completion(body, &options.model)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.endpoint(), "https://api.openai.com/v1/chat/completions");

        let local = config.with_base_url("http://localhost:8000/v1/");
        assert_eq!(local.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let messages = vec![Message::user("What time is it?")];
        let options = GenerationOptions::for_model("gpt-4o-mini");

        let body = serde_json::to_value(OpenAiProvider::build_request(&messages, &options)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "What time is it?"}]
            })
        );
    }

    #[test]
    fn test_convert_completion() {
        let body: ChatResponse = serde_json::from_str(
            r#"{
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "[]"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
            }"#,
        )
        .unwrap();

        let completion = OpenAiProvider::convert_completion(body, "gpt-4o-mini").unwrap();
        assert_eq!(completion.content, "[]");
        assert_eq!(completion.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(completion.usage.unwrap().total_tokens, 11);
    }

    #[test]
    fn test_convert_completion_without_content() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = OpenAiProvider::convert_completion(body, "gpt-4o-mini").unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            OpenAiProvider::status_error(StatusCode::UNAUTHORIZED, "bad key"),
            AgentError::Auth(_)
        ));
        assert!(matches!(
            OpenAiProvider::status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            AgentError::RateLimited(_)
        ));
        assert!(matches!(
            OpenAiProvider::status_error(StatusCode::BAD_GATEWAY, ""),
            AgentError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            OpenAiProvider::status_error(StatusCode::BAD_REQUEST, "unknown model"),
            AgentError::Provider(msg) if msg.contains("unknown model")
        ));
    }
}
