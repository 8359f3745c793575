//! Google Search Tool
//!
//! Searches Google through the [Serper](https://serper.dev) API and reduces
//! the response to a line of text snippets.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | The search query |

use std::time::Duration;

use agent_core::tool::required_str;
use agent_core::{ParameterSchema, PromptLanguage, Result as CoreResult, Tool, ToolParams};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, ToolError};

/// Canonical tool name
pub const GOOGLE_SEARCH: &str = "GoogleSearch";

/// Serper search endpoint
pub const SERPER_URL: &str = "https://google.serper.dev/search";

/// Environment variable holding the Serper API key
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

const DESCRIPTION_EN: &str = "Searches Google for a question. Its input is the question, in a parameter named query; its output is the search results.";
const DESCRIPTION_ZH: &str = "使用谷歌搜索问题，它的输入是一个问题，参数名为 query，输出是搜索结果。";

/// Number of organic results used by default
pub const DEFAULT_TOP_K: usize = 5;

/// Tool for searching the web via Serper
pub struct GoogleSearch {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    top_k: usize,
    language: PromptLanguage,
}

impl GoogleSearch {
    pub fn new(api_key: Option<String>, top_k: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            endpoint: SERPER_URL.into(),
            top_k,
            language: PromptLanguage::default(),
        }
    }

    /// Read the API key from `SERPER_API_KEY`
    pub fn from_env() -> Self {
        let api_key = std::env::var(SERPER_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::new(api_key, DEFAULT_TOP_K)
    }

    /// Describe the tool in the planner prompt's language
    pub fn with_language(mut self, language: PromptLanguage) -> Self {
        self.language = language;
        self
    }

    /// Point at a different Serper-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn search(&self, query: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingApiKey(SERPER_API_KEY_ENV))?;

        tracing::debug!(query, "Querying Serper");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("q", query)])
            .header("x-api-key", api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Upstream { status, body });
        }

        let body: Value = response.json().await?;
        Ok(parse_snippets(&body, self.top_k)?.join(" "))
    }
}

impl Default for GoogleSearch {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl Tool for GoogleSearch {
    fn name(&self) -> &str {
        GOOGLE_SEARCH
    }

    fn description(&self) -> &str {
        match self.language {
            PromptLanguage::En => DESCRIPTION_EN,
            PromptLanguage::Zh => DESCRIPTION_ZH,
        }
    }

    fn parameters(&self) -> Vec<ParameterSchema> {
        vec![ParameterSchema::required("query", "string", "The search query")]
    }

    async fn call(&self, params: &ToolParams) -> CoreResult<String> {
        let query = required_str(params, "query")?;
        Ok(self.search(query).await?)
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_empty<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    })
}

/// Extract text snippets from a Serper response
///
/// A direct answer box wins outright. Otherwise knowledge graph facts come
/// first, followed by the top `top_k` organic results.
pub fn parse_snippets(results: &Value, top_k: usize) -> Result<Vec<String>> {
    if let Some(answer_box) = non_empty(results, "answerBox") {
        if let Some(answer) = non_empty(answer_box, "answer") {
            return Ok(vec![text(answer)]);
        }
        if let Some(snippet) = non_empty(answer_box, "snippet") {
            return Ok(vec![text(snippet).replace('\n', " ")]);
        }
        if let Some(highlighted) = non_empty(answer_box, "snippetHighlighted") {
            return Ok(match highlighted {
                Value::Array(items) => items.iter().map(text).collect(),
                other => vec![text(other)],
            });
        }
    }

    let mut snippets = Vec::new();

    if let Some(kg) = non_empty(results, "knowledgeGraph") {
        let title = kg.get("title").map(text).unwrap_or_default();
        if let Some(entity_type) = non_empty(kg, "type") {
            snippets.push(format!("{}: {}.", title, text(entity_type)));
        }
        if let Some(description) = non_empty(kg, "description") {
            snippets.push(text(description));
        }
        if let Some(Value::Object(attributes)) = kg.get("attributes") {
            for (attribute, value) in attributes {
                snippets.push(format!("{} {}: {}.", title, attribute, text(value)));
            }
        }
    }

    if let Some(Value::Array(organic)) = results.get("organic") {
        for result in organic.iter().take(top_k) {
            if let Some(snippet) = result.get("snippet") {
                snippets.push(text(snippet));
            }
            if let Some(Value::Object(attributes)) = result.get("attributes") {
                for (attribute, value) in attributes {
                    snippets.push(format!("{}: {}.", attribute, text(value)));
                }
            }
        }
    }

    if snippets.is_empty() {
        return Err(ToolError::NoResults);
    }

    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::AgentError;
    use serde_json::json;

    #[test]
    fn test_answer_box_wins() {
        let body = json!({
            "answerBox": {"answer": "42", "snippet": "ignored"},
            "organic": [{"snippet": "also ignored"}]
        });
        assert_eq!(parse_snippets(&body, 5).unwrap(), vec!["42"]);

        let body = json!({"answerBox": {"snippet": "line one\nline two"}});
        assert_eq!(parse_snippets(&body, 5).unwrap(), vec!["line one line two"]);

        let body = json!({"answerBox": {"snippetHighlighted": ["a", "b"]}});
        assert_eq!(parse_snippets(&body, 5).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_knowledge_graph_then_organic() {
        let body = json!({
            "knowledgeGraph": {
                "title": "Rust",
                "type": "Programming language",
                "description": "A systems language.",
                "attributes": {"Designed by": "Graydon Hoare"}
            },
            "organic": [
                {"snippet": "first", "attributes": {"Released": "2015"}},
                {"snippet": "second"},
                {"snippet": "third"}
            ]
        });

        assert_eq!(
            parse_snippets(&body, 2).unwrap(),
            vec![
                "Rust: Programming language.",
                "A systems language.",
                "Rust Designed by: Graydon Hoare.",
                "first",
                "Released: 2015.",
                "second",
            ]
        );
    }

    #[test]
    fn test_no_snippets() {
        let body = json!({"organic": [{"title": "no snippet here"}]});
        assert!(matches!(parse_snippets(&body, 5), Err(ToolError::NoResults)));
        assert!(matches!(parse_snippets(&json!({}), 5), Err(ToolError::NoResults)));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let tool = GoogleSearch::new(None, DEFAULT_TOP_K);
        let params = json!({"query": "rust"}).as_object().cloned().unwrap();

        let err = tool.call(&params).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(msg) if msg.contains(SERPER_API_KEY_ENV)));
    }

    #[test]
    fn test_schema() {
        let tool = GoogleSearch::new(Some("key".into()), DEFAULT_TOP_K);
        assert_eq!(tool.name(), "GoogleSearch");
        assert!(tool.description().contains("query"));

        let extra = json!({"query": "rust", "page": 2}).as_object().cloned().unwrap();
        assert!(tool.validate(&extra).is_err());
    }

    #[test]
    fn test_description_follows_language() {
        let tool = GoogleSearch::new(None, DEFAULT_TOP_K).with_language(PromptLanguage::Zh);
        assert!(tool.description().starts_with("使用谷歌搜索问题"));
        assert!(tool.description().contains("query"));
    }

    #[tokio::test]
    async fn test_non_string_query_is_validation_error() {
        let tool = GoogleSearch::new(Some("key".into()), DEFAULT_TOP_K);
        let params = json!({"query": 7}).as_object().cloned().unwrap();

        let err = tool.call(&params).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(msg) if msg.contains("query")));
    }
}
