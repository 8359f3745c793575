//! min-agent command line
//!
//! Builds an agent with the default tools, answers one message and prints
//! the result. Logs go to stderr; stdout carries only the answer.

mod cli;

use std::sync::Arc;

use agent_core::{AgentBuilder, LlmProvider};
use agent_runtime::{OllamaConfig, OllamaProvider, OpenAiConfig, OpenAiProvider};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Args, ProviderKind};

fn build_provider(args: &Args) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match args.provider {
        ProviderKind::Openai => {
            let mut config = OpenAiConfig::from_env();
            if let Some(url) = &args.base_url {
                config = config.with_base_url(url.clone());
            }
            if config.api_key.is_none() {
                tracing::warn!("OPENAI_API_KEY is not set; sending requests without authentication");
            }
            Arc::new(OpenAiProvider::from_config(config)?)
        }
        ProviderKind::Ollama => {
            let mut config = OllamaConfig::from_env();
            if let Some(url) = &args.base_url {
                config.host = url.clone();
            }
            Arc::new(OllamaProvider::from_config(&config)?)
        }
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    let default_filter = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let provider = build_provider(&args)?;
    let model = args.resolve_model(std::env::var("MODEL_NAME").ok());

    let tools = agent_tools::default_registry(args.lang);
    tracing::info!(provider = provider.name(), model = %model, "Registered {} tools: {}", tools.len(), tools.names().join(", "));

    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .model(model)
        .retry(args.retry)
        .verbose(args.verbose)
        .language(args.lang)
        .build()?;

    match agent.chat(&args.message).await {
        Ok(answer) => {
            println!("agent output: {}", answer);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, retryable = e.is_retryable(), "Chat failed");
            Err(anyhow::anyhow!(e.user_message()))
        }
    }
}
