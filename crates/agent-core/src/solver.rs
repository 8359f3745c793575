//! Solver
//!
//! Hands the question and the collected tool output back to the model and
//! returns whatever it answers.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::error::{AgentError, Result};
use crate::executor::ActionResult;
use crate::message::Message;
use crate::provider::LlmProvider;
use crate::reasoning::{AgentConfig, trace_step};

/// Compact JSON with a space after `,` and `:`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serialize tool results for the solver prompt
///
/// Non-ASCII text is written as is. An empty result is `{}`.
pub fn reference_json(results: &ActionResult) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    results.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| AgentError::Other(e.to_string()))
}

/// Produces the final answer from tool output
pub struct Solver<'a> {
    provider: &'a dyn LlmProvider,
    config: &'a AgentConfig,
}

impl<'a> Solver<'a> {
    pub fn new(provider: &'a dyn LlmProvider, config: &'a AgentConfig) -> Self {
        Self { provider, config }
    }

    /// One model call; the reply is returned unmodified
    pub async fn solve(&self, question: &str, results: &ActionResult) -> Result<String> {
        let reference = reference_json(results)?;
        let prompt = self.config.prompts.render_solver(question, &reference);
        trace_step(self.config.verbose, "solve.prompt", &prompt);

        let completion = self
            .provider
            .complete(&[Message::user(prompt)], &self.config.generation)
            .await?;
        trace_step(self.config.verbose, "solve.reply", &completion.content);

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                model = %completion.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Solver completion"
            );
        }

        Ok(completion.content)
    }
}
