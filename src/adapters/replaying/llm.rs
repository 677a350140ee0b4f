//! Replaying adapter for the `LlmClient` port.

use std::sync::Arc;

use super::{next_interaction, SharedReplayer};
use crate::cassette::replayer::decode_output;
use crate::cassette::Port;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Serves recorded LLM completions from a cassette.
///
/// Completions are served in recorded order. A request whose prompt differs
/// from the recorded one still gets the recorded answer, with a warning.
pub struct ReplayingLlmClient {
    replayer: SharedReplayer,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: &SharedReplayer) -> Self {
        Self { replayer: Arc::clone(replayer) }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let interaction = next_interaction(&self.replayer, Port::Llm, "complete");
        let recorded = interaction.input.get("prompt").and_then(serde_json::Value::as_str);
        if recorded != Some(request.prompt.as_str()) {
            tracing::warn!(
                seq = interaction.seq,
                "replayed completion was recorded for a different prompt"
            );
        }
        Box::pin(async move { decode_output(&interaction.output, "llm::complete") })
    }
}
