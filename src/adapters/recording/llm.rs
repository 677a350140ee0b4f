//! Recording adapter for the `LlmClient` port.

use std::sync::Arc;

use super::{record_result, SharedRecorder};
use crate::cassette::Port;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Records LLM interactions while delegating to an inner implementation.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: SharedRecorder,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    pub fn new(inner: Box<dyn LlmClient>, recorder: &SharedRecorder) -> Self {
        Self { inner, recorder: Arc::clone(recorder) }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            record_result(&self.recorder, Port::Llm, "complete", &request, &result);
            result
        })
    }
}
