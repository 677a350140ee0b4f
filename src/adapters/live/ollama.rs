//! Live adapter for the `LlmClient` port backed by a local Ollama server.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// LLM client for a locally served model.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    /// Creates a client for the server at `endpoint` (e.g. `http://localhost:11434`).
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: Client::new(), endpoint: endpoint.into() }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
    stop: [&'static str; 2],
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}

impl LlmClient for OllamaClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();
        let url = self.generate_url();

        Box::pin(async move {
            let body = GenerateRequest {
                model: &request.model,
                prompt: &request.prompt,
                system: request.system.as_deref(),
                stream: false,
                options: GenerateOptions {
                    temperature: request.temperature,
                    num_predict: request.max_tokens,
                    stop: ["User:", "\n\n"],
                },
            };

            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> BoxError { format!("Ollama request to {url} failed: {e}").into() })?;

            let status = response.status();
            let response_text = response.text().await.map_err(|e| -> BoxError {
                format!("Failed to read Ollama response: {e}").into()
            })?;

            if !status.is_success() {
                return Err(format!("Ollama error ({}): {response_text}", status.as_u16()).into());
            }

            let parsed: GenerateResponse =
                serde_json::from_str(&response_text).map_err(|e| -> BoxError {
                    format!("Failed to parse Ollama response: {e}").into()
                })?;

            Ok(CompletionResponse {
                text: parsed.response.trim().to_string(),
                prompt_tokens: parsed.prompt_eval_count,
                completion_tokens: parsed.eval_count,
            })
        })
    }
}
