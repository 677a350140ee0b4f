//! Live adapter for the `LlmClient` port using the OpenAI chat completions API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Live LLM client that calls the OpenAI chat completions API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    /// Creates a client authenticating with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { client: Client::new(), api_key: api_key.into() }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

fn messages(request: &CompletionRequest) -> Vec<ChatMessage<'_>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = request.system.as_deref() {
        messages.push(ChatMessage { role: "system", content: system });
    }
    messages.push(ChatMessage { role: "user", content: &request.prompt });
    messages
}

impl LlmClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = ChatRequest {
                model: &request.model,
                messages: messages(&request),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
            };

            let response = self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> BoxError { format!("OpenAI API request failed: {e}").into() })?;

            let status = response.status();
            let response_text = response.text().await.map_err(|e| -> BoxError {
                format!("Failed to read OpenAI API response: {e}").into()
            })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<OpenAiError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                return Err(format!("OpenAI API error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: ChatResponse =
                serde_json::from_str(&response_text).map_err(|e| -> BoxError {
                    format!("Failed to parse OpenAI API response: {e}").into()
                })?;

            let text = api_response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| -> BoxError { "OpenAI API returned no choices".into() })?;

            let (prompt_tokens, completion_tokens) = api_response
                .usage
                .map_or((0, 0), |usage| (usage.prompt_tokens, usage.completion_tokens));

            Ok(CompletionResponse { text: text.trim().to_string(), prompt_tokens, completion_tokens })
        })
    }
}
