//! Live adapters for real external interactions.

pub mod anthropic;
pub mod filesystem;
pub mod git;
pub mod ollama;
pub mod openai;

use crate::config::{BackendConfig, Provider};
use crate::ports::LlmClient;

pub use anthropic::AnthropicClient;
pub use filesystem::LiveFileSystem;
pub use git::LiveGitRepo;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Builds the live client for the configured provider.
///
/// Provider dispatch happens here, once; callers only see `dyn LlmClient`.
#[must_use]
pub fn client_for(config: &BackendConfig) -> Box<dyn LlmClient> {
    let api_key = config.api_key.clone().unwrap_or_default();
    match config.provider {
        Provider::Anthropic => Box::new(AnthropicClient::new(api_key)),
        Provider::OpenAi => Box::new(OpenAiClient::new(api_key)),
        Provider::Ollama => Box::new(OllamaClient::new(
            config.endpoint.clone().unwrap_or_else(|| "http://localhost:11434".to_string()),
        )),
    }
}
