//! Explicit backend configuration built from the process environment.
//!
//! Credentials are read once, when the configuration is built, and then passed
//! to the chosen client. Nothing reads the environment after that.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default system instruction sent with every description request.
pub const SYSTEM_PROMPT: &str =
    "You are a code analysis assistant. Provide clear, concise descriptions of source code.";

const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_ELEMENT_TOKENS: u32 = 150;
const DEFAULT_MODULE_TOKENS: u32 = 100;
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Hosted or local text-generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Anthropic messages API.
    Anthropic,
    /// OpenAI chat completions API.
    OpenAi,
    /// Local model served by Ollama.
    Ollama,
}

impl Provider {
    /// Lowercase provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    const fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-sonnet-20240229",
            Self::OpenAi => "gpt-4",
            Self::Ollama => "llama3",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Everything a description backend needs to talk to its provider.
#[derive(Clone, PartialEq)]
pub struct BackendConfig {
    /// Selected provider.
    pub provider: Provider,
    /// Model identifier sent with each request.
    pub model: String,
    /// API credential; `None` for the local provider.
    pub api_key: Option<String>,
    /// Base URL of a local server (Ollama only).
    pub endpoint: Option<String>,
    /// Token limit for class and method descriptions.
    pub element_max_tokens: u32,
    /// Token limit for module descriptions.
    pub module_max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// System instruction.
    pub system_prompt: String,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("element_max_tokens", &self.element_max_tokens)
            .field("module_max_tokens", &self.module_max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl BackendConfig {
    /// Builds the configuration for `provider` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the provider's API key
    /// variable is unset or empty.
    pub fn from_env(provider: Provider) -> Result<Self, ConfigError> {
        Self::from_lookup(provider, |key| std::env::var(key).ok())
    }

    /// Builds the configuration using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// Same as [`BackendConfig::from_env`].
    pub fn from_lookup(
        provider: Provider,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (api_key, endpoint) = match provider {
            Provider::Anthropic => (Some(require(provider, "ANTHROPIC_API_KEY", &get)?), None),
            Provider::OpenAi => (Some(require(provider, "OPENAI_API_KEY", &get)?), None),
            Provider::Ollama => {
                (None, Some(get("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string())))
            }
        };

        Ok(Self {
            provider,
            model: get("CODESCRIBE_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            api_key,
            endpoint,
            element_max_tokens: DEFAULT_ELEMENT_TOKENS,
            module_max_tokens: DEFAULT_MODULE_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: SYSTEM_PROMPT.to_string(),
        })
    }
}

fn require(
    provider: Provider,
    variable: &'static str,
    get: &dyn Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    get(variable).ok_or(ConfigError::MissingCredential { provider: provider.as_str(), variable })
}
