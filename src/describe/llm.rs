//! Description backend driven by an [`LlmClient`].

use tokio::runtime::{Builder, Runtime};

use super::{prompt, DescriptionBackend};
use crate::config::{BackendConfig, SYSTEM_PROMPT};
use crate::element::CodeElement;
use crate::error::{ConfigError, DescriptionError};
use crate::ports::{CompletionRequest, LlmClient};
use crate::structure::ProjectStructure;

const OVERVIEW_MAX_TOKENS: u32 = 500;

/// Per-request parameters sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSettings {
    /// Model identifier.
    pub model: String,
    /// System instruction.
    pub system_prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Token limit for class and method descriptions.
    pub element_max_tokens: u32,
    /// Token limit for module descriptions.
    pub module_max_tokens: u32,
}

impl From<&BackendConfig> for RequestSettings {
    fn from(config: &BackendConfig) -> Self {
        Self {
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            element_max_tokens: config.element_max_tokens,
            module_max_tokens: config.module_max_tokens,
        }
    }
}

impl Default for RequestSettings {
    /// Settings used when no provider is configured (cassette replay).
    fn default() -> Self {
        Self {
            model: "replay".to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: 0.2,
            element_max_tokens: 150,
            module_max_tokens: 100,
        }
    }
}

/// Synchronous description backend over an async [`LlmClient`].
///
/// Each call blocks on a private single-threaded runtime, so the pipeline
/// stays strictly sequential. Must not be used from inside another runtime.
pub struct LlmDescriber<'a> {
    client: &'a dyn LlmClient,
    settings: RequestSettings,
    project_context: Option<String>,
    runtime: Runtime,
}

impl<'a> LlmDescriber<'a> {
    /// Creates a describer sending requests through `client`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Runtime`] if the blocking runtime cannot start.
    pub fn new(client: &'a dyn LlmClient, settings: RequestSettings) -> Result<Self, ConfigError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { client, settings, project_context: None, runtime })
    }

    /// Prepends a project summary to every subsequent prompt.
    #[must_use]
    pub fn with_project_context(mut self, structure: &ProjectStructure) -> Self {
        self.project_context = Some(structure.summary());
        self
    }

    /// Asks for a high-level overview of a whole repository.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Unavailable`] if the completion fails.
    pub fn describe_project(&self, structure: &ProjectStructure) -> Result<String, DescriptionError> {
        self.complete(prompt::overview_prompt(&structure.summary()), OVERVIEW_MAX_TOKENS)
    }

    fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, DescriptionError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            system: Some(self.settings.system_prompt.clone()),
            prompt,
            max_tokens,
            temperature: self.settings.temperature,
        };
        let response = self
            .runtime
            .block_on(self.client.complete(&request))
            .map_err(|e| DescriptionError::Unavailable(e.to_string()))?;
        tracing::debug!(
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "completion received"
        );
        let text = response.text.trim();
        if text.is_empty() {
            return Err(DescriptionError::Unavailable("empty completion".to_string()));
        }
        Ok(text.to_string())
    }
}

impl DescriptionBackend for LlmDescriber<'_> {
    fn describe_code(&self, element: &CodeElement) -> Result<String, DescriptionError> {
        let prompt = prompt::element_prompt(element, self.project_context.as_deref());
        self.complete(prompt, self.settings.element_max_tokens)
    }

    fn describe_module(&self, docstring: &str) -> Result<String, DescriptionError> {
        let prompt = prompt::module_prompt(docstring, self.project_context.as_deref());
        self.complete(prompt, self.settings.module_max_tokens)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::BoxError;
    use crate::ports::{CompletionFuture, CompletionResponse};

    /// Returns canned text and remembers every request.
    struct ScriptedClient {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: Mutex::new(Vec::new()) }
        }

        fn failing(message: &str) -> Self {
            Self { reply: Err(message.to_string()), seen: Mutex::new(Vec::new()) }
        }
    }

    impl LlmClient for ScriptedClient {
        fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
            self.seen.lock().unwrap().push(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move {
                let text = reply.map_err(BoxError::from)?;
                Ok(CompletionResponse { text, prompt_tokens: 10, completion_tokens: 5 })
            })
        }
    }

    fn add() -> CodeElement {
        CodeElement::method("add", "def add(self, a, b): ...", None, vec!["a".into(), "b".into()])
    }

    #[test]
    fn element_requests_use_element_budget_and_system_prompt() {
        let client = ScriptedClient::replying("  Adds a and b.\n");
        let describer = LlmDescriber::new(&client, RequestSettings::default()).unwrap();

        assert_eq!(describer.describe_code(&add()).unwrap(), "Adds a and b.");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, 150);
        assert_eq!(seen[0].system.as_deref(), Some(SYSTEM_PROMPT));
        assert!((seen[0].temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn module_requests_use_module_budget() {
        let client = ScriptedClient::replying("Helpers.");
        let describer = LlmDescriber::new(&client, RequestSettings::default()).unwrap();
        describer.describe_module("Utility module.").unwrap();
        assert_eq!(client.seen.lock().unwrap()[0].max_tokens, 100);
    }

    #[test]
    fn client_failure_becomes_unavailable() {
        let client = ScriptedClient::failing("401 Unauthorized");
        let describer = LlmDescriber::new(&client, RequestSettings::default()).unwrap();
        let err = describer.describe_code(&add()).unwrap_err();
        assert!(matches!(err, DescriptionError::Unavailable(ref m) if m.contains("401")));
    }

    #[test]
    fn blank_completion_is_unavailable() {
        let client = ScriptedClient::replying("   ");
        let describer = LlmDescriber::new(&client, RequestSettings::default()).unwrap();
        assert!(describer.describe_module("doc").is_err());
    }

    #[test]
    fn project_context_reaches_every_prompt() {
        let client = ScriptedClient::replying("ok");
        let structure = ProjectStructure::from_paths(["src/app.py", "README.md"]);
        let describer = LlmDescriber::new(&client, RequestSettings::default())
            .unwrap()
            .with_project_context(&structure);

        describer.describe_code(&add()).unwrap();
        describer.describe_project(&structure).unwrap();

        let seen = client.seen.lock().unwrap();
        assert!(seen[0].prompt.starts_with("Project context:\n"));
        assert!(seen[1].prompt.starts_with("Given this project structure:"));
        assert_eq!(seen[1].max_tokens, 500);
    }
}
