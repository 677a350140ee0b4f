//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::{self, LiveFileSystem, LiveGitRepo};
use crate::adapters::recording::{RecordingGitRepo, RecordingLlmClient, SharedRecorder};
use crate::adapters::replaying::{ReplayingGitRepo, ReplayingLlmClient, SharedReplayer};
use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer};
use crate::config::BackendConfig;
use crate::error::BoxError;
use crate::ports::{CompletionFuture, CompletionRequest, FileSystem, GitRepo, LlmClient};

/// Environment variable naming a cassette file to record into.
pub const RECORD_ENV: &str = "CODESCRIBE_RECORD";
/// Environment variable naming a cassette file to replay from.
pub const REPLAY_ENV: &str = "CODESCRIBE_REPLAY";

const NO_MODEL: &str = "no language model configured for this command";
const SHUTTING_DOWN: &str = "service context is shutting down";

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). File reads always go to the real filesystem.
pub struct ServiceContext {
    /// LLM client for language-model completions.
    pub llm: Box<dyn LlmClient>,
    /// Git repository for version-control queries.
    pub git: Box<dyn GitRepo>,
    /// Filesystem for file I/O.
    pub fs: Box<dyn FileSystem>,
    recorder: Option<SharedRecorder>,
}

impl ServiceContext {
    /// Creates a live context talking to the configured provider.
    ///
    /// Without a configuration every completion fails; commands that never
    /// call the model pass `None`.
    #[must_use]
    pub fn live(config: Option<&BackendConfig>) -> Self {
        Self {
            llm: config.map_or_else(|| unavailable(NO_MODEL), live::client_for),
            git: Box::new(LiveGitRepo),
            fs: Box::new(LiveFileSystem),
            recorder: None,
        }
    }

    /// Creates a recording context that writes a cassette file on drop.
    ///
    /// Uses live adapters for the actual work.
    #[must_use]
    pub fn recording(path: &Path, config: Option<&BackendConfig>) -> Self {
        let recorder: SharedRecorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "codescribe-session")));
        let llm: Box<dyn LlmClient> = match config {
            Some(config) => Box::new(RecordingLlmClient::new(live::client_for(config), &recorder)),
            None => unavailable(NO_MODEL),
        };
        Self {
            llm,
            git: Box::new(RecordingGitRepo::new(Box::new(LiveGitRepo), &recorder)),
            fs: Box::new(LiveFileSystem),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let replayer: SharedReplayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Ok(Self {
            llm: Box::new(ReplayingLlmClient::new(&replayer)),
            git: Box::new(ReplayingGitRepo::new(&replayer)),
            fs: Box::new(LiveFileSystem),
            recorder: None,
        })
    }

    /// Picks replay, record or live mode from the process environment.
    ///
    /// `config` is only consulted outside replay mode, so replaying never
    /// needs credentials. It yields `None` when the command never calls the
    /// model.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded or if building
    /// the live configuration fails.
    pub fn from_env<F>(config: F) -> Result<Self, String>
    where
        F: FnOnce() -> Result<Option<BackendConfig>, String>,
    {
        if let Some(path) = std::env::var_os(REPLAY_ENV) {
            tracing::info!(cassette = %Path::new(&path).display(), "replaying recorded session");
            return Self::replaying(Path::new(&path));
        }
        let config = config()?;
        if let Some(path) = std::env::var_os(RECORD_ENV) {
            tracing::info!(cassette = %Path::new(&path).display(), "recording session");
            return Ok(Self::recording(Path::new(&path), config.as_ref()));
        }
        Ok(Self::live(config.as_ref()))
    }

    /// Stamps the analysed commit into the cassette being recorded, if any.
    pub fn set_recorded_commit(&self, commit: &str) {
        if let Some(recorder) = &self.recorder {
            recorder.lock().unwrap_or_else(PoisonError::into_inner).set_commit(commit);
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        // Adapters hold clones of the recorder; release them first.
        self.llm = unavailable(SHUTTING_DOWN);
        self.git = Box::new(Unavailable(SHUTTING_DOWN));
        let recorder = match Arc::try_unwrap(recorder) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(_) => {
                tracing::warn!("cassette recorder still shared; cassette not written");
                return;
            }
        };
        match recorder.finish() {
            Ok(path) => tracing::info!(cassette = %path.display(), "cassette written"),
            Err(e) => tracing::warn!(error = %e, "failed to write cassette"),
        }
    }
}

fn unavailable(reason: &'static str) -> Box<dyn LlmClient> {
    Box::new(Unavailable(reason))
}

/// Port that refuses every call with a fixed reason.
struct Unavailable(&'static str);

impl LlmClient for Unavailable {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        let reason = self.0;
        Box::pin(async move { Err(reason.into()) })
    }
}

impl GitRepo for Unavailable {
    fn current_commit(&self, _root: &Path) -> Result<String, BoxError> {
        Err(self.0.into())
    }

    fn list_files(&self, _root: &Path) -> Result<Vec<String>, BoxError> {
        Err(self.0.into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::{Interaction, Port};

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn replaying_context_serves_git_from_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");
        write_cassette(
            &path,
            vec![Interaction {
                seq: 0,
                port: Port::Git,
                method: "current_commit".into(),
                input: json!({"root": "/repo"}),
                output: json!({"ok": "0123abcd"}),
            }],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.git.current_commit(Path::new("/repo")).unwrap(), "0123abcd");
    }

    #[test]
    fn replaying_context_rejects_missing_cassette() {
        let err = ServiceContext::replaying(Path::new("/nonexistent/x.cassette.yaml"))
            .err()
            .expect("missing cassette should fail");
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let cassette = dir.path().join("out/rec.cassette.yaml");
        let config = BackendConfig::from_lookup(crate::config::Provider::Ollama, |_| None).unwrap();

        {
            let ctx = ServiceContext::recording(&cassette, Some(&config));
            ctx.set_recorded_commit("feedface");
            let _ = ctx.git.list_files(&dir.path().join("not-a-repo"));
        }

        let written = Cassette::load(&cassette).unwrap();
        assert_eq!(written.commit, "feedface");
        assert_eq!(written.interactions[0].port, Port::Git);
        assert!(written.interactions[0].output.get("err").is_some());
    }

    #[tokio::test]
    async fn live_context_without_model_refuses_completions() {
        let ctx = ServiceContext::live(None);
        let request = CompletionRequest {
            model: "none".into(),
            system: None,
            prompt: "Describe this.".into(),
            max_tokens: 10,
            temperature: 0.0,
        };
        let err = ctx.llm.complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("no language model configured"));
    }
}
