//! Command dispatch and handlers.

pub mod analyze;
pub mod file;
pub mod structure;

use crate::cli::Command;
use crate::config::{BackendConfig, Provider};
use crate::context::ServiceContext;
use crate::describe::RequestSettings;

/// Dispatch a parsed command to its handler.
///
/// When `CODESCRIBE_REPLAY` names a cassette, every LLM and git interaction
/// is served from it and no credentials are needed. When `CODESCRIBE_RECORD`
/// names a path, live interactions are recorded there.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Analyze { repo, provider, output, format, with_structure, cache_capacity } => {
            analyze::run(&analyze::AnalyzeOptions {
                repo,
                provider: *provider,
                output: output.as_deref(),
                format: *format,
                with_structure: *with_structure,
                cache_capacity: *cache_capacity,
            })
        }
        Command::File { path, language, provider } => file::run(path, *language, *provider),
        Command::Structure { repo, overview, provider, output } => {
            structure::run(repo, *overview, *provider, output.as_deref())
        }
    }
}

/// Builds the service context and request settings for `provider`.
///
/// Configuration errors only surface when the model will actually be called
/// live; replay mode never reads credentials. Without a provider no backend
/// configuration is built at all.
fn service_context(
    provider: Option<Provider>,
) -> Result<(ServiceContext, RequestSettings), String> {
    let config = provider.map(BackendConfig::from_env).transpose().map_err(|e| e.to_string());
    let settings = config
        .as_ref()
        .ok()
        .and_then(Option::as_ref)
        .map(RequestSettings::from)
        .unwrap_or_default();
    let ctx = ServiceContext::from_env(|| config)?;
    Ok((ctx, settings))
}
