//! `codescribe file` command.

use std::path::Path;

use crate::config::Provider;
use crate::describe::LlmDescriber;
use crate::language::Language;
use crate::pipeline::Extractor;
use crate::walker::RepositoryWalker;

/// Execute the `file` command.
///
/// Describes one source file outside any repository walk.
///
/// # Errors
///
/// Returns an error string if the language cannot be determined, the file
/// cannot be read or parsed, or configuration is incomplete.
pub fn run(path: &Path, language: Option<Language>, provider: Provider) -> Result<(), String> {
    let language = language.or_else(|| Language::from_path(path)).ok_or_else(|| {
        format!("Cannot determine the language of {}; pass --language", path.display())
    })?;

    let (ctx, settings) = super::service_context(Some(provider))?;
    let walker = RepositoryWalker::new(ctx.git.as_ref(), ctx.fs.as_ref());
    let source = walker.read_file(path).map_err(|e| e.to_string())?;

    let describer = LlmDescriber::new(ctx.llm.as_ref(), settings).map_err(|e| e.to_string())?;
    let report = Extractor::new(&describer)
        .analyze_source(&source, language)
        .map_err(|e| format!("Failed to analyze {}: {e}", path.display()))?;

    if report.is_empty() {
        println!("No describable elements found in {}.", path.display());
    } else {
        println!("--- {} ---\n{}", path.display(), report.render());
    }
    Ok(())
}
