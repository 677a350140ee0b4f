//! `codescribe analyze` command.

use std::path::Path;

use crate::cli::OutputFormat;
use crate::config::Provider;
use crate::describe::LlmDescriber;
use crate::output::{self, RunHeader};
use crate::pipeline::{Extractor, RepositoryAnalyzer};
use crate::structure::ProjectStructure;
use crate::walker::RepositoryWalker;

/// Options for one `analyze` run.
#[derive(Debug)]
pub struct AnalyzeOptions<'a> {
    /// Repository root.
    pub repo: &'a Path,
    /// Description provider.
    pub provider: Provider,
    /// Destination file; stdout when absent.
    pub output: Option<&'a Path>,
    /// Output encoding.
    pub format: OutputFormat,
    /// Whether to build and inject the project structure.
    pub with_structure: bool,
    /// Cache bound; unbounded when absent.
    pub cache_capacity: Option<usize>,
}

/// Execute the `analyze` command.
///
/// # Errors
///
/// Returns an error string if configuration is incomplete, the repository
/// cannot be listed, or the results cannot be written.
pub fn run(options: &AnalyzeOptions<'_>) -> Result<(), String> {
    let (ctx, settings) = super::service_context(Some(options.provider))?;
    let walker = RepositoryWalker::new(ctx.git.as_ref(), ctx.fs.as_ref());

    let commit = walker.current_commit(options.repo);
    if let Some(commit) = &commit {
        ctx.set_recorded_commit(commit);
    }

    let structure = if options.with_structure {
        Some(ProjectStructure::analyze(&walker, options.repo).map_err(|e| e.to_string())?)
    } else {
        None
    };

    let mut describer = LlmDescriber::new(ctx.llm.as_ref(), settings).map_err(|e| e.to_string())?;
    if let Some(structure) = &structure {
        describer = describer.with_project_context(structure);
    }

    let extractor = Extractor::with_capacity(&describer, options.cache_capacity);
    let mut analyzer = RepositoryAnalyzer::new(walker, extractor);
    let results = analyzer.analyze(options.repo).map_err(|e| e.to_string())?;

    let header = RunHeader::now(options.repo.display().to_string(), commit);
    let rendered = match options.format {
        OutputFormat::Text => output::render_text(&header, &results, structure.as_ref()),
        OutputFormat::Json => output::render_json(&header, &results, structure.as_ref())
            .map_err(|e| format!("Failed to serialize results: {e}"))?,
    };

    match options.output {
        Some(path) => {
            ctx.fs.write(path, &rendered).map_err(|e| {
                format!("Failed to write results to {}: {e}", path.display())
            })?;
            eprintln!("Analysis of {} file(s) written to {}", results.len(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
