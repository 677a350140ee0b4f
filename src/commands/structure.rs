//! `codescribe structure` command.

use std::path::Path;

use crate::config::Provider;
use crate::describe::LlmDescriber;
use crate::structure::ProjectStructure;
use crate::walker::RepositoryWalker;

/// Execute the `structure` command.
///
/// Prints the project structure as JSON and, with `overview`, a model-written
/// summary of the project.
///
/// # Errors
///
/// Returns an error string if the repository cannot be listed, the overview
/// cannot be generated, or the output cannot be written.
pub fn run(
    repo: &Path,
    overview: bool,
    provider: Provider,
    output: Option<&Path>,
) -> Result<(), String> {
    let (ctx, settings) = super::service_context(overview.then_some(provider))?;
    let walker = RepositoryWalker::new(ctx.git.as_ref(), ctx.fs.as_ref());

    let structure = ProjectStructure::analyze(&walker, repo).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&structure)
        .map_err(|e| format!("Failed to serialize project structure: {e}"))?;

    match output {
        Some(path) => {
            ctx.fs.write(path, &json).map_err(|e| {
                format!("Failed to write project structure to {}: {e}", path.display())
            })?;
            eprintln!("Project structure written to {}", path.display());
        }
        None => println!("{json}"),
    }

    if overview {
        let describer =
            LlmDescriber::new(ctx.llm.as_ref(), settings).map_err(|e| e.to_string())?;
        let text = describer.describe_project(&structure).map_err(|e| e.to_string())?;
        println!("\nProject Overview:\n{text}");
    }
    Ok(())
}
