//! Live git adapter using `git` CLI commands.

use std::path::Path;
use std::process::Command;

use crate::error::BoxError;
use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo;

fn run_git(root: &Path, args: &[&str]) -> Result<String, BoxError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| -> BoxError { format!("failed to run git {}: {e}", args.join(" ")).into() })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl GitRepo for LiveGitRepo {
    fn current_commit(&self, root: &Path) -> Result<String, BoxError> {
        Ok(run_git(root, &["rev-parse", "HEAD"])?.trim().to_string())
    }

    fn list_files(&self, root: &Path) -> Result<Vec<String>, BoxError> {
        // -z keeps non-ASCII paths unquoted.
        let stdout = run_git(root, &["ls-files", "-z"])?;
        Ok(stdout.split('\0').filter(|path| !path.is_empty()).map(String::from).collect())
    }
}
