//! Git repository port for version-control queries.

use std::path::Path;

use crate::error::BoxError;

/// Provides read access to a git repository.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Returns the hash of the current HEAD commit of the repository at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has no commits or is invalid.
    fn current_commit(&self, root: &Path) -> Result<String, BoxError>;

    /// Lists all tracked files, as paths relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a repository or the listing fails.
    fn list_files(&self, root: &Path) -> Result<Vec<String>, BoxError>;
}
