//! Repository-wide analysis loop.

use std::collections::BTreeMap;
use std::path::Path;

use super::extractor::Extractor;
use super::report::FileReport;
use crate::error::WalkError;
use crate::walker::RepositoryWalker;

/// Repository-relative path (`/`-separated) to that file's report.
pub type AnalysisResults = BTreeMap<String, FileReport>;

/// Runs the [`Extractor`] over every tracked file, one file at a time.
pub struct RepositoryAnalyzer<'a> {
    walker: RepositoryWalker<'a>,
    extractor: Extractor<'a>,
}

impl<'a> RepositoryAnalyzer<'a> {
    /// Creates an analyzer reading through `walker`.
    #[must_use]
    pub fn new(walker: RepositoryWalker<'a>, extractor: Extractor<'a>) -> Self {
        Self { walker, extractor }
    }

    /// Analyses every tracked file under `root`.
    ///
    /// Files with no recognised language are left out silently. Files that
    /// fail are logged and left out; the run continues.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::RepositoryAccess`] if the tracked files cannot be
    /// listed. No file is read in that case.
    pub fn analyze(&mut self, root: &Path) -> Result<AnalysisResults, WalkError> {
        let files = self.walker.list_tracked_files(root)?;
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

        let mut results = AnalysisResults::new();
        let mut failed = 0usize;
        for path in &files {
            match self.extractor.analyze_file(&self.walker, path) {
                Ok(Some(report)) => {
                    results.insert(relative_key(&root, path), report);
                }
                Ok(None) => {}
                Err(_) => failed += 1,
            }
        }

        let (hits, misses) = self.extractor.descriptions().stats();
        tracing::info!(
            analysed = results.len(),
            failed,
            tracked = files.len(),
            cache_hits = hits,
            cache_misses = misses,
            "repository analysis finished"
        );
        Ok(results)
    }
}

fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
