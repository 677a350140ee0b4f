//! Repository walker: tracked-file listing and tolerant text decoding.

use std::path::{Path, PathBuf};

use crate::error::WalkError;
use crate::ports::{FileSystem, GitRepo};

/// Lists and reads the files of one version-controlled tree.
pub struct RepositoryWalker<'a> {
    git: &'a dyn GitRepo,
    fs: &'a dyn FileSystem,
}

impl<'a> RepositoryWalker<'a> {
    /// Creates a walker over the given ports.
    #[must_use]
    pub fn new(git: &'a dyn GitRepo, fs: &'a dyn FileSystem) -> Self {
        Self { git, fs }
    }

    /// Tracked files as paths relative to `root`, `/`-separated.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::RepositoryAccess`] if `root` is not a repository
    /// or the listing fails.
    pub fn list_relative_files(&self, root: &Path) -> Result<Vec<String>, WalkError> {
        self.git.list_files(root).map_err(|e| WalkError::RepositoryAccess {
            root: root.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Tracked files as absolute paths.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::RepositoryAccess`] if `root` is not a repository
    /// or the listing fails.
    pub fn list_tracked_files(&self, root: &Path) -> Result<Vec<PathBuf>, WalkError> {
        let root = std::path::absolute(root).map_err(|e| WalkError::RepositoryAccess {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let files = self.list_relative_files(&root)?;
        tracing::debug!(root = %root.display(), count = files.len(), "listed tracked files");
        Ok(files.into_iter().map(|rel| root.join(rel)).collect())
    }

    /// Commit the tree is at, if it has one.
    #[must_use]
    pub fn current_commit(&self, root: &Path) -> Option<String> {
        self.git.current_commit(root).ok()
    }

    /// Reads a file as text.
    ///
    /// Bytes that are not valid UTF-8 are decoded as Latin-1, which maps
    /// every byte to a character and so never fails.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::FileRead`] if the file cannot be read.
    pub fn read_file(&self, path: &Path) -> Result<String, WalkError> {
        let bytes = self
            .fs
            .read(path)
            .map_err(|e| WalkError::FileRead { path: path.to_path_buf(), message: e.to_string() })?;
        Ok(decode_text(bytes, path))
    }
}

fn decode_text(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), "not valid UTF-8, decoding as Latin-1");
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    }
}
