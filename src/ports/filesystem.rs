//! Filesystem port for file I/O operations.

use std::path::Path;

use crate::error::BoxError;

/// Provides filesystem access for reading and writing files.
///
/// Reads return raw bytes; text decoding (and its fallback) belongs to the
/// repository walker.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, BoxError>;

    /// Writes the given contents to a file, creating parents and overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), BoxError>;
}
