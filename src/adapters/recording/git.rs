//! Recording adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::cassette::Port;
use crate::error::BoxError;
use crate::ports::GitRepo;

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: SharedRecorder,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: &SharedRecorder) -> Self {
        Self { inner, recorder: Arc::clone(recorder) }
    }
}

#[derive(Serialize)]
struct RootInput {
    root: String,
}

impl RootInput {
    fn new(root: &Path) -> Self {
        Self { root: root.display().to_string() }
    }
}

impl GitRepo for RecordingGitRepo {
    fn current_commit(&self, root: &Path) -> Result<String, BoxError> {
        let result = self.inner.current_commit(root);
        record_result(&self.recorder, Port::Git, "current_commit", &RootInput::new(root), &result);
        result
    }

    fn list_files(&self, root: &Path) -> Result<Vec<String>, BoxError> {
        let result = self.inner.list_files(root);
        record_result(&self.recorder, Port::Git, "list_files", &RootInput::new(root), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::cassette::{Cassette, CassetteRecorder};

    struct FixedRepo;

    impl GitRepo for FixedRepo {
        fn current_commit(&self, _root: &Path) -> Result<String, BoxError> {
            Err("does not have any commits yet".into())
        }

        fn list_files(&self, _root: &Path) -> Result<Vec<String>, BoxError> {
            Ok(vec!["src/app.py".into(), "README.md".into()])
        }
    }

    #[test]
    fn records_listing_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("git.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        {
            let git = RecordingGitRepo::new(Box::new(FixedRepo), &recorder);
            assert_eq!(git.list_files(Path::new("/repo")).unwrap().len(), 2);
            assert!(git.current_commit(Path::new("/repo")).is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&cassette_path).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].method, "list_files");
        assert_eq!(cassette.interactions[0].input["root"], "/repo");
        assert_eq!(cassette.interactions[1].output["err"], "does not have any commits yet");
    }
}
