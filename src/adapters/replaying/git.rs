//! Replaying adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::Arc;

use super::{next_interaction, SharedReplayer};
use crate::cassette::replayer::decode_output;
use crate::cassette::Port;
use crate::error::BoxError;
use crate::ports::GitRepo;

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: SharedReplayer,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a shared replayer.
    #[must_use]
    pub fn new(replayer: &SharedReplayer) -> Self {
        Self { replayer: Arc::clone(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn current_commit(&self, _root: &Path) -> Result<String, BoxError> {
        let interaction = next_interaction(&self.replayer, Port::Git, "current_commit");
        decode_output(&interaction.output, "git::current_commit")
    }

    fn list_files(&self, _root: &Path) -> Result<Vec<String>, BoxError> {
        let interaction = next_interaction(&self.replayer, Port::Git, "list_files");
        decode_output(&interaction.output, "git::list_files")
    }
}
