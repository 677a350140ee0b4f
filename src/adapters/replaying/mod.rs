//! Replaying adapters that serve recorded interactions.

pub mod git;
pub mod llm;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::{CassetteReplayer, Interaction, Port};

pub use git::ReplayingGitRepo;
pub use llm::ReplayingLlmClient;

/// Replayer shared between every adapter of one session.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Takes the next recorded interaction for `port::method`.
pub(crate) fn next_interaction(replayer: &SharedReplayer, port: Port, method: &str) -> Interaction {
    replayer.lock().unwrap_or_else(PoisonError::into_inner).next_interaction(port, method).clone()
}
