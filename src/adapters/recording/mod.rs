//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter delegates to a live implementation and appends the call and
//! its outcome to a shared [`CassetteRecorder`].

pub mod git;
pub mod llm;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::{CassetteRecorder, Port};

pub use git::RecordingGitRepo;
pub use llm::RecordingLlmClient;

/// Recorder shared between every adapter of one session.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Appends a `Result` to the shared cassette.
pub(crate) fn record_result<I, T, E>(
    recorder: &SharedRecorder,
    port: Port,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    recorder
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .record_result(port, method, input, result);
}
