//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the analysis core and an
//! external system (language model, git, filesystem). Implementations live
//! in `src/adapters/`.

pub mod filesystem;
pub mod git;
pub mod llm;

pub use filesystem::FileSystem;
pub use git::GitRepo;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
