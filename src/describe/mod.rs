//! Description backends: turning code elements into prose.
//!
//! The pipeline only ever sees [`DescriptionBackend`]. The LLM-backed
//! implementation lives in [`llm`]; [`cache`] adds the memoization layer.

pub mod cache;
pub mod llm;
pub mod prompt;

use crate::element::CodeElement;
use crate::error::DescriptionError;

pub use cache::{DescriptionCache, MODULE_LABEL};
pub use llm::{LlmDescriber, RequestSettings};

/// Produces natural-language descriptions of code.
///
/// Implementations are interchangeable; the provider is chosen once, when
/// the backend is built.
pub trait DescriptionBackend {
    /// Describes a class or method element.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Unavailable`] on any backend failure.
    fn describe_code(&self, element: &CodeElement) -> Result<String, DescriptionError>;

    /// Describes a module given its docstring.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Unavailable`] on any backend failure.
    fn describe_module(&self, docstring: &str) -> Result<String, DescriptionError>;
}
