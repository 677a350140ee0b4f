//! Error taxonomy shared by the parsing, walking and description layers.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error type returned by port traits.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the syntax tree accessor.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The language identifier is not in the supported set.
    #[error("unsupported language: {language} (supported: {supported})")]
    UnsupportedLanguage {
        /// The identifier that was requested.
        language: String,
        /// Comma-separated list of supported identifiers.
        supported: String,
    },

    /// The grammar for a supported language could not be initialised.
    #[error("failed to load {language} grammar: {message}")]
    GrammarLoad {
        /// The language whose grammar failed.
        language: String,
        /// Underlying failure reported by tree-sitter.
        message: String,
    },

    /// The parser produced no tree (cancelled or timed out).
    #[error("failed to parse {language} source")]
    ParseFailed {
        /// The language being parsed.
        language: String,
    },
}

/// Errors raised by the repository walker.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root is not a repository or the listing command failed.
    #[error("error accessing git repository at {}: {message}", root.display())]
    RepositoryAccess {
        /// Repository root that was listed.
        root: PathBuf,
        /// Cause reported by the git port.
        message: String,
    },

    /// A single file could not be read.
    #[error("error reading file {}: {message}", path.display())]
    FileRead {
        /// File that failed.
        path: PathBuf,
        /// Cause reported by the filesystem port.
        message: String,
    },
}

/// Raised by a description backend on any failure (network, auth, quota, bad response).
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// The backend could not produce a description.
    #[error("description unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while building a description backend from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The provider name is not recognised.
    #[error("unsupported LLM provider: {0} (expected anthropic, openai or ollama)")]
    UnknownProvider(String),

    /// A credential the provider requires is absent from the environment.
    #[error("{provider} requires the {variable} environment variable")]
    MissingCredential {
        /// Provider being configured.
        provider: &'static str,
        /// Environment variable that was not set.
        variable: &'static str,
    },

    /// The blocking runtime used to drive HTTP clients could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// File-level failure inside the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Parsing failed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Reading failed.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A node the grammar guarantees was missing from the tree.
    #[error("malformed {kind} node at byte {offset}: missing `{field}` field")]
    MissingField {
        /// Node kind that was inspected.
        kind: String,
        /// Field that was expected.
        field: &'static str,
        /// Start byte of the node.
        offset: usize,
    },
}
