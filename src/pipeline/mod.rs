//! Element extraction and description pipeline.
//!
//! [`Extractor`] turns one file into a [`FileReport`]; [`RepositoryAnalyzer`]
//! runs it over every tracked file of a repository.

pub mod analyzer;
pub mod extractor;
pub mod report;

pub use analyzer::{AnalysisResults, RepositoryAnalyzer};
pub use extractor::{Extractor, Stage};
pub use report::{ClassBlock, FileReport, MethodBlock};
