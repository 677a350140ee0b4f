//! Per-file extraction: syntax tree to described report.
//!
//! A file moves through [`Stage`]s in order. Any failure stops it where it
//! is; the caller logs the failure and moves on to the next file.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lru::LruCache;
use tree_sitter::Node;

use super::report::{ClassBlock, FileReport, MethodBlock};
use crate::describe::{DescriptionBackend, DescriptionCache};
use crate::element::CodeElement;
use crate::error::AnalysisError;
use crate::language::Language;
use crate::syntax::SyntaxTree;
use crate::walker::RepositoryWalker;

/// How far a file got through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    NotStarted,
    /// Source read and parsed.
    Parsed,
    /// Describable units located.
    Extracted,
    /// Every unit described.
    Described,
    /// Report assembled.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not-started",
            Self::Parsed => "parsed",
            Self::Extracted => "extracted",
            Self::Described => "described",
            Self::Done => "done",
        })
    }
}

/// Builds [`FileReport`]s, memoizing both parses and descriptions.
pub struct Extractor<'b> {
    backend: &'b dyn DescriptionBackend,
    descriptions: DescriptionCache,
    trees: LruCache<(PathBuf, Language), Rc<SyntaxTree>>,
}

impl<'b> Extractor<'b> {
    /// Extractor with unbounded caches.
    #[must_use]
    pub fn new(backend: &'b dyn DescriptionBackend) -> Self {
        Self::with_capacity(backend, None)
    }

    /// Extractor whose caches hold at most `capacity` entries each.
    #[must_use]
    pub fn with_capacity(backend: &'b dyn DescriptionBackend, capacity: Option<usize>) -> Self {
        let trees = match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self { backend, descriptions: DescriptionCache::with_capacity(capacity), trees }
    }

    /// The description cache, for inspection.
    #[must_use]
    pub fn descriptions(&self) -> &DescriptionCache {
        &self.descriptions
    }

    /// Analyses the file at `path`.
    ///
    /// Returns `Ok(None)` when the extension maps to no language.
    ///
    /// # Errors
    ///
    /// Returns the first read, parse or structure failure. The failure is
    /// logged together with the stage the file had reached.
    pub fn analyze_file(
        &mut self,
        walker: &RepositoryWalker<'_>,
        path: &Path,
    ) -> Result<Option<FileReport>, AnalysisError> {
        let Some(language) = Language::from_path(path) else {
            tracing::trace!(path = %path.display(), "no language for extension, skipping");
            return Ok(None);
        };

        let mut stage = Stage::NotStarted;
        let result = self.run(walker, path, language, &mut stage);
        match &result {
            Ok(_) => tracing::info!(path = %path.display(), %language, "file analysed"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                %stage,
                error = %e,
                "file analysis failed, skipping"
            ),
        }
        result.map(Some)
    }

    /// Analyses source text directly, without a repository.
    ///
    /// # Errors
    ///
    /// Returns parse and structure failures.
    pub fn analyze_source(
        &mut self,
        source: &str,
        language: Language,
    ) -> Result<FileReport, AnalysisError> {
        let tree = SyntaxTree::parse(source, language)?;
        self.build_report(&tree, &mut Stage::Parsed)
    }

    fn run(
        &mut self,
        walker: &RepositoryWalker<'_>,
        path: &Path,
        language: Language,
        stage: &mut Stage,
    ) -> Result<FileReport, AnalysisError> {
        let tree = self.tree_for(walker, path, language)?;
        *stage = Stage::Parsed;
        self.build_report(&tree, stage)
    }

    fn tree_for(
        &mut self,
        walker: &RepositoryWalker<'_>,
        path: &Path,
        language: Language,
    ) -> Result<Rc<SyntaxTree>, AnalysisError> {
        let key = (path.to_path_buf(), language);
        if let Some(tree) = self.trees.get(&key) {
            tracing::debug!(path = %path.display(), "reusing parsed tree");
            return Ok(Rc::clone(tree));
        }
        let source = walker.read_file(path)?;
        let tree = Rc::new(SyntaxTree::parse(source, language)?);
        self.trees.put(key, Rc::clone(&tree));
        Ok(tree)
    }

    fn build_report(
        &mut self,
        tree: &SyntaxTree,
        stage: &mut Stage,
    ) -> Result<FileReport, AnalysisError> {
        let module_doc = tree.module_docstring();
        let classes = tree.classes();
        let functions = tree.top_level_functions();
        *stage = Stage::Extracted;

        let module = module_doc.map(|doc| self.descriptions.describe_module(self.backend, &doc));
        let classes = classes
            .into_iter()
            .map(|node| self.extract_class(tree, node))
            .collect::<Result<Vec<_>, _>>()?;
        let functions = functions
            .into_iter()
            .map(|node| self.extract_method(tree, node))
            .collect::<Result<Vec<_>, _>>()?;
        *stage = Stage::Described;

        let report = FileReport { language: tree.language(), module, classes, functions };
        *stage = Stage::Done;
        Ok(report)
    }

    /// Describes a class and every method declared directly in its body.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingField`] if the class or one of its
    /// methods has no name.
    pub fn extract_class(
        &mut self,
        tree: &SyntaxTree,
        node: Node<'_>,
    ) -> Result<ClassBlock, AnalysisError> {
        let field = tree.profile().class_name_field;
        let name = tree.field_text(node, field).ok_or_else(|| missing_field(node, field))?;
        let element = CodeElement::class(name, tree.node_text(node), tree.docstring_of(node));
        let description = self.descriptions.describe_element(self.backend, &element);

        let methods = tree
            .methods_of(node)
            .into_iter()
            .map(|method| self.extract_method(tree, method))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClassBlock { name: element.name, description, methods })
    }

    /// Describes one method or function.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingField`] if the function has no name.
    pub fn extract_method(
        &mut self,
        tree: &SyntaxTree,
        node: Node<'_>,
    ) -> Result<MethodBlock, AnalysisError> {
        let name = tree
            .function_name(node)
            .ok_or_else(|| missing_field(node, tree.profile().function_name_field))?;
        let element = CodeElement::method(
            name,
            tree.node_text(node),
            tree.docstring_of(node),
            tree.parameters_of(node),
        );
        let description = self.descriptions.describe_element(self.backend, &element);
        Ok(MethodBlock { name: element.name, description, parameters: element.parameters })
    }
}

fn missing_field(node: Node<'_>, field: &'static str) -> AnalysisError {
    AnalysisError::MissingField { kind: node.kind().to_string(), field, offset: node.start_byte() }
}
