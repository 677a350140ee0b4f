//! The describable unit handed to a description backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of a describable syntax unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A whole source file.
    Module,
    /// A class (or the grammar's closest equivalent).
    Class,
    /// A method or free function.
    Method,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Method => "method",
        })
    }
}

/// One unit of source code to be explained.
///
/// Built transiently while a file is analysed and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeElement {
    /// Identifier; unique only within its enclosing scope.
    pub name: String,
    /// What sort of unit this is.
    pub kind: ElementKind,
    /// Leading string literal in the unit's body.
    pub docstring: Option<String>,
    /// Exact source slice spanning the unit.
    pub source_text: String,
    /// Parameter names, receiver excluded. Empty for classes.
    pub parameters: Vec<String>,
}

impl CodeElement {
    /// Creates a class element.
    pub fn class(
        name: impl Into<String>,
        source_text: impl Into<String>,
        docstring: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Class,
            docstring,
            source_text: source_text.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a method or function element.
    pub fn method(
        name: impl Into<String>,
        source_text: impl Into<String>,
        docstring: Option<String>,
        parameters: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Method,
            docstring,
            source_text: source_text.into(),
            parameters,
        }
    }

    /// Derived key used to deduplicate backend calls.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            kind: self.kind,
            name: self.name.clone(),
            source_digest: digest(self.source_text.as_bytes()),
            docstring_digest: digest(self.docstring.as_deref().unwrap_or_default().as_bytes()),
            parameters_digest: digest(self.parameters.join("\0").as_bytes()),
        }
    }
}

/// Identity of a described unit: kind, name and content hashes.
///
/// Two elements with equal keys share one description. Hash collisions are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ElementKind,
    name: String,
    source_digest: String,
    docstring_digest: String,
    parameters_digest: String,
}

impl CacheKey {
    /// Key for a module description, derived from its docstring alone.
    #[must_use]
    pub fn module(docstring: &str) -> Self {
        Self {
            kind: ElementKind::Module,
            name: String::new(),
            source_digest: digest(docstring.as_bytes()),
            docstring_digest: digest(docstring.as_bytes()),
            parameters_digest: digest(&[]),
        }
    }
}

fn digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add() -> CodeElement {
        CodeElement::method(
            "add",
            "def add(self, a, b):\n    return a + b",
            Some("Adds two numbers.".into()),
            vec!["a".into(), "b".into()],
        )
    }

    #[test]
    fn identical_elements_share_a_key() {
        assert_eq!(add().cache_key(), add().cache_key());
    }

    #[test]
    fn any_field_change_changes_the_key() {
        let base = add().cache_key();

        let mut renamed = add();
        renamed.name = "plus".into();
        assert_ne!(renamed.cache_key(), base);

        let mut edited = add();
        edited.source_text.push('\n');
        assert_ne!(edited.cache_key(), base);

        let mut undocumented = add();
        undocumented.docstring = None;
        assert_ne!(undocumented.cache_key(), base);

        let mut fewer = add();
        fewer.parameters.pop();
        assert_ne!(fewer.cache_key(), base);
    }

    #[test]
    fn parameter_boundaries_are_part_of_the_key() {
        let mut joined = add();
        joined.parameters = vec!["ab".into()];
        let mut split = add();
        split.parameters = vec!["a".into(), "b".into()];
        assert_ne!(joined.cache_key(), split.cache_key());
    }

    #[test]
    fn kind_separates_class_and_method_keys() {
        let class = CodeElement::class("add", "def add(self, a, b):\n    return a + b", None);
        let mut method = add();
        method.docstring = None;
        method.parameters.clear();
        assert_ne!(class.cache_key(), method.cache_key());
    }

    #[test]
    fn module_key_tracks_docstring() {
        assert_eq!(CacheKey::module("Utility module."), CacheKey::module("Utility module."));
        assert_ne!(CacheKey::module("Utility module."), CacheKey::module("Other."));
    }
}
