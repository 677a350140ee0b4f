//! Extension-to-language resolution and per-language grammar profiles.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SyntaxError;

/// Languages recognised by file extension. Every one has a compiled grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python.
    Python,
    /// JavaScript.
    JavaScript,
    /// TypeScript.
    TypeScript,
    /// Java.
    Java,
    /// C++.
    Cpp,
    /// C.
    C,
    /// Ruby.
    Ruby,
    /// Go.
    Go,
    /// Rust.
    Rust,
    /// PHP.
    Php,
}

/// Every language, in the order they are listed to users.
pub const SUPPORTED: &[Language] = &[
    Language::Python,
    Language::JavaScript,
    Language::TypeScript,
    Language::Ruby,
    Language::Go,
    Language::Java,
    Language::Cpp,
    Language::C,
    Language::Rust,
    Language::Php,
];

impl Language {
    /// Maps a bare extension (without the dot, any case) to a language.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" => Some(Self::Python),
            "js" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            "cpp" => Some(Self::Cpp),
            "c" => Some(Self::C),
            "rb" => Some(Self::Ruby),
            "go" => Some(Self::Go),
            "rs" => Some(Self::Rust),
            "php" => Some(Self::Php),
            _ => None,
        }
    }

    /// Detects the language of a file path from its extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref().extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    /// Symbolic identifier used in logs, errors and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Php => "php",
        }
    }

    /// Tree-sitter grammar for this language.
    #[must_use]
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Self::C => tree_sitter_c::LANGUAGE.into(),
            Self::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        }
    }

    /// Node classification rules for this language's grammar.
    #[must_use]
    pub fn profile(self) -> &'static GrammarProfile {
        match self {
            Self::Python => &PYTHON,
            Self::JavaScript => &JAVASCRIPT,
            Self::TypeScript => &TYPESCRIPT,
            Self::Java => &JAVA,
            Self::Cpp => &CPP,
            Self::C => &C,
            Self::Ruby => &RUBY,
            Self::Go => &GO,
            Self::Rust => &RUST,
            Self::Php => &PHP,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = SyntaxError;

    /// Parses a symbolic identifier such as `"python"` or `"cpp"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        SUPPORTED.iter().copied().find(|lang| lang.as_str() == lowered).ok_or_else(|| {
            SyntaxError::UnsupportedLanguage {
                language: lowered,
                supported: SUPPORTED.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", "),
            }
        })
    }
}

/// Which syntax node kinds make up a describable unit in one grammar.
#[derive(Debug)]
pub struct GrammarProfile {
    /// Kinds treated as classes.
    pub class_kinds: &'static [&'static str],
    /// Field holding a class's name.
    pub class_name_field: &'static str,
    /// Skip class nodes without a body (forward declarations, type references).
    pub class_body_required: bool,
    /// Kinds treated as functions or methods.
    pub function_kinds: &'static [&'static str],
    /// Field holding a function's name, read from its signature node.
    pub function_name_field: &'static str,
    /// Declarator holding a function's name and parameters, reached through
    /// the given field: `(kind, field)`. `None` when the function node holds
    /// them itself.
    pub signature: Option<(&'static str, &'static str)>,
    /// Field holding the body of a class or function.
    pub body_field: &'static str,
    /// Field holding a function's parameter list.
    pub parameters_field: &'static str,
    /// Parameter-list children that are themselves the parameter name.
    pub plain_parameter_kinds: &'static [&'static str],
    /// Parameter-list children whose name sits in a field: `(kind, field)`.
    pub wrapped_parameters: &'static [(&'static str, &'static str)],
    /// Node kinds accepted as a wrapped parameter's name.
    pub parameter_name_kinds: &'static [&'static str],
    /// Implicit receiver excluded from method parameter lists.
    pub receiver: Option<&'static str>,
    /// Kind of a bare expression statement.
    pub expression_statement: &'static str,
    /// Kinds of string literals that can form a docstring. Empty when the
    /// language documents code with comments only.
    pub string_kinds: &'static [&'static str],
    /// Directive strings that are never docstrings.
    pub directives: &'static [&'static str],
    /// Transparent wrappers around definitions: `(kind, field)`.
    pub wrappers: &'static [(&'static str, &'static str)],
}

impl GrammarProfile {
    /// Returns `true` if `kind` is a class kind.
    #[must_use]
    pub fn is_class(&self, kind: &str) -> bool {
        self.class_kinds.contains(&kind)
    }

    /// Returns `true` if `kind` is a function or method kind.
    #[must_use]
    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.contains(&kind)
    }

    /// Field under which a wrapper of `kind` holds its definition.
    #[must_use]
    pub fn wrapper_field(&self, kind: &str) -> Option<&'static str> {
        self.wrappers.iter().find(|(wrapper, _)| *wrapper == kind).map(|(_, field)| *field)
    }
}

static PYTHON: GrammarProfile = GrammarProfile {
    class_kinds: &["class_definition"],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["function_definition"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &["identifier"],
    wrapped_parameters: &[],
    parameter_name_kinds: &["identifier"],
    receiver: Some("self"),
    expression_statement: "expression_statement",
    string_kinds: &["string"],
    directives: &[],
    wrappers: &[("decorated_definition", "definition")],
};

static JAVASCRIPT: GrammarProfile = GrammarProfile {
    class_kinds: &["class_declaration"],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["function_declaration", "generator_function_declaration", "method_definition"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &["identifier"],
    wrapped_parameters: &[],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &["string"],
    directives: &["use strict", "use asm"],
    wrappers: &[("export_statement", "declaration")],
};

static TYPESCRIPT: GrammarProfile = GrammarProfile {
    class_kinds: &["class_declaration", "abstract_class_declaration"],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["function_declaration", "generator_function_declaration", "method_definition"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &["identifier"],
    wrapped_parameters: &[("required_parameter", "pattern"), ("optional_parameter", "pattern")],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &["string"],
    directives: &["use strict", "use asm"],
    wrappers: &[("export_statement", "declaration")],
};

static JAVA: GrammarProfile = GrammarProfile {
    class_kinds: &["class_declaration", "interface_declaration", "enum_declaration"],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["method_declaration", "constructor_declaration"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &[],
    wrapped_parameters: &[("formal_parameter", "name")],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

// Functions keep their name and parameters in a nested function_declarator.
static C: GrammarProfile = GrammarProfile {
    class_kinds: &[],
    class_name_field: "name",
    class_body_required: true,
    function_kinds: &["function_definition"],
    function_name_field: "declarator",
    signature: Some(("function_declarator", "declarator")),
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &[],
    wrapped_parameters: &[("parameter_declaration", "declarator")],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

static CPP: GrammarProfile = GrammarProfile {
    class_kinds: &["class_specifier", "struct_specifier"],
    class_name_field: "name",
    class_body_required: true,
    function_kinds: &["function_definition"],
    function_name_field: "declarator",
    signature: Some(("function_declarator", "declarator")),
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &[],
    wrapped_parameters: &[("parameter_declaration", "declarator")],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

static RUBY: GrammarProfile = GrammarProfile {
    class_kinds: &["class", "module"],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["method", "singleton_method"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &["identifier"],
    wrapped_parameters: &[],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

static GO: GrammarProfile = GrammarProfile {
    class_kinds: &[],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["function_declaration", "method_declaration"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &[],
    wrapped_parameters: &[("parameter_declaration", "name")],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

// impl blocks stand in for classes; `self` is its own node kind and never collected.
static RUST: GrammarProfile = GrammarProfile {
    class_kinds: &["impl_item"],
    class_name_field: "type",
    class_body_required: false,
    function_kinds: &["function_item"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &[],
    wrapped_parameters: &[("parameter", "pattern")],
    parameter_name_kinds: &["identifier"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

// `$this` is implicit and never appears in a parameter list.
static PHP: GrammarProfile = GrammarProfile {
    class_kinds: &["class_declaration", "interface_declaration", "trait_declaration"],
    class_name_field: "name",
    class_body_required: false,
    function_kinds: &["function_definition", "method_declaration"],
    function_name_field: "name",
    signature: None,
    body_field: "body",
    parameters_field: "parameters",
    plain_parameter_kinds: &[],
    wrapped_parameters: &[("simple_parameter", "name")],
    parameter_name_kinds: &["variable_name"],
    receiver: None,
    expression_statement: "expression_statement",
    string_kinds: &[],
    directives: &[],
    wrappers: &[],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_extensions() {
        assert_eq!(Language::from_path("src/app.py"), Some(Language::Python));
        assert_eq!(Language::from_path("web/index.js"), Some(Language::JavaScript));
        assert_eq!(Language::from_path("lib.TS"), Some(Language::TypeScript));
        assert_eq!(Language::from_path("main.go"), Some(Language::Go));
        assert_eq!(Language::from_path("lib.rs"), Some(Language::Rust));
        assert_eq!(Language::from_path("Main.java"), Some(Language::Java));
        assert_eq!(Language::from_path("index.php"), Some(Language::Php));
    }

    #[test]
    fn unknown_or_missing_extension_resolves_to_none() {
        assert_eq!(Language::from_path("README.md"), None);
        assert_eq!(Language::from_path("Makefile"), None);
        assert_eq!(Language::from_path(""), None);
    }

    #[test]
    fn identifiers_parse_case_insensitively() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("Rust".parse::<Language>().unwrap(), Language::Rust);
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(matches!(err, SyntaxError::UnsupportedLanguage { .. }));
        assert!(err.to_string().contains("python, javascript, typescript, ruby"));
    }

    #[test]
    fn every_language_has_a_loadable_grammar() {
        for lang in SUPPORTED {
            let mut parser = tree_sitter::Parser::new();
            assert!(parser.set_language(&lang.grammar()).is_ok(), "{lang} grammar should load");
        }
        assert_eq!(SUPPORTED.len(), 10);
    }

    #[test]
    fn wrapper_fields_are_looked_up_by_kind() {
        let python = Language::Python.profile();
        assert_eq!(python.wrapper_field("decorated_definition"), Some("definition"));
        assert_eq!(python.wrapper_field("export_statement"), None);
        assert_eq!(
            Language::TypeScript.profile().wrapper_field("export_statement"),
            Some("declaration")
        );
    }
}
