//! Syntax tree accessor over a tree-sitter parse of one source file.
//!
//! Docstring and parameter extraction look only at *direct* children of the
//! relevant node. Nested string literals and the parameter lists of nested
//! functions must never leak into the enclosing unit.

use tree_sitter::{Node, Parser, Tree};

use crate::error::SyntaxError;
use crate::language::{GrammarProfile, Language};

/// A parsed source file together with the text it was parsed from.
pub struct SyntaxTree {
    language: Language,
    profile: &'static GrammarProfile,
    source: String,
    tree: Tree,
}

impl SyntaxTree {
    /// Parses `source` with the grammar for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::GrammarLoad`] when the grammar is rejected by
    /// the parser and [`SyntaxError::ParseFailed`] when no tree is produced.
    pub fn parse(source: impl Into<String>, language: Language) -> Result<Self, SyntaxError> {
        let grammar = language.grammar();
        let profile = language.profile();

        let mut parser = Parser::new();
        parser.set_language(&grammar).map_err(|e| SyntaxError::GrammarLoad {
            language: language.to_string(),
            message: e.to_string(),
        })?;

        let source = source.into();
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| SyntaxError::ParseFailed { language: language.to_string() })?;

        Ok(Self { language, profile, source, tree })
    }

    /// Parses `source` under a symbolic language identifier such as `"python"`.
    ///
    /// # Errors
    ///
    /// Same as [`SyntaxTree::parse`]; unknown identifiers yield
    /// [`SyntaxError::UnsupportedLanguage`].
    pub fn parse_named(source: impl Into<String>, language_id: &str) -> Result<Self, SyntaxError> {
        Self::parse(source, language_id.parse()?)
    }

    /// Language this tree was parsed as.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Classification rules for this tree's grammar.
    #[must_use]
    pub fn profile(&self) -> &'static GrammarProfile {
        self.profile
    }

    /// The full source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node of the tree.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Exact source slice `[start_byte, end_byte)` spanned by `node`.
    #[must_use]
    pub fn node_text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    /// Text of the child in `field`, if present.
    #[must_use]
    pub fn field_text(&self, node: Node<'_>, field: &str) -> Option<&str> {
        node.child_by_field_name(field).map(|child| self.node_text(child))
    }

    /// Every node whose kind equals `kind`, in pre-order.
    #[must_use]
    pub fn find_nodes_by_type(&self, kind: &str) -> Vec<Node<'_>> {
        self.find_nodes_by_kinds(&[kind])
    }

    /// Every node whose kind is one of `kinds`, in pre-order.
    ///
    /// Parents come before their descendants and siblings keep source order.
    /// The walk is iterative so deeply nested sources cannot exhaust the stack.
    #[must_use]
    pub fn find_nodes_by_kinds(&self, kinds: &[&str]) -> Vec<Node<'_>> {
        let mut nodes = Vec::new();
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if kinds.contains(&node.kind()) {
                nodes.push(node);
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return nodes;
                }
            }
        }
    }

    /// Docstring of a class or function: the first bare string-literal
    /// statement among the direct children of its body. Directives such as
    /// `"use strict"` are passed over.
    #[must_use]
    pub fn docstring_of(&self, node: Node<'_>) -> Option<String> {
        let body = node.child_by_field_name(self.profile.body_field).unwrap_or(node);
        self.first_docstring_in(body)
    }

    /// Docstring of the whole file, taken from the direct children of the root.
    #[must_use]
    pub fn module_docstring(&self) -> Option<String> {
        self.first_docstring_in(self.root())
    }

    fn first_docstring_in(&self, body: Node<'_>) -> Option<String> {
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() != self.profile.expression_statement {
                continue;
            }
            let mut inner = child.walk();
            let mut named = child.named_children(&mut inner);
            let (Some(expr), None) = (named.next(), named.next()) else {
                continue;
            };
            if !self.profile.string_kinds.contains(&expr.kind()) {
                continue;
            }
            let text = strip_string_delimiters(self.node_text(expr));
            if self.profile.directives.contains(&text) {
                continue;
            }
            return Some(text.to_string());
        }
        None
    }

    /// Plain positional parameter names of a function, in order.
    ///
    /// Only direct children of the parameter list are read. For a method
    /// nested directly in a class body the implicit receiver is dropped;
    /// top-level functions keep every name.
    #[must_use]
    pub fn parameters_of(&self, function: Node<'_>) -> Vec<String> {
        let Some(list) =
            self.signature_of(function).child_by_field_name(self.profile.parameters_field)
        else {
            return Vec::new();
        };

        let mut names = Vec::new();
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            if self.profile.plain_parameter_kinds.contains(&child.kind()) {
                names.push(self.node_text(child).to_string());
                continue;
            }
            let Some((_, field)) =
                self.profile.wrapped_parameters.iter().find(|(kind, _)| *kind == child.kind())
            else {
                continue;
            };
            let mut inner = child.walk();
            for name in child.children_by_field_name(field, &mut inner) {
                if self.profile.parameter_name_kinds.contains(&name.kind()) {
                    names.push(self.node_text(name).to_string());
                }
            }
        }

        if let Some(receiver) = self.profile.receiver {
            if self.is_method(function) && names.first().is_some_and(|first| first == receiver) {
                names.remove(0);
            }
        }
        names
    }

    /// Name of a function, read from its signature.
    #[must_use]
    pub fn function_name(&self, function: Node<'_>) -> Option<&str> {
        self.field_text(self.signature_of(function), self.profile.function_name_field)
    }

    /// Node holding a function's name and parameter list.
    ///
    /// For grammars that nest these in a declarator, the declarator chain is
    /// followed (through pointer and reference declarators) until the
    /// signature kind is reached. Falls back to the function itself.
    #[must_use]
    pub fn signature_of<'t>(&self, function: Node<'t>) -> Node<'t> {
        let Some((kind, field)) = self.profile.signature else {
            return function;
        };
        let mut current = function;
        loop {
            let next = current.child_by_field_name(field).or_else(|| {
                current
                    .named_children(&mut current.walk())
                    .find(|c| c.kind().ends_with("declarator"))
            });
            match next {
                Some(node) if node.kind() == kind => return node,
                Some(node) => current = node,
                None => return function,
            }
        }
    }

    /// All class nodes in traversal order.
    ///
    /// Grammars that reuse class kinds for type references only count the
    /// nodes that carry a body.
    #[must_use]
    pub fn classes(&self) -> Vec<Node<'_>> {
        let mut classes = self.find_nodes_by_kinds(self.profile.class_kinds);
        if self.profile.class_body_required {
            classes.retain(|class| class.child_by_field_name(self.profile.body_field).is_some());
        }
        classes
    }

    /// Functions whose enclosing scope is the file itself, in traversal order.
    ///
    /// Methods and functions nested inside other functions are excluded.
    #[must_use]
    pub fn top_level_functions(&self) -> Vec<Node<'_>> {
        let root = self.root();
        self.find_nodes_by_kinds(self.profile.function_kinds)
            .into_iter()
            .filter(|node| self.definition_parent(*node) == Some(root))
            .collect()
    }

    /// Functions declared directly in a class body, in source order.
    #[must_use]
    pub fn methods_of<'t>(&self, class: Node<'t>) -> Vec<Node<'t>> {
        let body = class.child_by_field_name(self.profile.body_field).unwrap_or(class);
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if self.profile.is_function(child.kind()) {
                methods.push(child);
            } else if let Some(inner) = self.unwrap_definition(child) {
                methods.push(inner);
            }
        }
        methods
    }

    /// Returns `true` if `function` sits directly in the body of a class.
    #[must_use]
    pub fn is_method(&self, function: Node<'_>) -> bool {
        self.definition_parent(function)
            .and_then(|body| body.parent())
            .is_some_and(|owner| self.profile.is_class(owner.kind()))
    }

    /// Parent of a definition, looking through decorator and export wrappers.
    fn definition_parent<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut parent = node.parent()?;
        while self.profile.wrapper_field(parent.kind()).is_some() {
            parent = parent.parent()?;
        }
        Some(parent)
    }

    fn unwrap_definition<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut current = node;
        while let Some(field) = self.profile.wrapper_field(current.kind()) {
            current = current.child_by_field_name(field)?;
        }
        (current != node && self.profile.is_function(current.kind())).then_some(current)
    }
}

/// Strips one layer of string delimiters (and any literal prefix like `r` or `b`).
fn strip_string_delimiters(literal: &str) -> &str {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner;
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#""""Utility module."""

def helper(x, y):
    """Top-level helper."""
    def inner(z):
        return z
    return x + y

class Calculator:
    def add(self, a, b):
        """Adds two numbers."""
        return a + b

    @staticmethod
    def zero():
        return 0

class Empty:
    pass
"#;

    fn python(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, Language::Python).expect("python parses")
    }

    fn parse(source: &str, language: Language) -> SyntaxTree {
        SyntaxTree::parse(source, language).expect("source parses")
    }

    fn names(tree: &SyntaxTree, functions: &[Node<'_>]) -> Vec<String> {
        functions.iter().filter_map(|f| tree.function_name(*f)).map(str::to_string).collect()
    }

    #[test]
    fn parse_named_rejects_unknown_identifiers() {
        let err = SyntaxTree::parse_named("x", "klingon").err().expect("unknown id");
        assert!(matches!(err, SyntaxError::UnsupportedLanguage { .. }));
        assert!(SyntaxTree::parse_named("class A {}", "java").is_ok());
    }

    #[test]
    fn node_text_reproduces_exact_bytes() {
        let tree = python(SAMPLE);
        let class = tree.classes()[0];
        let text = tree.node_text(class);
        assert!(text.starts_with("class Calculator:"));
        assert_eq!(text, &SAMPLE[class.start_byte()..class.end_byte()]);
    }

    #[test]
    fn find_nodes_is_preorder_and_complete() {
        let tree = python(SAMPLE);
        let functions = tree.find_nodes_by_type("function_definition");
        let names: Vec<_> =
            functions.iter().map(|f| tree.field_text(*f, "name").unwrap_or_default()).collect();
        assert_eq!(names, ["helper", "inner", "add", "zero"]);

        // A parent strictly precedes its descendants.
        let helper = functions[0];
        let inner = functions[1];
        assert!(helper.start_byte() <= inner.start_byte());
        assert!(helper.end_byte() >= inner.end_byte());
    }

    #[test]
    fn module_docstring_strips_one_layer_of_quotes() {
        let tree = python(SAMPLE);
        assert_eq!(tree.module_docstring().as_deref(), Some("Utility module."));
        let single = python("'single'\n");
        assert_eq!(single.module_docstring().as_deref(), Some("single"));
    }

    #[test]
    fn module_docstring_absent_without_string_statement() {
        let tree = python("import os\nx = 'not a docstring'\n");
        assert_eq!(tree.module_docstring(), None);
    }

    #[test]
    fn docstring_looks_only_at_direct_body_children() {
        let tree = python(SAMPLE);
        let calculator = tree.classes()[0];
        // The only string statement lives inside a method, not the class body.
        assert_eq!(tree.docstring_of(calculator), None);

        let add = tree.methods_of(calculator)[0];
        assert_eq!(tree.docstring_of(add).as_deref(), Some("Adds two numbers."));
    }

    #[test]
    fn method_parameters_drop_receiver() {
        let tree = python(SAMPLE);
        let calculator = tree.classes()[0];
        let add = tree.methods_of(calculator)[0];
        assert_eq!(tree.parameters_of(add), ["a", "b"]);
    }

    #[test]
    fn top_level_function_keeps_every_parameter() {
        let tree = python("def f(self, other):\n    pass\n");
        let f = tree.top_level_functions()[0];
        assert_eq!(tree.parameters_of(f), ["self", "other"]);
    }

    #[test]
    fn parameters_ignore_nested_function_lists() {
        let tree = python(SAMPLE);
        let helper = tree.top_level_functions()[0];
        assert_eq!(tree.parameters_of(helper), ["x", "y"]);
    }

    #[test]
    fn top_level_functions_exclude_methods_and_nested() {
        let tree = python(SAMPLE);
        let names: Vec<_> = tree
            .top_level_functions()
            .iter()
            .map(|f| tree.field_text(*f, "name").unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, ["helper"]);
    }

    #[test]
    fn methods_include_decorated_definitions() {
        let tree = python(SAMPLE);
        let calculator = tree.classes()[0];
        let names: Vec<_> = tree
            .methods_of(calculator)
            .iter()
            .map(|m| tree.field_text(*m, "name").unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, ["add", "zero"]);
        assert!(tree.methods_of(tree.classes()[1]).is_empty());
    }

    #[test]
    fn class_text_reparses_as_same_class() {
        let tree = python(SAMPLE);
        let original = tree.classes()[0];
        let fragment = python(tree.node_text(original));
        let reparsed = fragment.classes();
        assert_eq!(reparsed.len(), 1);
        assert_eq!(fragment.field_text(reparsed[0], "name"), Some("Calculator"));
    }

    #[test]
    fn javascript_classes_and_methods() {
        let source = "class Greeter {\n  greet(name, punctuation) { return name; }\n}\nfunction main(argv) {}\n";
        let tree = SyntaxTree::parse(source, Language::JavaScript).unwrap();
        let class = tree.classes()[0];
        assert_eq!(tree.field_text(class, "name"), Some("Greeter"));
        let greet = tree.methods_of(class)[0];
        assert_eq!(tree.parameters_of(greet), ["name", "punctuation"]);
        let main = tree.top_level_functions();
        assert_eq!(main.len(), 1);
        assert_eq!(tree.parameters_of(main[0]), ["argv"]);
    }

    #[test]
    fn rust_impl_blocks_act_as_classes() {
        let source = "struct Point;\nimpl Point {\n    fn shift(&self, dx: i32, dy: i32) {}\n}\nfn free(a: u8) {}\n";
        let tree = SyntaxTree::parse(source, Language::Rust).unwrap();
        let imp = tree.classes()[0];
        assert_eq!(tree.field_text(imp, "type"), Some("Point"));
        let shift = tree.methods_of(imp)[0];
        assert_eq!(tree.parameters_of(shift), ["dx", "dy"]);
        assert_eq!(tree.top_level_functions().len(), 1);
    }

    #[test]
    fn strip_delimiters_handles_prefixes_and_triples() {
        assert_eq!(strip_string_delimiters(r#""""doc""""#), "doc");
        assert_eq!(strip_string_delimiters("'''doc'''"), "doc");
        assert_eq!(strip_string_delimiters(r#"r"raw""#), "raw");
        assert_eq!(strip_string_delimiters(r#""""#), "");
    }

    #[test]
    fn exported_functions_are_top_level() {
        let source = "export function exported(a: number, b?: string) { return a; }\nfunction plain(c) {}\nexport class Svc { run(x) {} }\n";
        let tree = parse(source, Language::TypeScript);
        let functions = tree.top_level_functions();
        assert_eq!(names(&tree, &functions), ["exported", "plain"]);
        assert_eq!(tree.parameters_of(functions[0]), ["a", "b"]);

        let svc = tree.classes()[0];
        assert_eq!(tree.field_text(svc, "name"), Some("Svc"));
        assert_eq!(names(&tree, &tree.methods_of(svc)), ["run"]);
        assert!(tree.is_method(tree.methods_of(svc)[0]));
    }

    #[test]
    fn use_strict_directive_is_not_a_docstring() {
        let tree = parse("\"use strict\";\nexport function go(a) {}\n", Language::JavaScript);
        assert_eq!(tree.module_docstring(), None);

        let tree = parse("'use strict';\n'Request helpers.';\n", Language::JavaScript);
        assert_eq!(tree.module_docstring().as_deref(), Some("Request helpers."));
    }

    #[test]
    fn go_grouped_parameters_are_all_listed() {
        let source = "package main\n\nfunc f(a, b int) {}\n\nfunc (s *Server) Serve(addr string) {}\n";
        let tree = parse(source, Language::Go);
        let functions = tree.top_level_functions();
        assert_eq!(names(&tree, &functions), ["f", "Serve"]);
        assert_eq!(tree.parameters_of(functions[0]), ["a", "b"]);
        assert_eq!(tree.parameters_of(functions[1]), ["addr"]);
    }

    #[test]
    fn java_methods_and_constructors() {
        let tree = parse("class A { void m(int a, String b) {} A(long seed) {} }", Language::Java);
        let class = tree.classes()[0];
        assert_eq!(tree.field_text(class, "name"), Some("A"));
        let methods = tree.methods_of(class);
        assert_eq!(names(&tree, &methods), ["m", "A"]);
        assert_eq!(tree.parameters_of(methods[0]), ["a", "b"]);
        assert!(tree.top_level_functions().is_empty());
    }

    #[test]
    fn c_functions_read_names_through_declarators() {
        let source = "int add(int a, int b) { return a + b; }\nstatic char *label(void) { return 0; }\n";
        let tree = parse(source, Language::C);
        let functions = tree.top_level_functions();
        assert_eq!(names(&tree, &functions), ["add", "label"]);
        assert_eq!(tree.parameters_of(functions[0]), ["a", "b"]);
        assert!(tree.parameters_of(functions[1]).is_empty());
        assert!(tree.classes().is_empty());
    }

    #[test]
    fn cpp_classes_skip_bodiless_references() {
        let source = "struct Point;\nclass Shape {\npublic:\n  double area(double scale) { return scale; }\n};\nint main(int argc, char **argv) { return 0; }\n";
        let tree = parse(source, Language::Cpp);
        let classes = tree.classes();
        assert_eq!(classes.len(), 1);
        assert_eq!(tree.field_text(classes[0], "name"), Some("Shape"));
        let area = tree.methods_of(classes[0]);
        assert_eq!(names(&tree, &area), ["area"]);
        assert_eq!(tree.parameters_of(area[0]), ["scale"]);

        let functions = tree.top_level_functions();
        assert_eq!(names(&tree, &functions), ["main"]);
        assert_eq!(tree.parameters_of(functions[0]), ["argc"]);
    }

    #[test]
    fn ruby_classes_and_methods() {
        let source = "class Greeter\n  def greet(name, punctuation)\n    name\n  end\nend\n\ndef helper(x)\nend\n";
        let tree = parse(source, Language::Ruby);
        let class = tree.classes()[0];
        assert_eq!(tree.field_text(class, "name"), Some("Greeter"));
        let greet = tree.methods_of(class);
        assert_eq!(names(&tree, &greet), ["greet"]);
        assert_eq!(tree.parameters_of(greet[0]), ["name", "punctuation"]);
        assert_eq!(names(&tree, &tree.top_level_functions()), ["helper"]);
    }

    #[test]
    fn php_parameters_keep_their_sigil() {
        let source = "<?php\nclass Cart {\n    public function add($item, $qty) { return $this; }\n}\nfunction total($cart) { return 0; }\n";
        let tree = parse(source, Language::Php);
        let class = tree.classes()[0];
        assert_eq!(tree.field_text(class, "name"), Some("Cart"));
        let add = tree.methods_of(class);
        assert_eq!(names(&tree, &add), ["add"]);
        assert_eq!(tree.parameters_of(add[0]), ["$item", "$qty"]);
        let functions = tree.top_level_functions();
        assert_eq!(names(&tree, &functions), ["total"]);
        assert_eq!(tree.parameters_of(functions[0]), ["$cart"]);
    }
}
