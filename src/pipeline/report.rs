//! Per-file report blocks and their text rendering.

use serde::Serialize;

use crate::language::Language;

/// Description of one method or top-level function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodBlock {
    /// Method name.
    pub name: String,
    /// Generated description, or an inline error placeholder.
    pub description: String,
    /// Parameter names, receiver excluded.
    pub parameters: Vec<String>,
}

impl MethodBlock {
    /// Renders the block: a call-style header, the indented description and,
    /// when there are any, the parameter names.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![format!("\n- {}()", self.name), format!("  {}", self.description)];
        if !self.parameters.is_empty() {
            lines.push(format!("  Parameters: {}", self.parameters.join(", ")));
        }
        lines.join("\n")
    }
}

/// Description of one class and its methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassBlock {
    /// Class name.
    pub name: String,
    /// Generated description, or an inline error placeholder.
    pub description: String,
    /// Methods declared directly in the class body, in source order.
    pub methods: Vec<MethodBlock>,
}

impl ClassBlock {
    /// Renders the class header, its description and a `Methods:` section
    /// when the class has methods.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![format!("\nClass '{}':", self.name), self.description.clone()];
        if !self.methods.is_empty() {
            lines.push("\nMethods:".to_string());
            lines.extend(self.methods.iter().map(MethodBlock::render));
        }
        lines.join("\n")
    }
}

/// Everything described in one source file.
///
/// Block order is fixed: module, then every class, then every top-level
/// function. It is not interleaved source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Language the file was parsed as.
    pub language: Language,
    /// Labelled module description, when the file has a docstring.
    pub module: Option<String>,
    /// Classes in traversal order.
    pub classes: Vec<ClassBlock>,
    /// Top-level functions in traversal order.
    pub functions: Vec<MethodBlock>,
}

impl FileReport {
    /// Joins all blocks into the flat text report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();
        blocks.extend(self.module.clone());
        blocks.extend(self.classes.iter().map(ClassBlock::render));
        if !self.functions.is_empty() {
            blocks.push("\nTop-level functions:".to_string());
            blocks.extend(self.functions.iter().map(MethodBlock::render));
        }
        blocks.join("\n")
    }

    /// Returns `true` if the file contained nothing describable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module.is_none() && self.classes.is_empty() && self.functions.is_empty()
    }
}
