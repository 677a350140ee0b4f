//! Prompt text for each kind of description request.

use std::fmt::Write as _;

use crate::element::{CodeElement, ElementKind};

/// Prompt for a class or method element, with optional project context.
#[must_use]
pub fn element_prompt(element: &CodeElement, context: Option<&str>) -> String {
    let (subject, ask) = match element.kind {
        ElementKind::Class => (
            "class definition",
            "Provide a concise description of what this class does. \
             Focus on its purpose and main functionality.",
        ),
        ElementKind::Method | ElementKind::Module => (
            "function/method",
            "Provide a concise description of what this function/method does. \
             Include its purpose, parameters, and return value.",
        ),
    };

    let mut prompt = context_preamble(context);
    let _ = write!(
        prompt,
        "Given this {subject}:\n\n{source}\n\n{ask} Docstring: {docstring}\n",
        source = element.source_text,
        docstring = element.docstring.as_deref().unwrap_or_default(),
    );
    prompt
}

/// Prompt for a module, built from its docstring.
#[must_use]
pub fn module_prompt(docstring: &str, context: Option<&str>) -> String {
    let mut prompt = context_preamble(context);
    let _ = write!(
        prompt,
        "Given this module/file docstring:\n\n{docstring}\n\n\
         Provide a concise description of what this module/file does."
    );
    prompt
}

/// Prompt asking for a high-level overview of a repository.
#[must_use]
pub fn overview_prompt(summary: &str) -> String {
    format!(
        "Given this project structure:\n\n{summary}\n\n\
         Provide a high-level overview of this project: what it is for, \
         how it is organised, and which languages and components matter most."
    )
}

fn context_preamble(context: Option<&str>) -> String {
    match context {
        Some(context) if !context.trim().is_empty() => {
            format!("Project context:\n{}\n\n", context.trim_end())
        }
        _ => String::new(),
    }
}
