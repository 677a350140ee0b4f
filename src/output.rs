//! Rendering analysis results as flat text or JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::pipeline::{AnalysisResults, FileReport};
use crate::structure::ProjectStructure;

/// Where and when a set of results was produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunHeader {
    /// Repository root as given on the command line.
    pub repository: String,
    /// Commit the repository was at, if known.
    pub commit: Option<String>,
    /// Time the analysis finished.
    pub generated_at: DateTime<Utc>,
}

impl RunHeader {
    /// Header stamped with the current time.
    pub fn now(repository: impl Into<String>, commit: Option<String>) -> Self {
        Self { repository: repository.into(), commit, generated_at: Utc::now() }
    }
}

/// Renders results as `--- path ---` sections.
#[must_use]
pub fn render_text(
    header: &RunHeader,
    results: &AnalysisResults,
    structure: Option<&ProjectStructure>,
) -> String {
    let mut out = format!("# Code analysis of {}\n", header.repository);
    if let Some(commit) = &header.commit {
        let _ = writeln!(out, "# Commit: {commit}");
    }
    let generated = header.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let _ = writeln!(out, "# Generated: {generated}");
    if let Some(structure) = structure {
        out.push_str("\n# Project structure\n");
        out.push_str(&structure.summary());
    }
    for (path, report) in results {
        let _ = write!(out, "\n--- {path} ---\n{}\n", report.render());
    }
    out
}

#[derive(Serialize)]
struct JsonFile<'a> {
    #[serde(flatten)]
    report: &'a FileReport,
    text: String,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(flatten)]
    header: &'a RunHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    structure: Option<&'a ProjectStructure>,
    files: BTreeMap<&'a str, JsonFile<'a>>,
}

/// Renders results as a pretty-printed JSON document.
///
/// Each file carries both the structured blocks and the rendered text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(
    header: &RunHeader,
    results: &AnalysisResults,
    structure: Option<&ProjectStructure>,
) -> Result<String, serde_json::Error> {
    let files = results
        .iter()
        .map(|(path, report)| (path.as_str(), JsonFile { report, text: report.render() }))
        .collect();
    serde_json::to_string_pretty(&JsonDocument { header, structure, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::pipeline::MethodBlock;

    fn results() -> AnalysisResults {
        let mut results = AnalysisResults::new();
        results.insert(
            "src/app.py".to_string(),
            FileReport {
                language: Language::Python,
                module: None,
                classes: vec![],
                functions: vec![MethodBlock {
                    name: "main".into(),
                    description: "Entry point.".into(),
                    parameters: vec!["argv".into()],
                }],
            },
        );
        results
    }

    fn header() -> RunHeader {
        RunHeader {
            repository: "/repo".into(),
            commit: Some("abc123".into()),
            generated_at: DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn text_output_has_header_and_sections() {
        let text = render_text(&header(), &results(), None);
        assert!(text.starts_with("# Code analysis of /repo\n# Commit: abc123\n"));
        assert!(text.contains("# Generated: 2025-01-02T03:04:05Z\n"));
        assert!(text.contains("\n--- src/app.py ---\n\nTop-level functions:\n\n- main()"));
    }

    #[test]
    fn json_output_carries_blocks_and_text() {
        let structure = ProjectStructure::from_paths(["src/app.py"]);
        let json = render_json(&header(), &results(), Some(&structure)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["commit"], "abc123");
        assert_eq!(value["files"]["src/app.py"]["language"], "python");
        assert_eq!(value["files"]["src/app.py"]["functions"][0]["parameters"][0], "argv");
        assert!(value["files"]["src/app.py"]["text"].as_str().unwrap().contains("- main()"));
        assert_eq!(value["structure"]["counts"]["total_files"], 1);
    }
}
