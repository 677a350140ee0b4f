//! Repository layout snapshot used for overviews and prompt context.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::error::WalkError;
use crate::language::Language;
use crate::walker::RepositoryWalker;

const DOC_EXTENSIONS: &[&str] = &["md", "rst", "txt", "adoc"];
const DOC_DIRS: &[&str] = &["doc", "docs", "documentation"];
const CONFIG_EXTENSIONS: &[&str] =
    &["toml", "yaml", "yml", "json", "ini", "cfg", "conf", "env", "lock", "xml"];
const CONFIG_FILES: &[&str] = &[
    "makefile",
    "dockerfile",
    ".gitignore",
    ".gitattributes",
    ".editorconfig",
    "requirements.txt",
    "setup.py",
];

/// Category of a tracked file, decided from its path alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClass {
    /// Source in a recognised language.
    Source,
    /// Tests, fixtures and test helpers.
    Test,
    /// Build, packaging and tool configuration.
    Config,
    /// Prose documentation.
    Documentation,
    /// Anything else.
    Other,
}

impl FileClass {
    /// Classifies a repository-relative path.
    ///
    /// Rules are tried in order: test, documentation, config, source.
    #[must_use]
    pub fn of(path: &str) -> Self {
        let lowered = path.to_ascii_lowercase();
        let file_name = lowered.rsplit('/').next().unwrap_or_default();
        let extension = Path::new(file_name).extension().and_then(|e| e.to_str()).unwrap_or("");
        let dirs: Vec<&str> = lowered.split('/').rev().skip(1).collect();

        if is_test(file_name, &dirs) {
            Self::Test
        } else if file_name.starts_with("readme")
            || file_name.starts_with("changelog")
            || file_name.starts_with("license")
            || (DOC_EXTENSIONS.contains(&extension) && file_name != "requirements.txt")
            || dirs.iter().any(|d| DOC_DIRS.contains(d))
        {
            Self::Documentation
        } else if CONFIG_FILES.contains(&file_name) || CONFIG_EXTENSIONS.contains(&extension) {
            Self::Config
        } else if Language::from_path(file_name).is_some() {
            Self::Source
        } else {
            Self::Other
        }
    }
}

fn is_test(file_name: &str, dirs: &[&str]) -> bool {
    let stem = file_name.split('.').next().unwrap_or_default();
    dirs.iter().any(|d| matches!(*d, "test" | "tests" | "spec" | "__tests__"))
        || stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem == "conftest"
        || file_name.contains(".test.")
        || file_name.contains(".spec.")
}

/// Aggregate counts over a [`ProjectStructure`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureCounts {
    /// Number of tracked files.
    pub total_files: usize,
    /// Files classed as source.
    pub source_files: usize,
    /// Files classed as tests.
    pub test_files: usize,
    /// Files classed as configuration.
    pub config_files: usize,
    /// Files classed as documentation.
    pub documentation_files: usize,
    /// Files in no other class.
    pub other_files: usize,
}

/// Snapshot of a repository's layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStructure {
    /// Language to number of files.
    pub languages: BTreeMap<Language, usize>,
    /// Directory (`.` for the root) to the files directly inside it.
    pub directories: BTreeMap<String, Vec<String>>,
    /// Class to files, in listing order.
    pub files: BTreeMap<FileClass, Vec<String>>,
    /// Totals.
    pub counts: StructureCounts,
}

impl ProjectStructure {
    /// Builds the snapshot from repository-relative paths.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut structure = Self::default();
        for path in paths {
            structure.add(path.as_ref());
        }
        structure
    }

    /// Lists the repository at `root` and builds its snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::RepositoryAccess`] if the listing fails.
    pub fn analyze(walker: &RepositoryWalker<'_>, root: &Path) -> Result<Self, WalkError> {
        let files = walker.list_relative_files(root)?;
        let structure = Self::from_paths(&files);
        tracing::info!(files = structure.counts.total_files, "project structure analysed");
        Ok(structure)
    }

    fn add(&mut self, path: &str) {
        let path = path.replace('\\', "/");
        if let Some(language) = Language::from_path(&path) {
            *self.languages.entry(language).or_default() += 1;
        }
        let (dir, _) = path.rsplit_once('/').unwrap_or((".", path.as_str()));
        self.directories.entry(dir.to_string()).or_default().push(path.clone());

        let class = FileClass::of(&path);
        let counts = &mut self.counts;
        counts.total_files += 1;
        match class {
            FileClass::Source => counts.source_files += 1,
            FileClass::Test => counts.test_files += 1,
            FileClass::Config => counts.config_files += 1,
            FileClass::Documentation => counts.documentation_files += 1,
            FileClass::Other => counts.other_files += 1,
        }
        self.files.entry(class).or_default().push(path);
    }

    /// Files in `class`.
    #[must_use]
    pub fn files_in(&self, class: FileClass) -> &[String] {
        self.files.get(&class).map_or(&[], Vec::as_slice)
    }

    /// Short plain-text summary suitable for a prompt.
    #[must_use]
    pub fn summary(&self) -> String {
        let c = &self.counts;
        let mut out = format!(
            "{} files: {} source, {} test, {} config, {} documentation, {} other.\n",
            c.total_files,
            c.source_files,
            c.test_files,
            c.config_files,
            c.documentation_files,
            c.other_files
        );

        if !self.languages.is_empty() {
            let mut languages: Vec<_> = self.languages.iter().collect();
            languages.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            let listed: Vec<String> =
                languages.iter().map(|(lang, n)| format!("{lang} ({n})")).collect();
            let _ = writeln!(out, "Languages: {}.", listed.join(", "));
        }

        let mut dirs: Vec<_> = self.directories.iter().map(|(d, f)| (d, f.len())).collect();
        dirs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        let listed: Vec<String> =
            dirs.iter().take(10).map(|(dir, n)| format!("{dir} ({n})")).collect();
        if !listed.is_empty() {
            let _ = writeln!(out, "Directories: {}.", listed.join(", "));
        }
        out
    }
}
