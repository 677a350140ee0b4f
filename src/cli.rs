//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Provider;
use crate::language::Language;

/// Top-level CLI parser for `codescribe`.
#[derive(Debug, Parser)]
#[command(name = "codescribe", version, about = "Describe source code with a language model")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Output encoding for analysis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `--- path ---` sections.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Describe every tracked source file in a git repository.
    Analyze {
        /// Repository root.
        repo: PathBuf,
        /// Description provider: anthropic, openai or ollama.
        #[arg(long, default_value = "openai")]
        provider: Provider,
        /// Write results here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output encoding.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Include the project structure and use it as prompt context.
        #[arg(long)]
        with_structure: bool,
        /// Bound the description and parse caches to this many entries.
        #[arg(long)]
        cache_capacity: Option<usize>,
    },
    /// Describe a single source file.
    File {
        /// File to analyse.
        path: PathBuf,
        /// Language to parse as; detected from the extension when omitted.
        #[arg(long)]
        language: Option<Language>,
        /// Description provider: anthropic, openai or ollama.
        #[arg(long, default_value = "openai")]
        provider: Provider,
    },
    /// Summarise the layout of a git repository.
    Structure {
        /// Repository root.
        repo: PathBuf,
        /// Also ask the model for a high-level overview.
        #[arg(long)]
        overview: bool,
        /// Description provider used for the overview.
        #[arg(long, default_value = "openai")]
        provider: Provider,
        /// Write the structure JSON here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, OutputFormat};
    use crate::config::Provider;
    use clap::Parser;

    #[test]
    fn parses_analyze_with_defaults() {
        let cli = Cli::parse_from(["codescribe", "analyze", "."]);
        let Command::Analyze { provider, format, cache_capacity, with_structure, .. } = cli.command
        else {
            panic!("expected analyze");
        };
        assert_eq!(provider, Provider::OpenAi);
        assert_eq!(format, OutputFormat::Text);
        assert_eq!(cache_capacity, None);
        assert!(!with_structure);
    }

    #[test]
    fn parses_analyze_options() {
        let cli = Cli::parse_from([
            "codescribe",
            "-v",
            "analyze",
            "repo",
            "--provider",
            "ollama",
            "--format",
            "json",
            "--cache-capacity",
            "64",
            "--with-structure",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Analyze {
                provider: Provider::Ollama,
                format: OutputFormat::Json,
                cache_capacity: Some(64),
                with_structure: true,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["codescribe", "analyze", ".", "--provider", "palm"]).is_err());
    }

    #[test]
    fn file_accepts_language_override() {
        let cli = Cli::parse_from(["codescribe", "file", "snippet.txt", "--language", "python"]);
        assert!(matches!(cli.command, Command::File { language: Some(_), .. }));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["codescribe", "-v", "-q", "structure", "."]).is_err());
    }
}
