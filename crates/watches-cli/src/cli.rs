//! Command-line argument model.
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use watches_core::DEFAULT_CHUNK_SIZE;

#[derive(Parser, Debug)]
#[command(name = "watches")]
#[command(version)]
#[command(about = "An n-way file tree differencer")]
#[command(long_about = "Compares every file path found under any of the given roots \
    and reports paths whose content differs between the roots that hold them.\n\n\
    Examples:\n  \
    watches -s /mnt/backup-a -s /mnt/backup-b\n  \
    watches -s ./mirror1 -s ./mirror2 -s ./mirror3 --format json\n  \
    watches -s primary -s replica --fail-on-mismatch")]
pub struct Cli {
    /// Search root directory (repeat once per copy of the tree)
    #[arg(
        short = 's',
        long = "search",
        value_name = "DIR",
        required = true,
        action = ArgAction::Append
    )]
    pub search: Vec<PathBuf>,

    /// Output format for findings
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Exit with status 1 when any mismatch is found
    #[arg(long)]
    pub fail_on_mismatch: bool,

    /// Bytes read per chunk while hashing
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Increase log verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// How findings are rendered on stdout.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
    /// One CSV row per finding
    Csv,
}

impl Cli {
    /// Maximum tracing level implied by `-v` / `-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_repeatable_and_ordered() {
        let cli = Cli::try_parse_from(["watches", "-s", "b", "--search", "a", "-s", "c"]).unwrap();
        assert_eq!(
            cli.search,
            vec![PathBuf::from("b"), PathBuf::from("a"), PathBuf::from("c")]
        );
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!cli.fail_on_mismatch);
    }

    #[test]
    fn test_search_is_required() {
        let err = Cli::try_parse_from(["watches"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["watches", "-s", "x"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::INFO);
        let cli = Cli::try_parse_from(["watches", "-s", "x", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
        let cli = Cli::try_parse_from(["watches", "-s", "x", "-q"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
        assert!(Cli::try_parse_from(["watches", "-s", "x", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_format_values() {
        let cli = Cli::try_parse_from(["watches", "-s", "x", "--format", "csv"]).unwrap();
        assert_eq!(cli.format, ReportFormat::Csv);
        assert!(Cli::try_parse_from(["watches", "-s", "x", "--format", "xml"]).is_err());
    }
}
