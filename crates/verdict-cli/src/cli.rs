//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Verdict CLI - judge whether evidence supports, refutes or leaves a claim undecided.
#[derive(Debug, Parser)]
#[command(name = "verdict")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Survey database path
    #[arg(long, global = true, env = "VERDICT_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Take the survey interactively (default)
    Take(TakeArgs),

    /// Import the examples and/or assignments sheets from CSV
    Import(ImportArgs),

    /// Export saved results to CSV
    Export(ExportArgs),

    /// List saved results
    Results(ResultsArgs),
}

/// Arguments for the take command.
#[derive(Debug, Default, Parser)]
pub struct TakeArgs {
    /// User ID to log in with (prompted for when omitted)
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Examples sheet (example_id, claim, sentence_1..sentence_N)
    #[arg(short, long)]
    pub examples: Option<PathBuf>,

    /// Assignments sheet (user_id, example_ids)
    #[arg(short, long)]
    pub assignments: Option<PathBuf>,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Destination CSV file
    pub output: PathBuf,
}

/// Arguments for the results command.
#[derive(Debug, Parser)]
pub struct ResultsArgs {
    /// Only show results for this user
    #[arg(short, long)]
    pub user: Option<String>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_take() {
        let cli = Cli::parse_from(["verdict"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_take_command() {
        let cli = Cli::parse_from(["verdict", "take", "--user", "user_1"]);
        match cli.command {
            Some(Command::Take(args)) => assert_eq!(args.user.as_deref(), Some("user_1")),
            _ => panic!("Expected Take command"),
        }
    }

    #[test]
    fn test_import_command() {
        let cli = Cli::parse_from([
            "verdict",
            "--db",
            "survey.db",
            "import",
            "--examples",
            "examples.csv",
        ]);
        assert_eq!(cli.db, Some(PathBuf::from("survey.db")));
        match cli.command {
            Some(Command::Import(args)) => {
                assert_eq!(args.examples, Some(PathBuf::from("examples.csv")));
                assert!(args.assignments.is_none());
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Json.into();
        assert_eq!(format, crate::config::OutputFormat::Json);
    }
}
