//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ReasonRank CLI - Score argument graphs and replay mutation events.
#[derive(Debug, Parser)]
#[command(name = "reasonrank")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REASONRANK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log scoring details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids and scores only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score every claim in a records file
    Score(ScoreArgs),

    /// Run the duplication scorer over a flat list of arguments
    Dedup(DedupArgs),

    /// Apply a mutation event log to scored claims
    Replay(ReplayArgs),

    /// Rank claims by truth score
    Leaderboard(LeaderboardArgs),

    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// JSON file with claim, argument and evidence records
    pub records: PathBuf,

    /// Evaluation time in milliseconds since the Unix epoch (default: now)
    #[arg(long)]
    pub now: Option<u64>,
}

/// Arguments for the dedup command.
#[derive(Debug, Parser)]
pub struct DedupArgs {
    /// JSON file with an array of argument records sharing one parent
    pub arguments: PathBuf,

    /// Evaluation time in milliseconds since the Unix epoch (default: now)
    #[arg(long)]
    pub now: Option<u64>,
}

/// Arguments for the replay command.
#[derive(Debug, Parser)]
pub struct ReplayArgs {
    /// JSON file with claim, argument and evidence records
    pub records: PathBuf,

    /// JSON file with an array of mutation events
    pub events: PathBuf,

    /// Evaluation time in milliseconds since the Unix epoch (default: now)
    #[arg(long)]
    pub now: Option<u64>,
}

/// Arguments for the leaderboard command.
#[derive(Debug, Parser)]
pub struct LeaderboardArgs {
    /// JSON file with claim, argument and evidence records
    pub records: PathBuf,

    /// Maximum number of claims to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Evaluation time in milliseconds since the Unix epoch (default: now)
    #[arg(long)]
    pub now: Option<u64>,
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
