//! Leaderboard command implementation.

use super::evaluation_time;
use crate::cli::LeaderboardArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::records::RecordSet;
use reasonrank_engine::{leaderboard, ReasonRankEngine};

/// Rank the claims in the records file by truth score.
pub fn leaderboard_report(args: &LeaderboardArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    if args.limit == Some(0) {
        return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
    }

    let engine = ReasonRankEngine::new(config.engine.clone())?;
    let records = RecordSet::from_file(&args.records)?;
    let claims = engine.score_claims(records.graphs()?, evaluation_time(args.now));

    let mut entries = leaderboard(&claims);
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    formatter.format_leaderboard(&entries)
}

/// Execute the leaderboard command.
pub fn execute_leaderboard(args: LeaderboardArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", leaderboard_report(&args, config, formatter)?);
    Ok(())
}
