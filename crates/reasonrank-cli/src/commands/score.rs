//! Score command implementation.

use super::evaluation_time;
use crate::cli::ScoreArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::records::RecordSet;
use reasonrank_engine::ReasonRankEngine;
use tracing::info;

/// Score every claim in the records file and render the result.
pub fn score_report(args: &ScoreArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    let engine = ReasonRankEngine::new(config.engine.clone())?;
    let records = RecordSet::from_file(&args.records)?;
    let now = evaluation_time(args.now);

    let claims = engine.evaluate_source(&records, now)?;
    info!(claims = claims.len(), now, "Scored record file");

    formatter.format_scored_claims(&claims, config.engine.propagation.debunked_threshold)
}

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", score_report(&args, config, formatter)?);
    Ok(())
}
