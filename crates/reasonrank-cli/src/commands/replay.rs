//! Replay command implementation.

use super::evaluation_time;
use crate::cli::ReplayArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{ClaimDelta, Formatter};
use crate::records::{load_events, RecordSet};
use reasonrank_domain::ClaimSource;
use reasonrank_engine::{ReasonRankEngine, ScoreBook};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Score the records, apply every event in order and render the changes.
pub fn replay_report(args: &ReplayArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    let engine = ReasonRankEngine::new(config.engine.clone())?;
    let records = RecordSet::from_file(&args.records)?;
    let events = load_events(&args.events)?;
    let now = evaluation_time(args.now);

    let book = ScoreBook::new(engine);
    book.insert_all(records.graphs()?, now);
    let before: BTreeMap<_, _> = book
        .snapshots()
        .iter()
        .map(|s| (s.claim_id(), s.truth_score()))
        .collect();
    debug!(claims = before.len(), "Scored records before replay");

    for event in &events {
        book.apply(event, now)?;
    }
    info!(events = events.len(), claims = book.len(), "Replayed event log");

    // Report in file order
    let deltas: Vec<ClaimDelta> = records
        .claim_ids()
        .into_iter()
        .filter_map(|id| book.get(id))
        .map(|s| ClaimDelta {
            claim: s.claim_id(),
            statement: s.claim().statement.clone(),
            before: before.get(&s.claim_id()).copied().unwrap_or_else(|| s.truth_score()),
            after: s.truth_score(),
        })
        .collect();

    formatter.format_replay(&deltas, events.len(), &book.metrics())
}

/// Execute the replay command.
pub fn execute_replay(args: ReplayArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", replay_report(&args, config, formatter)?);
    Ok(())
}
