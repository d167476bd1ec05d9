//! Dedup command implementation.

use super::evaluation_time;
use crate::cli::DedupArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::records::load_arguments;
use reasonrank_dedup::DuplicationScorer;
use reasonrank_domain::Argument;
use std::collections::BTreeSet;

/// Score a flat list of sibling arguments for duplication.
pub fn dedup_report(args: &DedupArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    let arguments = load_arguments(&args.arguments)?;
    check_unique(&arguments)?;

    let scorer = DuplicationScorer::new(config.engine.dedup.clone());
    let refs: Vec<&Argument> = arguments.iter().collect();
    let mut scored = scorer.score_arguments(&refs, evaluation_time(args.now));
    let clusters = scorer.cluster(&mut scored);

    formatter.format_dedup(&arguments, &scored, &clusters)
}

fn check_unique(arguments: &[Argument]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for argument in arguments {
        if !seen.insert(argument.id) {
            return Err(CliError::InvalidInput(format!(
                "Duplicate argument id: {}",
                argument.id
            )));
        }
    }
    Ok(())
}

/// Execute the dedup command.
pub fn execute_dedup(args: DedupArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", dedup_report(&args, config, formatter)?);
    Ok(())
}
