//! Ranking of arguments and claims
//!
//! Debunked arguments are flagged, never removed.

use crate::error::{EngineError, Result};
use crate::propagation::ArgumentScore;
use crate::snapshot::ScoredClaim;
use reasonrank_domain::{ArgumentId, ClaimId, ConfidenceInterval, NodeIndex};
use std::cmp::Ordering;

/// Whether an argument's credibility fell below the debunked threshold
pub fn is_debunked(score: &ArgumentScore, threshold: f64) -> bool {
    score.reason_rank < threshold
}

fn by_impact(a: &ArgumentScore, b: &ArgumentScore) -> Ordering {
    b.raw_impact
        .partial_cmp(&a.raw_impact)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

/// Direct children of `parent` (or the claim's top-level arguments when
/// `None`), strongest contribution first
pub fn ranked_children(
    snapshot: &ScoredClaim,
    parent: Option<ArgumentId>,
) -> Result<Vec<&ArgumentScore>> {
    let tree = snapshot.graph().tree();
    let nodes: &[NodeIndex] = match parent {
        Some(id) => {
            let node = tree.find(id).ok_or(EngineError::UnknownArgument(id))?;
            tree.children(node)
        }
        None => tree.roots(),
    };

    let mut ranked: Vec<&ArgumentScore> = nodes
        .iter()
        .filter_map(|node| snapshot.scores().get(node.index()))
        .collect();
    ranked.sort_by(|a, b| by_impact(a, b));
    Ok(ranked)
}

/// One row of the claim leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,

    /// Claim identifier
    pub claim: ClaimId,

    /// Claim statement
    pub statement: String,

    /// Claim truth score
    pub truth_score: f64,

    /// Uncertainty band
    pub confidence_interval: ConfidenceInterval,

    /// Arguments in the claim's tree
    pub argument_count: usize,
}

/// Order scored claims by truth score, highest first
///
/// Ties are broken by claim id so the ordering is stable across runs.
pub fn leaderboard<'a, I>(snapshots: I) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a ScoredClaim>,
{
    let mut claims: Vec<&ScoredClaim> = snapshots.into_iter().collect();
    claims.sort_by(|a, b| {
        b.truth_score()
            .partial_cmp(&a.truth_score())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.claim_id().cmp(&b.claim_id()))
    });

    claims
        .into_iter()
        .enumerate()
        .map(|(i, snapshot)| LeaderboardEntry {
            rank: i + 1,
            claim: snapshot.claim_id(),
            statement: snapshot.claim().statement.clone(),
            truth_score: snapshot.truth_score(),
            confidence_interval: snapshot.belief().confidence_interval,
            argument_count: snapshot.argument_count(),
        })
        .collect()
}

/// Score of one argument with its ranked sub-arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// The argument's score
    pub score: ArgumentScore,

    /// Argument text
    pub statement: String,

    /// Whether the argument is debunked
    pub debunked: bool,

    /// Sub-arguments, strongest contribution first
    pub children: Vec<ScoreBreakdown>,
}

/// Nested breakdown of every top-level argument of a claim
///
/// Built bottom-up over the arena, so arbitrarily deep trees are fine.
pub fn score_breakdown(snapshot: &ScoredClaim, debunked_threshold: f64) -> Vec<ScoreBreakdown> {
    let tree = snapshot.graph().tree();
    let mut built: Vec<Option<ScoreBreakdown>> = vec![None; tree.len()];
    let nodes: Vec<_> = tree.iter().collect();

    for &(node, entry) in nodes.iter().rev() {
        let i = node.index();
        let Some(score) = snapshot.scores().get(i) else {
            continue;
        };
        let mut children: Vec<ScoreBreakdown> = tree
            .children(node)
            .iter()
            .filter_map(|child| built[child.index()].take())
            .collect();
        children.sort_by(|a, b| by_impact(&a.score, &b.score));

        built[i] = Some(ScoreBreakdown {
            debunked: is_debunked(score, debunked_threshold),
            score: score.clone(),
            statement: entry.argument.claim.clone(),
            children,
        });
    }

    let mut roots: Vec<ScoreBreakdown> = tree
        .roots()
        .iter()
        .filter_map(|root| built[root.index()].take())
        .collect();
    roots.sort_by(|a, b| by_impact(&a.score, &b.score));
    roots
}
