//! Immutable scored claim snapshots

use crate::assess::Assessment;
use crate::belief::BeliefScore;
use crate::propagation::ArgumentScore;
use reasonrank_dedup::ArgumentCluster;
use reasonrank_domain::{ArgumentId, Claim, ClaimGraph, ClaimId};

/// A claim graph together with every score computed for it
///
/// Snapshots are never edited; mutation events produce a new snapshot.
#[derive(Debug, Clone)]
pub struct ScoredClaim {
    pub(crate) graph: ClaimGraph,
    pub(crate) assessment: Assessment,
    pub(crate) scores: Vec<ArgumentScore>,
    pub(crate) belief: BeliefScore,
    pub(crate) evaluated_at: u64,
}

impl ScoredClaim {
    /// Claim identifier
    pub fn claim_id(&self) -> ClaimId {
        self.graph.claim.id
    }

    /// The claim record, with its truth score set to the computed value
    pub fn claim(&self) -> &Claim {
        &self.graph.claim
    }

    /// The graph that was scored
    pub fn graph(&self) -> &ClaimGraph {
        &self.graph
    }

    /// Claim-level belief
    pub fn belief(&self) -> &BeliefScore {
        &self.belief
    }

    /// Claim truth score
    pub fn truth_score(&self) -> f64 {
        self.belief.truth_score
    }

    /// Per-argument scores in arena order
    pub fn scores(&self) -> &[ArgumentScore] {
        &self.scores
    }

    /// Score of one argument
    pub fn score(&self, id: ArgumentId) -> Option<&ArgumentScore> {
        let node = self.graph.tree().find(id)?;
        self.scores.get(node.index())
    }

    /// Duplication-stage results
    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    /// Similarity clusters across all sibling groups
    pub fn clusters(&self) -> impl Iterator<Item = &ArgumentCluster> {
        self.assessment.clusters()
    }

    /// Time the snapshot was last evaluated, in milliseconds
    pub fn evaluated_at(&self) -> u64 {
        self.evaluated_at
    }

    /// Number of arguments in the claim's tree
    pub fn argument_count(&self) -> usize {
        self.graph.tree().len()
    }
}

/// A new snapshot produced by applying one mutation event
#[derive(Debug, Clone)]
pub struct SnapshotUpdate {
    /// The resulting snapshot
    pub snapshot: ScoredClaim,

    /// Nodes whose scores were recomputed
    pub nodes_rescored: usize,
}
