//! ReasonRank engine: full evaluation and incremental updates

use crate::assess::{assess_graph, assess_group, Assessment};
use crate::belief::{score_protocol_belief, BeliefScore};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::events::{ensure_claim, EvidenceTarget, MutationEvent};
use crate::propagation::{ArgumentScore, Propagator};
use crate::snapshot::{ScoredClaim, SnapshotUpdate};
use rayon::prelude::*;
use reasonrank_dedup::DuplicationScorer;
use reasonrank_domain::{ArgumentId, ClaimGraph, ClaimSource, Clock, NodeIndex};
use tracing::{debug, info};

/// Scores claim graphs
///
/// The engine holds only configuration, so one instance can be shared
/// across threads and claims.
///
/// # Examples
///
/// ```
/// use reasonrank_engine::{EngineConfig, ReasonRankEngine};
/// use reasonrank_domain::{
///     Argument, ArgumentId, ArgumentSpec, ArgumentTree, Claim, ClaimGraph, ClaimId, Evidence, Side,
/// };
///
/// let tree = ArgumentTree::from_specs(vec![
///     Argument::new(ArgumentId::from_value(1), "Buses cut emissions", Side::Pro)
///         .with_truth(0.8)
///         .into(),
/// ])
/// .unwrap();
/// let graph = ClaimGraph::new(
///     Claim::new(ClaimId::from_value(1), "Cities should fund buses"),
///     tree,
///     Vec::<Evidence>::new(),
/// )
/// .unwrap();
///
/// let engine = ReasonRankEngine::new(EngineConfig::default()).unwrap();
/// let scored = engine.evaluate(graph, 0);
/// assert_eq!(scored.truth_score(), 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct ReasonRankEngine {
    config: EngineConfig,
    scorer: DuplicationScorer,
}

impl Default for ReasonRankEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            scorer: DuplicationScorer::new(config.dedup.clone()),
            config,
        }
    }
}

impl ReasonRankEngine {
    /// Create an engine after validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: DuplicationScorer::new(config.dedup.clone()),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn propagator(&self) -> Propagator<'_> {
        Propagator::new(&self.config.propagation, &self.config.corroboration)
    }

    /// Score a claim graph from scratch
    pub fn evaluate(&self, mut graph: ClaimGraph, now_ms: u64) -> ScoredClaim {
        let assessment = assess_graph(&graph, &self.scorer, &self.config, now_ms);
        let scores = self.propagator().score_tree(&graph, &assessment.nodes);
        let belief = self.belief(&graph, &scores);
        graph.claim.set_truth_score(belief.truth_score);

        debug!(
            claim = %graph.claim.id,
            arguments = scores.len(),
            truth = belief.truth_score,
            clusters_capped = assessment.clusters_capped(),
            "Evaluated claim"
        );
        ScoredClaim {
            graph,
            assessment,
            scores,
            belief,
            evaluated_at: now_ms,
        }
    }

    /// Score a claim graph at the clock's current time
    pub fn evaluate_at<C: Clock>(&self, graph: ClaimGraph, clock: &C) -> ScoredClaim {
        self.evaluate(graph, clock.now_ms())
    }

    /// Score independent claims in parallel
    ///
    /// Results come back in input order.
    pub fn score_claims(&self, graphs: Vec<ClaimGraph>, now_ms: u64) -> Vec<ScoredClaim> {
        graphs
            .into_par_iter()
            .map(|graph| self.evaluate(graph, now_ms))
            .collect()
    }

    /// Load every claim from a source and score them in parallel
    pub fn evaluate_source<S: ClaimSource>(
        &self,
        source: &S,
        now_ms: u64,
    ) -> std::result::Result<Vec<ScoredClaim>, S::Error> {
        let mut graphs = Vec::new();
        for id in source.claim_ids() {
            if let Some(graph) = source.load_claim(id)? {
                graphs.push(graph);
            }
        }
        Ok(self.score_claims(graphs, now_ms))
    }

    /// Score one argument of a graph, including its whole subtree
    pub fn score_argument(
        &self,
        graph: &ClaimGraph,
        id: ArgumentId,
        now_ms: u64,
    ) -> Result<ArgumentScore> {
        let tree = graph.tree();
        let root = tree.find(id).ok_or(EngineError::UnknownArgument(id))?;

        let mut subtree = vec![root];
        let mut cursor = 0;
        while cursor < subtree.len() {
            subtree.extend_from_slice(tree.children(subtree[cursor]));
            cursor += 1;
        }
        subtree.sort_unstable();

        let assessment = assess_graph(graph, &self.scorer, &self.config, now_ms);
        let propagator = self.propagator();
        let mut slots: Vec<Option<ArgumentScore>> = vec![None; tree.len()];
        for &node in subtree.iter().rev() {
            let children = tree
                .children(node)
                .iter()
                .filter_map(|child| slots[child.index()].as_ref());
            let score =
                propagator.score_node(graph, node, &assessment.nodes[node.index()], children);
            slots[node.index()] = Some(score);
        }

        slots[root.index()]
            .take()
            .ok_or(EngineError::UnknownArgument(id))
    }

    /// Aggregate belief for a claim graph
    pub fn score_protocol_belief(&self, graph: &ClaimGraph, now_ms: u64) -> BeliefScore {
        let assessment = assess_graph(graph, &self.scorer, &self.config, now_ms);
        let scores = self.propagator().score_tree(graph, &assessment.nodes);
        self.belief(graph, &scores)
    }

    fn belief(&self, graph: &ClaimGraph, scores: &[ArgumentScore]) -> BeliefScore {
        score_protocol_belief(
            graph,
            scores,
            &self.config.propagation,
            &self.config.corroboration,
        )
    }

    /// Apply one mutation event, producing a new snapshot
    ///
    /// Only the nodes the event invalidates and their ancestors are
    /// rescored; every other score is carried over from `snapshot`.
    pub fn apply(
        &self,
        snapshot: &ScoredClaim,
        event: &MutationEvent,
        now_ms: u64,
    ) -> Result<SnapshotUpdate> {
        ensure_claim(event, snapshot)?;

        let mut graph = snapshot.graph.clone();
        let mut invalidated: Vec<NodeIndex> = Vec::new();
        let mut regroup: Vec<NodeIndex> = Vec::new();

        match event {
            MutationEvent::ArgumentSubmitted {
                parent, argument, ..
            } => {
                let node = graph.attach_argument(*parent, argument.clone())?;
                invalidated.push(node);
                regroup.push(node);
            }
            MutationEvent::EvidenceFalsified { evidence } => {
                graph.falsify_evidence(*evidence)?;
                invalidated.extend(graph.tree().nodes_citing(*evidence));
            }
            MutationEvent::RelevanceChanged {
                argument,
                relevance,
                ..
            } => {
                let node = graph.update_argument(*argument, |a| {
                    a.linkage_score = relevance.value();
                })?;
                invalidated.push(node);
            }
            MutationEvent::ScoresAdjusted {
                argument,
                adjustment,
                ..
            } => {
                let node = graph.update_argument(*argument, |a| adjustment.apply_to(a))?;
                invalidated.push(node);
                if adjustment.uniqueness.is_some() {
                    regroup.push(node);
                }
            }
            MutationEvent::EvidenceAttached {
                target, evidence, ..
            } => {
                let id = evidence.id;
                if !graph.references_evidence(id) {
                    graph.insert_evidence(evidence.clone());
                }
                match target {
                    EvidenceTarget::Claim => {
                        if !graph.claim.evidence.contains(&id) {
                            graph.claim.evidence.push(id);
                        }
                    }
                    EvidenceTarget::Argument(argument) => {
                        let node = graph.update_argument(*argument, |a| {
                            if !a.evidence.contains(&id) {
                                a.evidence.push(id);
                            }
                        })?;
                        invalidated.push(node);
                    }
                }
            }
        }

        let mut assessment = snapshot.assessment.clone();
        for node in regroup {
            invalidated.extend(self.reassess_group(&graph, &mut assessment, node, now_ms));
        }

        let mut scores = snapshot.scores.clone();
        let nodes_rescored =
            self.propagator()
                .rescore(&graph, &assessment.nodes, &mut scores, invalidated);
        let belief = self.belief(&graph, &scores);
        graph.claim.set_truth_score(belief.truth_score);

        info!(
            claim = %graph.claim.id,
            event = event.kind(),
            nodes_rescored,
            truth = belief.truth_score,
            "Applied mutation event"
        );
        Ok(SnapshotUpdate {
            snapshot: ScoredClaim {
                graph,
                assessment,
                scores,
                belief,
                evaluated_at: now_ms,
            },
            nodes_rescored,
        })
    }

    /// Rerun the duplication stage for a node's sibling group; returns the
    /// members whose uniqueness changed
    fn reassess_group(
        &self,
        graph: &ClaimGraph,
        assessment: &mut Assessment,
        node: NodeIndex,
        now_ms: u64,
    ) -> Vec<NodeIndex> {
        let group = graph.tree().group_of(node);
        let (members, clusters) = assess_group(graph, &group, &self.scorer, &self.config, now_ms);

        let mut changed = Vec::new();
        for (member, fresh) in members {
            let slot = member.index();
            if slot < assessment.nodes.len() {
                if assessment.nodes[slot].uniqueness != fresh.uniqueness {
                    changed.push(member);
                }
                assessment.nodes[slot] = fresh;
            } else {
                assessment.nodes.push(fresh);
                changed.push(member);
            }
        }
        assessment.groups.insert((group.parent, group.side), clusters);
        changed
    }
}
