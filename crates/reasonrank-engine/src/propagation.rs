//! Bottom-up ReasonRank propagation
//!
//! A node is scored only after all of its children. The arena stores every
//! child after its parent, so descending index order and deepest-level-first
//! order are both valid schedules; no recursion is involved.

use crate::assess::NodeAssessment;
use crate::config::PropagationConfig;
use rayon::prelude::*;
use reasonrank_dedup::{corroboration_boost, CorroborationConfig};
use reasonrank_domain::{unit_clamp, ArgumentId, ClaimGraph, Evidence, NodeIndex, Side};
use std::collections::BTreeSet;
use tracing::debug;

/// Score breakdown for one argument
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentScore {
    /// Argument identifier
    pub id: ArgumentId,

    /// Side relative to the parent
    pub side: Side,

    /// Recursive credibility of the argument itself
    pub reason_rank: f64,

    /// Own truth after evidence corroboration, before propagation
    pub truth_score: f64,

    /// Unsigned weight this argument passes to its parent
    pub raw_impact: f64,

    /// `raw_impact` signed by side
    pub signed_impact: f64,

    /// Uniqueness used in `raw_impact`
    pub uniqueness_score: f64,

    /// Duplication-adjusted contribution
    pub effective_contribution: f64,

    /// Total fallacy penalty fraction
    pub fallacy_penalty: f64,

    /// Share of linked evidence that is not falsified (1.0 without evidence)
    pub evidence_factor: f64,

    /// Boost from live linked evidence
    pub corroboration_boost: f64,

    /// Score mapped from sub-arguments, `None` for leaves
    pub sub_argument_score: Option<f64>,
}

/// Scores argument nodes from their children's scores
#[derive(Debug, Clone, Copy)]
pub struct Propagator<'a> {
    config: &'a PropagationConfig,
    corroboration: &'a CorroborationConfig,
}

impl<'a> Propagator<'a> {
    /// Create a propagator
    pub fn new(config: &'a PropagationConfig, corroboration: &'a CorroborationConfig) -> Self {
        Self {
            config,
            corroboration,
        }
    }

    /// Score one node given its children's already computed scores
    pub fn score_node<'s, I>(
        &self,
        graph: &ClaimGraph,
        node: NodeIndex,
        assessment: &NodeAssessment,
        children: I,
    ) -> ArgumentScore
    where
        I: IntoIterator<Item = &'s ArgumentScore>,
    {
        let argument = graph.tree().argument(node);

        let linked: Vec<&Evidence> = graph.resolve(&argument.evidence).collect();
        let live = linked.iter().filter(|e| e.is_live()).count();
        let evidence_factor = if linked.is_empty() {
            1.0
        } else {
            live as f64 / linked.len() as f64
        };
        let boost = corroboration_boost(
            linked.iter().copied().filter(|e| e.is_live()),
            self.corroboration,
        );
        let truth = unit_clamp(argument.truth_score + boost);

        let (net, count) = children
            .into_iter()
            .fold((0.0, 0usize), |(net, count), child| (net + child.signed_impact, count + 1));
        let (blended, sub_argument_score) = if count == 0 {
            (truth, None)
        } else {
            let sub_score = unit_clamp(0.5 + (net / count as f64) * 0.5);
            let damping = self.config.damping;
            (damping * truth + (1.0 - damping) * sub_score, Some(sub_score))
        };

        let fallacy_penalty = argument.fallacy_penalty();
        let reason_rank = unit_clamp(blended * (1.0 - fallacy_penalty));
        let raw_impact = reason_rank
            * argument.linkage_score
            * argument.importance_score
            * assessment.uniqueness
            * evidence_factor;

        ArgumentScore {
            id: argument.id,
            side: argument.side,
            reason_rank,
            truth_score: truth,
            raw_impact,
            signed_impact: argument.side.sign() * raw_impact,
            uniqueness_score: assessment.uniqueness,
            effective_contribution: assessment.effective_contribution,
            fallacy_penalty,
            evidence_factor,
            corroboration_boost: boost,
            sub_argument_score,
        }
    }

    /// Score every node of a claim's tree
    ///
    /// Levels are processed deepest first; a level with at least
    /// `parallel_threshold` nodes is scored on the rayon pool.
    pub fn score_tree(&self, graph: &ClaimGraph, assessments: &[NodeAssessment]) -> Vec<ArgumentScore> {
        let tree = graph.tree();
        let mut slots: Vec<Option<ArgumentScore>> = vec![None; tree.len()];

        for level in tree.levels().iter().rev() {
            let computed: Vec<(NodeIndex, ArgumentScore)> =
                if level.len() >= self.config.parallel_threshold {
                    level
                        .par_iter()
                        .map(|&node| (node, self.score_slot(graph, node, assessments, &slots)))
                        .collect()
                } else {
                    level
                        .iter()
                        .map(|&node| (node, self.score_slot(graph, node, assessments, &slots)))
                        .collect()
                };
            for (node, score) in computed {
                slots[node.index()] = Some(score);
            }
        }

        debug!(
            claim = %graph.claim.id,
            nodes = tree.len(),
            height = tree.height(),
            "Propagated argument tree"
        );
        slots.into_iter().flatten().collect()
    }

    fn score_slot(
        &self,
        graph: &ClaimGraph,
        node: NodeIndex,
        assessments: &[NodeAssessment],
        slots: &[Option<ArgumentScore>],
    ) -> ArgumentScore {
        let children = graph
            .tree()
            .children(node)
            .iter()
            .filter_map(|child| slots[child.index()].as_ref());
        self.score_node(graph, node, &assessments[node.index()], children)
    }

    /// Rescore the invalidated nodes and every ancestor of them
    ///
    /// `scores` holds the previous results and may be shorter than the tree
    /// when arguments were appended; appended nodes are always rescored.
    /// Returns the number of nodes rescored.
    pub fn rescore<I>(
        &self,
        graph: &ClaimGraph,
        assessments: &[NodeAssessment],
        scores: &mut Vec<ArgumentScore>,
        invalidated: I,
    ) -> usize
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        let tree = graph.tree();
        let previous = scores.len();
        let mut path: BTreeSet<NodeIndex> = BTreeSet::new();
        let appended = tree.iter().skip(previous).map(|(node, _)| node);
        for node in invalidated.into_iter().chain(appended) {
            if path.insert(node) {
                path.extend(tree.ancestors(node));
            }
        }

        let mut slots: Vec<Option<ArgumentScore>> = std::mem::take(scores).into_iter().map(Some).collect();
        slots.resize(tree.len(), None);

        for &node in path.iter().rev() {
            let score = self.score_slot(graph, node, assessments, &slots);
            slots[node.index()] = Some(score);
        }

        *scores = slots.into_iter().flatten().collect();
        path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reasonrank_domain::{
        Argument, ArgumentSpec, ArgumentTree, Claim, ClaimId, EvidenceId, FallacyPenalty,
        QualityTier, VerificationStatus,
    };

    fn assessments(graph: &ClaimGraph) -> Vec<NodeAssessment> {
        graph
            .tree()
            .iter()
            .map(|(_, node)| NodeAssessment {
                uniqueness: node.argument.uniqueness.value(),
                novelty_multiplier: 1.0,
                effective_contribution: node.argument.base_score,
                derived: false,
                similarity_pairs: Vec::new(),
            })
            .collect()
    }

    fn graph(specs: Vec<ArgumentSpec>, evidence: Vec<Evidence>) -> ClaimGraph {
        ClaimGraph::new(
            Claim::new(ClaimId::from_value(1), "claim"),
            ArgumentTree::from_specs(specs).unwrap(),
            evidence,
        )
        .unwrap()
    }

    fn arg(id: u128, side: Side, truth: f64) -> Argument {
        Argument::new(ArgumentId::from_value(id), format!("argument {id}"), side).with_truth(truth)
    }

    fn score(graph: &ClaimGraph) -> Vec<ArgumentScore> {
        let config = PropagationConfig::default();
        let corroboration = CorroborationConfig::default();
        Propagator::new(&config, &corroboration).score_tree(graph, &assessments(graph))
    }

    #[test]
    fn test_leaf_scores() {
        let graph = graph(
            vec![
                arg(1, Side::Pro, 0.8).with_linkage(0.5).with_importance(2.0).into(),
                arg(2, Side::Con, 0.6).with_uniqueness(0.5).into(),
            ],
            Vec::new(),
        );
        let scores = score(&graph);

        assert_eq!(scores[0].reason_rank, 0.8);
        assert!((scores[0].raw_impact - 0.8).abs() < 1e-12);
        assert!((scores[0].signed_impact - 0.8).abs() < 1e-12);
        assert_eq!(scores[0].sub_argument_score, None);

        assert!((scores[1].raw_impact - 0.3).abs() < 1e-12);
        assert!((scores[1].signed_impact + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_fallacy_penalty_reduces_reason_rank() {
        let graph = graph(
            vec![arg(1, Side::Pro, 0.8)
                .with_fallacy(FallacyPenalty::new("ad_hominem", 0.25))
                .into()],
            Vec::new(),
        );
        let scores = score(&graph);
        assert!((scores[0].reason_rank - 0.6).abs() < 1e-12);
        assert_eq!(scores[0].fallacy_penalty, 0.25);
    }

    #[test]
    fn test_recursive_blend() {
        // Parent truth 0.2 with one strong pro child (rawImpact 1.0)
        let graph = graph(
            vec![ArgumentSpec::leaf(arg(1, Side::Pro, 0.2))
                .with_child(arg(2, Side::Pro, 1.0).into())],
            Vec::new(),
        );
        let scores = score(&graph);
        // sub = 0.5 + 1.0 * 0.5 = 1.0; rr = 0.15 * 0.2 + 0.85 * 1.0
        assert_eq!(scores[0].sub_argument_score, Some(1.0));
        assert!((scores[0].reason_rank - 0.88).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_children_pull_toward_half() {
        let graph = graph(
            vec![ArgumentSpec::leaf(arg(1, Side::Pro, 1.0))
                .with_child(arg(2, Side::Pro, 0.7).into())
                .with_child(arg(3, Side::Con, 0.7).into())],
            Vec::new(),
        );
        let scores = score(&graph);
        assert_eq!(scores[0].sub_argument_score, Some(0.5));
        assert!((scores[0].reason_rank - (0.15 + 0.85 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_evidence_factor_and_corroboration() {
        let live = Evidence::new(EvidenceId::from_value(1), QualityTier::T1)
            .with_status(VerificationStatus::Verified);
        let mut dead = Evidence::new(EvidenceId::from_value(2), QualityTier::T1);
        dead.falsify();

        let graph = graph(
            vec![arg(1, Side::Pro, 0.5)
                .with_evidence(live.id)
                .with_evidence(dead.id)
                .into()],
            vec![live, dead],
        );
        let scores = score(&graph);

        assert_eq!(scores[0].evidence_factor, 0.5);
        assert!(scores[0].corroboration_boost > 0.0);
        assert!(scores[0].truth_score > 0.5);
        assert!((scores[0].raw_impact - scores[0].reason_rank * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_deep_chain_without_recursion() {
        let mut tree = ArgumentTree::new();
        let mut parent = None;
        for id in 1..=5_000u128 {
            tree.attach(parent, arg(id, Side::Pro, 0.9)).unwrap();
            parent = Some(ArgumentId::from_value(id));
        }
        let graph = ClaimGraph::new(
            Claim::new(ClaimId::from_value(1), "deep"),
            tree,
            Vec::<Evidence>::new(),
        )
        .unwrap();

        let scores = score(&graph);
        assert_eq!(scores.len(), 5_000);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.reason_rank)));
    }

    #[test]
    fn test_parallel_levels_match_serial() {
        let mut root = ArgumentSpec::leaf(arg(1, Side::Pro, 0.4));
        for id in 2..200u128 {
            let side = if id % 3 == 0 { Side::Con } else { Side::Pro };
            root = root.with_child(arg(id, side, (id % 10) as f64 / 10.0).into());
        }
        let graph = graph(vec![root], Vec::new());
        let corroboration = CorroborationConfig::default();

        let serial = PropagationConfig {
            parallel_threshold: usize::MAX,
            ..PropagationConfig::default()
        };
        let parallel = PropagationConfig {
            parallel_threshold: 1,
            ..PropagationConfig::default()
        };
        let a = Propagator::new(&serial, &corroboration).score_tree(&graph, &assessments(&graph));
        let b = Propagator::new(&parallel, &corroboration).score_tree(&graph, &assessments(&graph));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rescore_touches_only_path() {
        let graph = graph(
            vec![
                ArgumentSpec::leaf(arg(1, Side::Pro, 0.5))
                    .with_child(ArgumentSpec::leaf(arg(2, Side::Pro, 0.5)).with_child(arg(3, Side::Con, 0.9).into())),
                arg(4, Side::Con, 0.5).into(),
            ],
            Vec::new(),
        );
        let config = PropagationConfig::default();
        let corroboration = CorroborationConfig::default();
        let propagator = Propagator::new(&config, &corroboration);
        let assessments = assessments(&graph);

        let mut scores = propagator.score_tree(&graph, &assessments);
        let full = scores.clone();
        let deepest = graph.tree().find(ArgumentId::from_value(3)).unwrap();
        let rescored = propagator.rescore(&graph, &assessments, &mut scores, [deepest]);

        assert_eq!(rescored, 3);
        assert_eq!(scores, full);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use reasonrank_domain::{Argument, ArgumentTree, Claim, ClaimId};

    proptest! {
        #[test]
        fn reason_rank_is_bounded(
            nodes in prop::collection::vec(
                (any::<bool>(), 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..3.0, any::<prop::sample::Index>()),
                1..40,
            ),
        ) {
            let mut tree = ArgumentTree::new();
            for (i, (pro, truth, linkage, importance, parent)) in nodes.iter().enumerate() {
                let side = if *pro { Side::Pro } else { Side::Con };
                let argument = Argument::new(ArgumentId::from_value(i as u128 + 1), "x", side)
                    .with_truth(*truth)
                    .with_linkage(*linkage)
                    .with_importance(*importance);
                // Index i means "attach to the claim"
                let slot = parent.index(i + 1);
                let parent = (slot < i).then(|| ArgumentId::from_value(slot as u128 + 1));
                tree.attach(parent, argument).unwrap();
            }
            let graph = ClaimGraph::new(Claim::new(ClaimId::from_value(1), "c"), tree, Vec::<Evidence>::new()).unwrap();
            let assessments: Vec<NodeAssessment> = (0..graph.tree().len())
                .map(|_| NodeAssessment {
                    uniqueness: 1.0,
                    novelty_multiplier: 1.0,
                    effective_contribution: 1.0,
                    derived: false,
                    similarity_pairs: Vec::new(),
                })
                .collect();

            let config = PropagationConfig::default();
            let corroboration = CorroborationConfig::default();
            let scores = Propagator::new(&config, &corroboration).score_tree(&graph, &assessments);
            for score in &scores {
                prop_assert!((0.0..=1.0).contains(&score.reason_rank));
                prop_assert!(score.raw_impact >= 0.0);
            }
        }
    }
}
