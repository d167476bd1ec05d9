//! Duplication stage
//!
//! Runs the duplication scorer over every (parent, side) sibling group and
//! settles each argument's uniqueness before propagation. Uniqueness the
//! caller supplied always wins over the derived value.

use crate::config::EngineConfig;
use reasonrank_dedup::{
    effective_contribution, novelty_multiplier, ArgumentCluster, DuplicationScorer,
    ScoredArgument, SimilarityPair,
};
use reasonrank_domain::{Argument, ClaimGraph, NodeIndex, Side, SiblingGroup, Uniqueness};
use std::collections::BTreeMap;

/// Sibling group key: shared parent (`None` = the claim) and side
pub type GroupKey = (Option<NodeIndex>, Side);

/// Settled duplication inputs for one argument
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAssessment {
    /// Uniqueness used by propagation
    pub uniqueness: f64,

    /// Novelty multiplier at evaluation time
    pub novelty_multiplier: f64,

    /// `base_score × uniqueness × novelty_multiplier`
    pub effective_contribution: f64,

    /// Whether `uniqueness` was derived rather than supplied
    pub derived: bool,

    /// Similarity to earlier siblings
    pub similarity_pairs: Vec<SimilarityPair>,
}

impl NodeAssessment {
    fn supplied(argument: &Argument, uniqueness: f64, config: &EngineConfig, now_ms: u64) -> Self {
        let novelty = novelty_multiplier(
            argument.submitted_at,
            uniqueness,
            now_ms,
            &config.dedup.novelty,
        );
        Self {
            uniqueness,
            novelty_multiplier: novelty,
            effective_contribution: effective_contribution(argument.base_score, uniqueness, novelty),
            derived: false,
            similarity_pairs: Vec::new(),
        }
    }

    fn from_scored(argument: &Argument, scored: ScoredArgument, config: &EngineConfig, now_ms: u64) -> Self {
        match argument.uniqueness {
            Uniqueness::Supplied(value) => Self {
                similarity_pairs: scored.similarity_pairs,
                ..Self::supplied(argument, value, config, now_ms)
            },
            Uniqueness::Unassessed => Self {
                uniqueness: scored.uniqueness_score,
                novelty_multiplier: scored.novelty_multiplier,
                effective_contribution: scored.effective_contribution,
                derived: true,
                similarity_pairs: scored.similarity_pairs,
            },
        }
    }
}

/// Duplication results for one claim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    /// Per-node results, indexed like the argument arena
    pub nodes: Vec<NodeAssessment>,

    /// Clusters per sibling group
    pub groups: BTreeMap<GroupKey, Vec<ArgumentCluster>>,
}

impl Assessment {
    /// Every cluster, claim-level groups first
    pub fn clusters(&self) -> impl Iterator<Item = &ArgumentCluster> {
        self.groups.values().flatten()
    }

    /// Number of clusters the amplification cap reduced
    pub fn clusters_capped(&self) -> usize {
        self.clusters().filter(|c| c.capped).count()
    }
}

/// Assess every sibling group of a claim
pub(crate) fn assess_graph(
    graph: &ClaimGraph,
    scorer: &DuplicationScorer,
    config: &EngineConfig,
    now_ms: u64,
) -> Assessment {
    let tree = graph.tree();
    let mut nodes: Vec<Option<NodeAssessment>> = vec![None; tree.len()];
    let mut groups = BTreeMap::new();

    for group in tree.sibling_groups() {
        let (members, clusters) = assess_group(graph, &group, scorer, config, now_ms);
        for (node, assessment) in members {
            nodes[node.index()] = Some(assessment);
        }
        groups.insert((group.parent, group.side), clusters);
    }

    Assessment {
        nodes: nodes.into_iter().flatten().collect(),
        groups,
    }
}

/// Assess a single sibling group
pub(crate) fn assess_group(
    graph: &ClaimGraph,
    group: &SiblingGroup,
    scorer: &DuplicationScorer,
    config: &EngineConfig,
    now_ms: u64,
) -> (Vec<(NodeIndex, NodeAssessment)>, Vec<ArgumentCluster>) {
    let tree = graph.tree();
    let arguments: Vec<&Argument> = group.members.iter().map(|&n| tree.argument(n)).collect();

    if !config.assess_duplicates {
        let members = group
            .members
            .iter()
            .zip(&arguments)
            .map(|(&node, argument)| {
                let uniqueness = argument.uniqueness.value();
                (node, NodeAssessment::supplied(argument, uniqueness, config, now_ms))
            })
            .collect();
        return (members, Vec::new());
    }

    let mut scored = scorer.score_arguments(&arguments, now_ms);
    let clusters = scorer.cluster(&mut scored);
    let members = group
        .members
        .iter()
        .zip(&arguments)
        .zip(scored)
        .map(|((&node, argument), scored)| {
            (node, NodeAssessment::from_scored(argument, scored, config, now_ms))
        })
        .collect();
    (members, clusters)
}
