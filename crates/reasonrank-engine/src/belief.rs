//! Claim-level belief aggregation

use crate::config::PropagationConfig;
use crate::propagation::ArgumentScore;
use reasonrank_dedup::{corroboration_boost, CorroborationConfig};
use reasonrank_domain::{ClaimGraph, ConfidenceInterval, Side};

/// Aggregate belief in a claim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefScore {
    /// Truth score, within the configured claim bounds
    pub truth_score: f64,

    /// Uncertainty band around `truth_score`
    pub confidence_interval: ConfidenceInterval,

    /// Sum of the raw impact of direct pro arguments
    pub pro_argument_strength: f64,

    /// Sum of the raw impact of direct con arguments
    pub con_argument_strength: f64,

    /// Corroboration from live evidence attached to the claim itself
    pub supporting_evidence_score: f64,

    /// Direct arguments plus live claim-level evidence
    pub support_count: usize,
}

impl BeliefScore {
    /// Belief in a claim nobody has argued about yet
    pub fn undecided(config: &PropagationConfig) -> Self {
        let truth = 0.5f64.clamp(config.min_claim_truth, config.max_claim_truth);
        Self {
            truth_score: truth,
            confidence_interval: interval(truth, 0, config),
            pro_argument_strength: 0.0,
            con_argument_strength: 0.0,
            supporting_evidence_score: 0.0,
            support_count: 0,
        }
    }
}

/// Aggregate a claim's direct arguments and evidence into a belief score
///
/// `scores` must be indexed like the claim's argument arena.
/// `truth = clamp(pro / (pro + con) + evidence_weight × evidence, min, max)`,
/// with the ratio taken as 0.5 when neither side has any impact.
pub fn score_protocol_belief(
    graph: &ClaimGraph,
    scores: &[ArgumentScore],
    config: &PropagationConfig,
    corroboration: &CorroborationConfig,
) -> BeliefScore {
    let tree = graph.tree();
    let (mut pro, mut con) = (0.0, 0.0);
    for root in tree.roots() {
        let Some(score) = scores.get(root.index()) else {
            continue;
        };
        match score.side {
            Side::Pro => pro += score.raw_impact,
            Side::Con => con += score.raw_impact,
        }
    }

    let live_evidence: Vec<_> = graph
        .claim_evidence()
        .into_iter()
        .filter(|e| e.is_live())
        .collect();
    let supporting_evidence_score = corroboration_boost(live_evidence.iter().copied(), corroboration);

    let total = pro + con;
    let base = if total > 0.0 { pro / total } else { 0.5 };
    let raw = base + config.evidence_weight * supporting_evidence_score;
    let truth_score = if raw.is_nan() {
        0.5
    } else {
        raw.clamp(config.min_claim_truth, config.max_claim_truth)
    };

    let support_count = tree.roots().len() + live_evidence.len();
    BeliefScore {
        truth_score,
        confidence_interval: interval(truth_score, support_count, config),
        pro_argument_strength: pro,
        con_argument_strength: con,
        supporting_evidence_score,
        support_count,
    }
}

fn interval(truth: f64, support_count: usize, config: &PropagationConfig) -> ConfidenceInterval {
    let margin = config.confidence_z * (truth * (1.0 - truth) / (support_count as f64 + 1.0)).sqrt();
    ConfidenceInterval::around(truth, margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::NodeAssessment;
    use crate::propagation::Propagator;
    use reasonrank_domain::{
        Argument, ArgumentId, ArgumentSpec, ArgumentTree, Claim, ClaimId, Evidence, EvidenceId,
        QualityTier, VerificationStatus,
    };

    fn belief(claim: Claim, specs: Vec<ArgumentSpec>, evidence: Vec<Evidence>) -> BeliefScore {
        let graph = ClaimGraph::new(claim, ArgumentTree::from_specs(specs).unwrap(), evidence).unwrap();
        let assessments: Vec<NodeAssessment> = graph
            .tree()
            .iter()
            .map(|(_, n)| NodeAssessment {
                uniqueness: n.argument.uniqueness.value(),
                novelty_multiplier: 1.0,
                effective_contribution: n.argument.base_score,
                derived: false,
                similarity_pairs: Vec::new(),
            })
            .collect();
        let config = PropagationConfig::default();
        let corroboration = CorroborationConfig::default();
        let scores = Propagator::new(&config, &corroboration).score_tree(&graph, &assessments);
        score_protocol_belief(&graph, &scores, &config, &corroboration)
    }

    fn claim() -> Claim {
        Claim::new(ClaimId::from_value(1), "Cities should ban cars")
    }

    fn arg(id: u128, side: Side, truth: f64) -> ArgumentSpec {
        Argument::new(ArgumentId::from_value(id), format!("a{id}"), side)
            .with_truth(truth)
            .into()
    }

    #[test]
    fn test_no_arguments_is_half() {
        let score = belief(claim(), Vec::new(), Vec::new());
        assert_eq!(score.truth_score, 0.5);
        assert_eq!(score.support_count, 0);
        assert_eq!(score, BeliefScore::undecided(&PropagationConfig::default()));
    }

    #[test]
    fn test_pro_con_ratio() {
        let score = belief(
            claim(),
            vec![arg(1, Side::Pro, 0.9), arg(2, Side::Con, 0.3)],
            Vec::new(),
        );
        assert!((score.pro_argument_strength - 0.9).abs() < 1e-12);
        assert!((score.con_argument_strength - 0.3).abs() < 1e-12);
        assert!((score.truth_score - 0.75).abs() < 1e-12);
        assert!(score.confidence_interval.contains(score.truth_score));
    }

    #[test]
    fn test_equal_sides_are_half() {
        let score = belief(
            claim(),
            vec![arg(1, Side::Pro, 0.6), arg(2, Side::Con, 0.6)],
            Vec::new(),
        );
        assert!((score.truth_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_truth_is_bounded_away_from_certainty() {
        let score = belief(claim(), vec![arg(1, Side::Pro, 1.0)], Vec::new());
        assert_eq!(score.truth_score, 0.99);

        let score = belief(claim(), vec![arg(1, Side::Con, 1.0)], Vec::new());
        assert_eq!(score.truth_score, 0.01);
    }

    #[test]
    fn test_claim_evidence_adds_weighted_term() {
        let study = Evidence::new(EvidenceId::from_value(7), QualityTier::T1)
            .with_status(VerificationStatus::Verified);
        let score = belief(claim().with_evidence(study.id), Vec::new(), vec![study]);

        assert!(score.supporting_evidence_score > 0.0);
        assert!((score.truth_score - (0.5 + score.supporting_evidence_score)).abs() < 1e-12);
        assert_eq!(score.support_count, 1);
    }

    #[test]
    fn test_interval_narrows_with_support() {
        let few = belief(claim(), vec![arg(1, Side::Pro, 0.6), arg(2, Side::Con, 0.4)], Vec::new());
        let many = belief(
            claim(),
            (1..=20)
                .map(|id| arg(id, if id % 2 == 0 { Side::Pro } else { Side::Con }, 0.5))
                .collect(),
            Vec::new(),
        );
        assert!(many.confidence_interval.width() < few.confidence_interval.width());
    }
}
