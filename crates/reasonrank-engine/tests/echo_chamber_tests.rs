//! Integration tests for argument flooding
//!
//! A claim flooded with restatements of one argument must not gain much
//! more than that argument alone would give it.

use reasonrank_domain::{
    Argument, ArgumentId, ArgumentSpec, ArgumentTree, Claim, ClaimGraph, ClaimId, Evidence, Side,
};
use reasonrank_engine::{EngineConfig, ReasonRankEngine, ScoredClaim};

const NOW: u64 = 1_700_000_000_000;
const ORIGINAL: &str = "Tax rates should be lowered";

fn original() -> Argument {
    Argument::new(ArgumentId::from_value(1), ORIGINAL, Side::Pro)
        .with_truth(0.8)
        .submitted_at(NOW - 86_400_000)
}

fn rebuttal() -> Argument {
    Argument::new(ArgumentId::from_value(1_000), "Deficits would balloon", Side::Con)
        .with_truth(0.8)
        .submitted_at(NOW - 86_400_000)
}

/// Restatements marked as 0.95 semantically similar to the original
fn clones(count: u128) -> Vec<Argument> {
    (2..count + 2)
        .map(|id| {
            Argument::new(
                ArgumentId::from_value(id),
                format!("{ORIGINAL} now {id}"),
                Side::Pro,
            )
            .with_truth(0.8)
            .with_semantic_similarity(ArgumentId::from_value(1), 0.95)
            .submitted_at(NOW - 86_400_000 + id as u64 * 1_000)
        })
        .collect()
}

fn evaluate(engine: &ReasonRankEngine, arguments: Vec<Argument>) -> ScoredClaim {
    let specs: Vec<ArgumentSpec> = arguments.into_iter().map(ArgumentSpec::from).collect();
    let graph = ClaimGraph::new(
        Claim::new(ClaimId::from_value(1), "Taxes should be cut"),
        ArgumentTree::from_specs(specs).unwrap(),
        Vec::<Evidence>::new(),
    )
    .unwrap();
    engine.evaluate(graph, NOW)
}

fn flooded(engine: &ReasonRankEngine) -> ScoredClaim {
    let mut arguments = vec![original(), rebuttal()];
    arguments.extend(clones(100));
    evaluate(engine, arguments)
}

#[test]
fn test_hundred_clones_stay_within_three_times_single() {
    let engine = ReasonRankEngine::default();
    let single = evaluate(&engine, vec![original(), rebuttal()]);
    let flood = flooded(&engine);

    let single_strength = single.belief().pro_argument_strength;
    let flood_strength = flood.belief().pro_argument_strength;
    assert!(single_strength > 0.0);
    assert!(
        flood_strength <= 3.0 * single_strength + 1e-9,
        "flood {flood_strength} vs single {single_strength}"
    );

    // With the default cap of 2.0 the cluster is worth two originals
    assert!(flood_strength <= 2.0 * single_strength + 1e-9);
    assert!(flood.truth_score() < 0.75);
    assert!(flood.truth_score() > single.truth_score());
}

#[test]
fn test_flood_forms_one_capped_cluster() {
    let engine = ReasonRankEngine::default();
    let flood = flooded(&engine);

    // The rebuttal stands alone in its own cluster
    let clusters: Vec<_> = flood.clusters().filter(|c| c.len() > 1).collect();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 101);
    assert_eq!(clusters[0].representative_id, ArgumentId::from_value(1));
    assert!(clusters[0].capped);
    assert_eq!(flood.assessment().clusters_capped(), 1);

    let original = flood.score(ArgumentId::from_value(1)).unwrap();
    assert_eq!(original.uniqueness_score, 1.0);
    for id in 2..102u128 {
        let clone = flood.score(ArgumentId::from_value(id)).unwrap();
        assert!(clone.uniqueness_score < 0.05);
    }
}

#[test]
fn test_without_cap_flood_dominates() {
    let mut config = EngineConfig::default();
    config.dedup.cluster_amplification_cap = None;
    let engine = ReasonRankEngine::new(config).unwrap();

    let single = evaluate(&engine, vec![original(), rebuttal()]);
    let flood = flooded(&engine);
    assert!(flood.belief().pro_argument_strength > 3.0 * single.belief().pro_argument_strength);
}

#[test]
fn test_exact_copies_add_nothing() {
    let engine = ReasonRankEngine::default();
    let single = evaluate(&engine, vec![original(), rebuttal()]);

    let mut arguments = vec![original(), rebuttal()];
    arguments.extend((2..52u128).map(|id| {
        Argument::new(ArgumentId::from_value(id), "tax RATES should be lowered!", Side::Pro)
            .with_truth(0.8)
            .submitted_at(NOW - 1_000 + id as u64)
    }));
    let copies = evaluate(&engine, arguments);

    assert!((copies.truth_score() - single.truth_score()).abs() < 1e-12);
    for score in copies.scores().iter().filter(|s| s.id.value() >= 2 && s.id.value() < 52) {
        assert_eq!(score.uniqueness_score, 0.0);
        assert_eq!(score.raw_impact, 0.0);
    }
}

#[test]
fn test_claim_truth_stays_bounded() {
    let engine = ReasonRankEngine::default();
    let all_pro = evaluate(&engine, clones(20));
    let all_con = evaluate(&engine, vec![rebuttal().with_truth(1.0)]);

    assert_eq!(all_pro.truth_score(), 0.99);
    assert_eq!(all_con.truth_score(), 0.01);
    for score in all_pro.scores() {
        assert!((0.0..=1.0).contains(&score.uniqueness_score));
        assert!(score.effective_contribution <= 1.25 + 1e-12);
    }
}
