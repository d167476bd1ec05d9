//! Duplication-adjusted scoring of sibling arguments

use crate::cluster::{apply_amplification_cap, cluster_arguments, ArgumentCluster};
use crate::config::DedupConfig;
use crate::normalize::{jaccard_similarity, normalize_claim, TokenSet};
use crate::novelty::novelty_multiplier;
use crate::similarity::{
    blend_similarity_layers, ngram_similarity, uniqueness_from_similarities, SimilarityPair,
};
use reasonrank_domain::{unit_clamp, Argument, ArgumentId};
use tracing::debug;

/// Weight an argument actually contributes after duplication and novelty
pub fn effective_contribution(base_score: f64, uniqueness: f64, novelty_multiplier: f64) -> f64 {
    base_score.max(0.0) * unit_clamp(uniqueness) * novelty_multiplier.max(0.0)
}

/// Duplication-adjusted result for one argument
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArgument {
    /// Argument identifier
    pub id: ArgumentId,

    /// Base score before adjustment
    pub base_score: f64,

    /// Submission time in milliseconds
    pub submitted_at: u64,

    /// 1 minus the highest blended similarity to any earlier argument
    pub uniqueness_score: f64,

    /// Freshness multiplier at scoring time
    pub novelty_multiplier: f64,

    /// `base_score × uniqueness_score × novelty_multiplier`
    pub effective_contribution: f64,

    /// Similarity to every earlier-processed argument
    pub similarity_pairs: Vec<SimilarityPair>,
}

impl ScoredArgument {
    /// Highest blended similarity to an earlier argument, if any
    pub fn max_similarity(&self) -> Option<f64> {
        self.similarity_pairs
            .iter()
            .map(|pair| pair.combined)
            .reduce(f64::max)
    }

    /// Earlier arguments this one is a mechanical duplicate of
    pub fn mechanical_duplicates(&self) -> impl Iterator<Item = ArgumentId> + '_ {
        self.similarity_pairs
            .iter()
            .filter(|pair| pair.mechanical_duplicate)
            .map(|pair| pair.other)
    }

    /// Scale uniqueness and contribution by the same factor
    pub(crate) fn scale(&mut self, factor: f64) {
        self.uniqueness_score = unit_clamp(self.uniqueness_score * factor);
        self.effective_contribution = effective_contribution(
            self.base_score,
            self.uniqueness_score,
            self.novelty_multiplier,
        );
    }
}

/// Scores uniqueness and effective contribution for groups of arguments
/// that share a parent
///
/// Uniqueness is always relative to arguments submitted earlier, so the
/// group is processed oldest-first (ties broken by id) while results come
/// back in the caller's order.
#[derive(Debug, Clone, Default)]
pub struct DuplicationScorer {
    config: DedupConfig,
}

impl DuplicationScorer {
    /// Create a scorer with the given configuration
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Compare two arguments across all similarity layers
    pub fn compare(&self, argument: &Argument, earlier: &Argument) -> SimilarityPair {
        self.compare_tokens(
            argument,
            &normalize_claim(&argument.claim),
            earlier,
            &normalize_claim(&earlier.claim),
        )
    }

    fn compare_tokens(
        &self,
        argument: &Argument,
        tokens: &TokenSet,
        earlier: &Argument,
        earlier_tokens: &TokenSet,
    ) -> SimilarityPair {
        let layer1 = jaccard_similarity(tokens, earlier_tokens);
        let layer2 = argument.semantic_similarity_to(earlier).or_else(|| {
            self.config
                .ngram_fallback
                .then(|| ngram_similarity(&argument.claim, &earlier.claim))
        });
        let layer3 = argument.community_score_with(earlier);
        let combined = blend_similarity_layers(
            layer1,
            layer2,
            layer3,
            &self.config.weights,
            self.config.mechanical_threshold,
        );

        SimilarityPair {
            other: earlier.id,
            layer1,
            layer2,
            layer3,
            combined,
            mechanical_duplicate: layer1 >= self.config.mechanical_threshold,
        }
    }

    /// Score a group of sibling arguments
    ///
    /// The result has one entry per input, in input order.
    pub fn score_arguments(&self, arguments: &[&Argument], now_ms: u64) -> Vec<ScoredArgument> {
        let tokens: Vec<TokenSet> = arguments
            .iter()
            .map(|argument| normalize_claim(&argument.claim))
            .collect();

        let mut order: Vec<usize> = (0..arguments.len()).collect();
        order.sort_by_key(|&i| (arguments[i].submitted_at, arguments[i].id));

        let mut results: Vec<Option<ScoredArgument>> = vec![None; arguments.len()];
        for (rank, &i) in order.iter().enumerate() {
            let argument = arguments[i];
            let pairs: Vec<SimilarityPair> = order[..rank]
                .iter()
                .map(|&j| self.compare_tokens(argument, &tokens[i], arguments[j], &tokens[j]))
                .collect();

            let combined: Vec<f64> = pairs.iter().map(|pair| pair.combined).collect();
            let uniqueness = uniqueness_from_similarities(&combined);
            let novelty = novelty_multiplier(
                argument.submitted_at,
                uniqueness,
                now_ms,
                &self.config.novelty,
            );

            results[i] = Some(ScoredArgument {
                id: argument.id,
                base_score: argument.base_score,
                submitted_at: argument.submitted_at,
                uniqueness_score: uniqueness,
                novelty_multiplier: novelty,
                effective_contribution: effective_contribution(
                    argument.base_score,
                    uniqueness,
                    novelty,
                ),
                similarity_pairs: pairs,
            });
        }

        let scored: Vec<ScoredArgument> = results.into_iter().flatten().collect();
        debug!(arguments = scored.len(), "Scored sibling group for duplication");
        scored
    }

    /// Cluster scored arguments and apply the amplification cap
    ///
    /// Capped members have their uniqueness and contribution reduced in
    /// place; cluster scores reflect the capped contributions.
    pub fn cluster(&self, scored: &mut [ScoredArgument]) -> Vec<ArgumentCluster> {
        let mut clusters = cluster_arguments(scored, self.config.cluster_threshold);
        if let Some(cap) = self.config.cluster_amplification_cap {
            apply_amplification_cap(scored, &mut clusters, cap);
        }
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reasonrank_domain::Side;

    const HOUR: u64 = 3_600_000;

    fn argument(id: u128, claim: &str, submitted_at: u64) -> Argument {
        Argument::new(ArgumentId::from_value(id), claim, Side::Pro).submitted_at(submitted_at)
    }

    #[test]
    fn test_first_argument_is_fully_unique() {
        let scorer = DuplicationScorer::default();
        let only = argument(1, "Public transit reduces congestion", 0);
        let scored = scorer.score_arguments(&[&only], 0);

        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].uniqueness_score, 1.0);
        assert_eq!(scored[0].novelty_multiplier, 1.25);
        assert_eq!(scored[0].effective_contribution, 1.25);
        assert!(scored[0].max_similarity().is_none());
    }

    #[test]
    fn test_mechanical_duplicate_contributes_nothing() {
        let scorer = DuplicationScorer::default();
        let original = argument(1, "Tax rates should be lowered", 0);
        let restated = argument(2, "Tax rates should be reduced", HOUR);
        let scored = scorer.score_arguments(&[&original, &restated], HOUR);

        assert_eq!(scored[1].uniqueness_score, 0.0);
        assert_eq!(scored[1].effective_contribution, 0.0);
        assert_eq!(scored[1].novelty_multiplier, 1.0);
        assert_eq!(
            scored[1].mechanical_duplicates().collect::<Vec<_>>(),
            vec![original.id]
        );
    }

    #[test]
    fn test_results_preserve_input_order() {
        let scorer = DuplicationScorer::default();
        let newer = argument(1, "Taxes should be raised", 2 * HOUR);
        let older = argument(2, "Tax should be increased", HOUR);
        let scored = scorer.score_arguments(&[&newer, &older], 2 * HOUR);

        assert_eq!(scored[0].id, newer.id);
        assert_eq!(scored[1].id, older.id);
        // The older submission keeps full credit even though it was listed second
        assert_eq!(scored[1].uniqueness_score, 1.0);
        assert_eq!(scored[0].uniqueness_score, 0.0);
    }

    #[test]
    fn test_same_timestamp_ties_break_by_id() {
        let scorer = DuplicationScorer::default();
        let b = argument(2, "Ban plastic bags", 0);
        let a = argument(1, "Prohibit plastic bags", 0);
        let scored = scorer.score_arguments(&[&b, &a], 0);

        assert_eq!(scored[1].uniqueness_score, 1.0);
        assert_eq!(scored[0].uniqueness_score, 0.0);
    }

    #[test]
    fn test_semantic_layer_discounts_paraphrase() {
        let scorer = DuplicationScorer::default();
        let first = argument(1, "He cannot focus on briefings", 0);
        let second = argument(2, "His attention span is short", HOUR)
            .with_semantic_similarity(ArgumentId::from_value(1), 0.7);
        let scored = scorer.score_arguments(&[&first, &second], HOUR);

        let pair = &scored[1].similarity_pairs[0];
        assert_eq!(pair.layer1, 0.0);
        assert_eq!(pair.layer2, Some(0.7));
        // (0.0 * 0.4 + 0.7 * 0.6) / 1.0
        assert!((pair.combined - 0.42).abs() < 1e-12);
        assert!((scored[1].uniqueness_score - 0.58).abs() < 1e-12);
    }

    #[test]
    fn test_ngram_fallback_fills_missing_semantic_layer() {
        let config = DedupConfig {
            ngram_fallback: true,
            ..DedupConfig::default()
        };
        let scorer = DuplicationScorer::new(config);
        let first = argument(1, "zebra crossings save lives", 0);
        let second = argument(2, "zebra crossings save many lives", HOUR);

        let pair = scorer.compare(&second, &first);
        assert!(pair.layer2.is_some());

        let without = DuplicationScorer::default().compare(&second, &first);
        assert!(without.layer2.is_none());
    }

    #[test]
    fn test_unrelated_arguments_stay_unique() {
        let scorer = DuplicationScorer::default();
        let a = argument(1, "Solar panels are cheap", 0);
        let b = argument(2, "Wind farms harm birds", HOUR);
        let c = argument(3, "Nuclear plants need water", 2 * HOUR);
        let scored = scorer.score_arguments(&[&a, &b, &c], 2 * HOUR);

        assert!(scored.iter().all(|s| s.uniqueness_score == 1.0));
        assert_eq!(scored[2].similarity_pairs.len(), 2);
    }

    #[test]
    fn test_cluster_applies_cap() {
        let scorer = DuplicationScorer::default();
        let original = argument(1, "Tax rates should be lowered", 0);
        let mut clones = Vec::new();
        for i in 0..20u128 {
            clones.push(
                argument(10 + i, &format!("Tax rates should be lowered now {i}"), HOUR)
                    .with_semantic_similarity(ArgumentId::from_value(1), 0.92),
            );
        }
        let mut all: Vec<&Argument> = vec![&original];
        all.extend(clones.iter());

        let mut scored = scorer.score_arguments(&all, HOUR);
        let clusters = scorer.cluster(&mut scored);

        let big = clusters
            .iter()
            .find(|c| c.member_ids.len() > 1)
            .expect("clones cluster with the original");
        let total: f64 = scored.iter().map(|s| s.uniqueness_score).sum();
        assert!(big.capped);
        assert!(total <= 2.0 + 1e-9);
    }
}
