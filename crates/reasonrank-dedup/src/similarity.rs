//! Similarity layers and their blend
//!
//! Layer 1 is mechanical (normalized token overlap), Layer 2 is an
//! externally supplied semantic score and Layer 3 a community verdict.

use crate::config::LayerWeights;
use crate::normalize::{jaccard_similarity, normalize_claim};
use reasonrank_domain::{unit_clamp, ArgumentId};
use std::collections::HashSet;

/// Layer-1 similarity between two claim texts
pub fn mechanical_similarity(a: &str, b: &str) -> f64 {
    jaccard_similarity(&normalize_claim(a), &normalize_claim(b))
}

/// Whether two claim texts are the same claim after normalization
pub fn is_mechanical_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    mechanical_similarity(a, b) >= threshold
}

/// Blend the available similarity layers into one score
///
/// A mechanical duplicate (`layer1 >= mechanical_threshold`) is always
/// fully similar. Otherwise the present layers are averaged with their
/// weights renormalized over the present layers only.
///
/// # Examples
///
/// ```
/// use reasonrank_dedup::{blend_similarity_layers, LayerWeights};
///
/// let weights = LayerWeights::default();
/// assert_eq!(blend_similarity_layers(0.9, Some(0.1), None, &weights, 0.85), 1.0);
///
/// // Only Layer 1 present
/// assert_eq!(blend_similarity_layers(0.5, None, None, &weights, 0.85), 0.5);
/// ```
pub fn blend_similarity_layers(
    layer1: f64,
    layer2: Option<f64>,
    layer3: Option<f64>,
    weights: &LayerWeights,
    mechanical_threshold: f64,
) -> f64 {
    let layer1 = unit_clamp(layer1);
    if layer1 >= mechanical_threshold {
        return 1.0;
    }

    let mut weighted = layer1 * weights.layer1;
    let mut total_weight = weights.layer1;
    for (score, weight) in [(layer2, weights.layer2), (layer3, weights.layer3)] {
        if let Some(score) = score {
            weighted += unit_clamp(score) * weight;
            total_weight += weight;
        }
    }

    if total_weight <= 0.0 {
        return layer1;
    }
    unit_clamp(weighted / total_weight)
}

/// Uniqueness relative to every earlier-processed argument
///
/// The first argument has nothing to compare against and is fully unique.
pub fn uniqueness_from_similarities(prior_similarities: &[f64]) -> f64 {
    prior_similarities
        .iter()
        .copied()
        .map(unit_clamp)
        .fold(None, |max: Option<f64>, s| Some(max.map_or(s, |m| m.max(s))))
        .map_or(1.0, |max| unit_clamp(1.0 - max))
}

/// Share of an argument's weight that survives a given similarity
pub fn contribution_factor(similarity: f64) -> f64 {
    unit_clamp(1.0 - similarity)
}

/// Character-trigram Jaccard similarity of two raw texts
///
/// Stands in for a semantic score when none was supplied. Texts shorter
/// than three characters have no grams.
pub fn ngram_similarity(a: &str, b: &str) -> f64 {
    fn trigrams(text: &str) -> HashSet<String> {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        chars.windows(3).map(|w| w.iter().collect()).collect()
    }

    let left = trigrams(a);
    let right = trigrams(b);
    match (left.is_empty(), right.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let shared = left.intersection(&right).count();
            shared as f64 / (left.len() + right.len() - shared) as f64
        }
    }
}

/// Pairwise similarity between an argument and an earlier one
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityPair {
    /// The earlier argument compared against
    pub other: ArgumentId,

    /// Mechanical similarity
    pub layer1: f64,

    /// Semantic similarity, when supplied (or derived by the n-gram fallback)
    pub layer2: Option<f64>,

    /// Community verdict similarity, when supplied
    pub layer3: Option<f64>,

    /// Blended similarity
    pub combined: f64,

    /// Layer 1 alone crossed the mechanical threshold
    pub mechanical_duplicate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.85;

    #[test]
    fn test_mechanical_duplicate_detection() {
        assert!(is_mechanical_duplicate(
            "Taxes should be raised",
            "Tax should be increased",
            THRESHOLD
        ));
        assert!(!is_mechanical_duplicate(
            "Taxes should be raised",
            "Cities need more parks",
            THRESHOLD
        ));
    }

    #[test]
    fn test_blend_short_circuits_mechanical_duplicates() {
        let weights = LayerWeights::default();
        assert_eq!(
            blend_similarity_layers(0.85, Some(0.0), Some(0.0), &weights, THRESHOLD),
            1.0
        );
    }

    #[test]
    fn test_blend_renormalizes_present_layers() {
        let weights = LayerWeights::default();
        // (0.5 * 0.4 + 1.0 * 0.6) / 1.0
        let blended = blend_similarity_layers(0.5, Some(1.0), None, &weights, THRESHOLD);
        assert!((blended - 0.8).abs() < 1e-12);

        // (0.0 * 0.4 + 1.0 * 0.5) / 0.9
        let blended = blend_similarity_layers(0.0, None, Some(1.0), &weights, THRESHOLD);
        assert!((blended - 0.5 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_blend_clamps_out_of_range_layers() {
        let weights = LayerWeights::default();
        let blended = blend_similarity_layers(0.2, Some(7.0), Some(-3.0), &weights, THRESHOLD);
        assert!((0.0..=1.0).contains(&blended));
    }

    #[test]
    fn test_zero_weights_fall_back_to_layer1() {
        let weights = LayerWeights {
            layer1: 0.0,
            layer2: 0.0,
            layer3: 0.0,
        };
        assert_eq!(blend_similarity_layers(0.3, None, None, &weights, THRESHOLD), 0.3);
    }

    #[test]
    fn test_uniqueness_from_similarities() {
        assert_eq!(uniqueness_from_similarities(&[]), 1.0);
        assert!((uniqueness_from_similarities(&[0.2, 0.7, 0.4]) - 0.3).abs() < 1e-12);
        assert_eq!(uniqueness_from_similarities(&[1.0]), 0.0);
    }

    #[test]
    fn test_contribution_factor_bounds() {
        assert_eq!(contribution_factor(1.0), 0.0);
        assert_eq!(contribution_factor(0.0), 1.0);
        assert_eq!(contribution_factor(1.4), 0.0);
    }

    #[test]
    fn test_ngram_similarity() {
        assert_eq!(ngram_similarity("", ""), 1.0);
        assert_eq!(ngram_similarity("abc", ""), 0.0);
        assert_eq!(ngram_similarity("Raise taxes", "raise taxes"), 1.0);
        let partial = ngram_similarity("raise taxes now", "raise taxes later");
        assert!(partial > 0.3 && partial < 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn blend_is_bounded(
            l1 in -1.0f64..2.0,
            l2 in prop::option::of(-1.0f64..2.0),
            l3 in prop::option::of(-1.0f64..2.0),
        ) {
            let blended = blend_similarity_layers(l1, l2, l3, &LayerWeights::default(), THRESHOLD);
            prop_assert!((0.0..=1.0).contains(&blended));
        }

        #[test]
        fn uniqueness_is_bounded(similarities in prop::collection::vec(-1.0f64..2.0, 0..16)) {
            let uniqueness = uniqueness_from_similarities(&similarities);
            prop_assert!((0.0..=1.0).contains(&uniqueness));
        }
    }

    const THRESHOLD: f64 = 0.85;
}
