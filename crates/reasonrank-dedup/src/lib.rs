//! ReasonRank Duplication Scorer
//!
//! Keeps argument volume from counting as argument weight.
//!
//! The scorer provides:
//! - Mechanical equivalence (token normalization, synonym and negated-antonym
//!   canonicalization, Jaccard similarity)
//! - Three-layer similarity blending (mechanical, semantic, community)
//! - Uniqueness and contribution discounts relative to earlier arguments
//! - A time-decaying novelty premium for genuinely new arguments
//! - Similarity clustering with an amplification cap
//! - Evidence corroboration boost with diminishing returns
//!
//! # Examples
//!
//! ```
//! use reasonrank_dedup::{DedupConfig, DuplicationScorer};
//! use reasonrank_domain::{Argument, ArgumentId, Side};
//!
//! let first = Argument::new(ArgumentId::from_value(1), "Tax rates should be lowered", Side::Pro)
//!     .submitted_at(1_000);
//! let restated = Argument::new(ArgumentId::from_value(2), "Tax rates should be reduced", Side::Pro)
//!     .submitted_at(2_000);
//!
//! let scorer = DuplicationScorer::new(DedupConfig::default());
//! let scored = scorer.score_arguments(&[&first, &restated], 2_000);
//!
//! assert_eq!(scored[0].uniqueness_score, 1.0);
//! assert_eq!(scored[1].uniqueness_score, 0.0);
//! ```

#![warn(missing_docs)]

mod cluster;
mod community;
mod config;
mod corroboration;
mod error;
mod normalize;
mod novelty;
mod scorer;
mod similarity;

pub use cluster::{apply_amplification_cap, cluster_arguments, ArgumentCluster};
pub use community::{resolve_verdict, EquivalenceDebate};
pub use config::{CorroborationConfig, DedupConfig, LayerWeights, NoveltyConfig, TierWeights};
pub use corroboration::corroboration_boost;
pub use error::DedupError;
pub use normalize::{jaccard_similarity, normalize_claim, TokenSet};
pub use novelty::novelty_multiplier;
pub use scorer::{effective_contribution, DuplicationScorer, ScoredArgument};
pub use similarity::{
    blend_similarity_layers, contribution_factor, is_mechanical_duplicate, mechanical_similarity,
    ngram_similarity, uniqueness_from_similarities, SimilarityPair,
};
