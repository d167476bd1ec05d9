//! Argument module - the supporting/opposing reasons of a debate

use crate::{unit_clamp, ArgumentId, EvidenceId, FallacyPenalty};
use std::collections::HashMap;

/// Which side of its parent an argument is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// Supports the parent
    Pro,

    /// Opposes the parent
    Con,
}

impl Side {
    /// Get the side name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Pro => "pro",
            Side::Con => "con",
        }
    }

    /// Parse a side, accepting the common aliases used by import sheets
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pro" | "for" | "agree" | "support" | "supporting" | "yes" => Some(Side::Pro),
            "con" | "against" | "disagree" | "oppose" | "weakening" | "no" => Some(Side::Con),
            _ => None,
        }
    }

    /// +1.0 for pro, -1.0 for con
    pub fn sign(&self) -> f64 {
        match self {
            Side::Pro => 1.0,
            Side::Con => -1.0,
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid side: {}", s))
    }
}

/// Uniqueness as it arrives at the boundary
///
/// Records either carry a precomputed uniqueness or leave it to the
/// duplication scorer. The defaulting decision lives here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Uniqueness {
    /// No uniqueness supplied; counts as fully novel until assessed
    #[default]
    Unassessed,

    /// Uniqueness supplied by the caller or a previous assessment
    Supplied(f64),
}

impl Uniqueness {
    /// Build from an optional record field
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) => Uniqueness::Supplied(unit_clamp(v)),
            None => Uniqueness::Unassessed,
        }
    }

    /// Effective value in [0, 1]
    pub fn value(&self) -> f64 {
        match self {
            Uniqueness::Unassessed => 1.0,
            Uniqueness::Supplied(v) => unit_clamp(*v),
        }
    }

    /// Whether the caller supplied a value
    pub fn is_supplied(&self) -> bool {
        matches!(self, Uniqueness::Supplied(_))
    }
}

/// An argument for or against its parent (a claim or another argument)
///
/// All scores are clamped into their valid ranges by the builder methods.
/// `linkage_score` is the relevance weight of the edge to the parent and may
/// be edited independently of `truth_score`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Unique identifier
    pub id: ArgumentId,

    /// The argument text
    pub claim: String,

    /// Side relative to the parent
    pub side: Side,

    /// Own credibility before propagation [0.0, 1.0]
    pub truth_score: f64,

    /// Relevance of this argument to its parent [0.0, 1.0]
    pub linkage_score: f64,

    /// Weight of the argument (>= 0, default 1.0)
    pub importance_score: f64,

    /// Uniqueness relative to sibling arguments
    pub uniqueness: Uniqueness,

    /// Fallacies detected by external reviewers
    pub fallacies: Vec<FallacyPenalty>,

    /// Raw score before the duplication discount
    pub base_score: f64,

    /// Submission time, milliseconds since Unix epoch
    pub submitted_at: u64,

    /// Evidence records this argument cites
    pub evidence: Vec<EvidenceId>,

    /// Externally computed semantic similarity to other arguments
    pub semantic_similarities: HashMap<ArgumentId, f64>,

    /// Resolved community verdicts on equivalence with other arguments
    pub community_scores: HashMap<ArgumentId, f64>,
}

impl Argument {
    /// Create an argument with neutral defaults
    ///
    /// Defaults: truth 0.5, linkage 1.0, importance 1.0, base score 1.0,
    /// unassessed uniqueness, submitted at time 0.
    pub fn new(id: ArgumentId, claim: impl Into<String>, side: Side) -> Self {
        Self {
            id,
            claim: claim.into(),
            side,
            truth_score: 0.5,
            linkage_score: 1.0,
            importance_score: 1.0,
            uniqueness: Uniqueness::Unassessed,
            fallacies: Vec::new(),
            base_score: 1.0,
            submitted_at: 0,
            evidence: Vec::new(),
            semantic_similarities: HashMap::new(),
            community_scores: HashMap::new(),
        }
    }

    /// Set the truth score
    pub fn with_truth(mut self, truth: f64) -> Self {
        self.truth_score = unit_clamp(truth);
        self
    }

    /// Set the linkage (relevance) score
    pub fn with_linkage(mut self, linkage: f64) -> Self {
        self.linkage_score = unit_clamp(linkage);
        self
    }

    /// Set the importance weight
    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance_score = if importance.is_nan() { 0.0 } else { importance.max(0.0) };
        self
    }

    /// Supply a precomputed uniqueness
    pub fn with_uniqueness(mut self, uniqueness: f64) -> Self {
        self.uniqueness = Uniqueness::Supplied(unit_clamp(uniqueness));
        self
    }

    /// Set the base score used for duplication-adjusted contribution
    pub fn with_base_score(mut self, base_score: f64) -> Self {
        self.base_score = if base_score.is_nan() { 0.0 } else { base_score.max(0.0) };
        self
    }

    /// Set the submission time
    pub fn submitted_at(mut self, millis: u64) -> Self {
        self.submitted_at = millis;
        self
    }

    /// Attach a fallacy penalty
    pub fn with_fallacy(mut self, fallacy: FallacyPenalty) -> Self {
        self.fallacies.push(fallacy);
        self
    }

    /// Cite an evidence record
    pub fn with_evidence(mut self, evidence: EvidenceId) -> Self {
        if !self.evidence.contains(&evidence) {
            self.evidence.push(evidence);
        }
        self
    }

    /// Record an externally computed semantic similarity to another argument
    pub fn with_semantic_similarity(mut self, other: ArgumentId, score: f64) -> Self {
        self.semantic_similarities.insert(other, unit_clamp(score));
        self
    }

    /// Record a resolved community verdict on equivalence with another argument
    pub fn with_community_score(mut self, other: ArgumentId, score: f64) -> Self {
        self.community_scores.insert(other, unit_clamp(score));
        self
    }

    /// Semantic similarity to `other`, looked up in both directions' maps
    ///
    /// Similarity is symmetric, so a score recorded on either argument counts.
    pub fn semantic_similarity_to(&self, other: &Argument) -> Option<f64> {
        self.semantic_similarities
            .get(&other.id)
            .or_else(|| other.semantic_similarities.get(&self.id))
            .copied()
    }

    /// Community verdict on equivalence with `other`, in either direction
    pub fn community_score_with(&self, other: &Argument) -> Option<f64> {
        self.community_scores
            .get(&other.id)
            .or_else(|| other.community_scores.get(&self.id))
            .copied()
    }

    /// Total fallacy penalty fraction
    pub fn fallacy_penalty(&self) -> f64 {
        FallacyPenalty::total(&self.fallacies)
    }
}

/// A nested argument record: an argument and the sub-arguments it owns
///
/// This is the shape records arrive in from the persistence layer. It is
/// flattened into an [`ArgumentTree`](crate::ArgumentTree) before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// The argument itself
    pub argument: Argument,

    /// Owned sub-arguments
    pub sub_arguments: Vec<ArgumentSpec>,
}

impl ArgumentSpec {
    /// A spec with no sub-arguments
    pub fn leaf(argument: Argument) -> Self {
        Self {
            argument,
            sub_arguments: Vec::new(),
        }
    }

    /// Add a sub-argument
    pub fn with_child(mut self, child: ArgumentSpec) -> Self {
        self.sub_arguments.push(child);
        self
    }
}

impl From<Argument> for ArgumentSpec {
    fn from(argument: Argument) -> Self {
        ArgumentSpec::leaf(argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_aliases() {
        assert_eq!(Side::parse("Supporting"), Some(Side::Pro));
        assert_eq!(Side::parse("against"), Some(Side::Con));
        assert_eq!(Side::parse("sideways"), None);
        assert_eq!(Side::Con.sign(), -1.0);
    }

    #[test]
    fn test_builder_clamps_scores() {
        let arg = Argument::new(ArgumentId::from_value(1), "Taxes should be lower", Side::Pro)
            .with_truth(1.4)
            .with_linkage(-0.3)
            .with_importance(-2.0)
            .with_uniqueness(7.0)
            .with_base_score(f64::NAN);

        assert_eq!(arg.truth_score, 1.0);
        assert_eq!(arg.linkage_score, 0.0);
        assert_eq!(arg.importance_score, 0.0);
        assert_eq!(arg.uniqueness, Uniqueness::Supplied(1.0));
        assert_eq!(arg.base_score, 0.0);
    }

    #[test]
    fn test_uniqueness_defaults() {
        assert_eq!(Uniqueness::from_option(None).value(), 1.0);
        assert!(!Uniqueness::from_option(None).is_supplied());
        assert_eq!(Uniqueness::from_option(Some(0.25)).value(), 0.25);
    }

    #[test]
    fn test_similarity_lookup_is_symmetric() {
        let a = Argument::new(ArgumentId::from_value(1), "a", Side::Pro);
        let b = Argument::new(ArgumentId::from_value(2), "b", Side::Pro)
            .with_semantic_similarity(ArgumentId::from_value(1), 0.7)
            .with_community_score(ArgumentId::from_value(1), 0.9);

        assert_eq!(a.semantic_similarity_to(&b), Some(0.7));
        assert_eq!(b.semantic_similarity_to(&a), Some(0.7));
        assert_eq!(a.community_score_with(&b), Some(0.9));
    }

    #[test]
    fn test_evidence_not_duplicated() {
        let e = EvidenceId::from_value(9);
        let arg = Argument::new(ArgumentId::from_value(1), "a", Side::Pro)
            .with_evidence(e)
            .with_evidence(e);
        assert_eq!(arg.evidence, vec![e]);
    }
}
