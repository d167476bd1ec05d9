//! Claim module - the root node of a debate

use crate::{ClaimId, EvidenceId};

/// A claim - the statement whose credibility is being scored
///
/// The aggregate truth score is derived by the engine; `truth_score` holds the
/// last value handed back to the persistence layer and is always kept inside
/// [0.01, 0.99].
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// The claim statement
    pub statement: String,

    /// Last aggregate truth score
    pub truth_score: f64,

    /// Evidence attached directly to the claim
    pub evidence: Vec<EvidenceId>,

    /// When this claim was created (milliseconds since Unix epoch)
    pub created_at: u64,
}

impl Claim {
    /// Lowest truth score a claim can hold
    pub const MIN_TRUTH: f64 = 0.01;

    /// Highest truth score a claim can hold
    pub const MAX_TRUTH: f64 = 0.99;

    /// Create a new claim at maximal uncertainty
    pub fn new(id: ClaimId, statement: impl Into<String>) -> Self {
        Self {
            id,
            statement: statement.into(),
            truth_score: 0.5,
            evidence: Vec::new(),
            created_at: 0,
        }
    }

    /// Attach evidence directly to the claim
    pub fn with_evidence(mut self, evidence: EvidenceId) -> Self {
        if !self.evidence.contains(&evidence) {
            self.evidence.push(evidence);
        }
        self
    }

    /// Set the creation time
    pub fn created_at(mut self, millis: u64) -> Self {
        self.created_at = millis;
        self
    }

    /// Store a new aggregate truth score, clamped to [0.01, 0.99]
    pub fn set_truth_score(&mut self, truth: f64) {
        self.truth_score = Self::clamp_truth(truth);
    }

    /// Clamp a value into the claim truth range (NaN maps to 0.5)
    pub fn clamp_truth(truth: f64) -> f64 {
        if truth.is_nan() {
            0.5
        } else {
            truth.clamp(Self::MIN_TRUTH, Self::MAX_TRUTH)
        }
    }
}
