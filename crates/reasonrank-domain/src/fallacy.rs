//! Fallacy penalty descriptors
//!
//! Fallacy detection itself happens outside the engine (pattern detectors,
//! reviewers). The engine only consumes the penalties those detectors attach.

/// A detected fallacy and the fraction of credibility it removes
#[derive(Debug, Clone, PartialEq)]
pub struct FallacyPenalty {
    /// Short name of the fallacy (e.g., "ad hominem", "strawman")
    pub kind: String,

    /// Fraction of the argument's score removed, clamped to [0.0, 1.0]
    pub penalty: f64,
}

impl FallacyPenalty {
    /// Create a new penalty descriptor, clamping the fraction into [0, 1]
    pub fn new(kind: impl Into<String>, penalty: f64) -> Self {
        Self {
            kind: kind.into(),
            penalty: crate::unit_clamp(penalty),
        }
    }

    /// Total penalty fraction for a set of descriptors, clamped to [0, 1]
    pub fn total(penalties: &[FallacyPenalty]) -> f64 {
        crate::unit_clamp(penalties.iter().map(|p| p.penalty).sum())
    }
}
