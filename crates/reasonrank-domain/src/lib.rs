//! ReasonRank Domain Layer
//!
//! This crate contains the graph model the scoring engine evaluates. It has
//! no external dependencies beyond `uuid` and defines the value objects and
//! trait interfaces that the duplication scorer, the propagation engine and
//! the (external) persistence layer all agree on.
//!
//! ## Key Concepts
//!
//! - **Claim**: Root node of a debate, scored from its pro/con argument trees
//! - **Argument**: A supporting or opposing reason, recursively owning sub-arguments
//! - **Evidence**: A referenced (not owned) record that can be verified or falsified
//! - **ArgumentTree**: Arena of argument nodes with explicit parent/child indices
//! - **ClaimGraph**: A claim, its argument arena and the evidence it references
//!
//! ## Architecture
//!
//! - Pure data and structural validation only
//! - Scoring lives in `reasonrank-dedup` and `reasonrank-engine`
//! - Trait definitions for the external collaborators (clock, record source)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod argument;
pub mod claim;
pub mod confidence;
pub mod error;
pub mod evidence;
pub mod fallacy;
pub mod graph;
pub mod id;
pub mod traits;
pub mod tree;

// Re-exports for convenience
pub use argument::{Argument, ArgumentSpec, Side, Uniqueness};
pub use claim::Claim;
pub use confidence::ConfidenceInterval;
pub use error::DomainError;
pub use evidence::{Evidence, QualityTier, SourceDescriptor, VerificationStatus};
pub use fallacy::FallacyPenalty;
pub use graph::ClaimGraph;
pub use id::{ArgumentId, ClaimId, EvidenceId};
pub use traits::{ClaimSource, Clock, FixedClock, SystemClock};
pub use tree::{ArgumentNode, ArgumentTree, FlatArgument, NodeIndex, SiblingGroup};

/// Clamp a score into `[0, 1]`, mapping NaN to 0.
pub fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
