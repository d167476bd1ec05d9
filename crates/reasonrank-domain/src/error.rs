//! Structural errors in argument graphs
//!
//! Scores are clamped rather than rejected, so the only domain errors are
//! graphs that cannot be evaluated at all.

use crate::{ArgumentId, EvidenceId};
use std::fmt;

/// Errors raised while building or editing a claim graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Two nodes share an identifier
    DuplicateArgument(ArgumentId),

    /// A record names a parent that does not exist
    UnknownParent {
        /// The orphaned argument
        argument: ArgumentId,
        /// The missing parent
        parent: ArgumentId,
    },

    /// A record is its own ancestor
    Cycle(ArgumentId),

    /// An argument or claim cites evidence the graph does not hold
    UnknownEvidence(EvidenceId),

    /// An argument id is not present in the tree
    UnknownArgument(ArgumentId),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::DuplicateArgument(id) => write!(f, "Duplicate argument id: {}", id),
            DomainError::UnknownParent { argument, parent } => {
                write!(f, "Argument {} references unknown parent {}", argument, parent)
            }
            DomainError::Cycle(id) => write!(f, "Argument {} is its own ancestor", id),
            DomainError::UnknownEvidence(id) => write!(f, "Unknown evidence id: {}", id),
            DomainError::UnknownArgument(id) => write!(f, "Unknown argument id: {}", id),
        }
    }
}

impl std::error::Error for DomainError {}
