//! Engine error types

use reasonrank_dedup::DedupError;
use reasonrank_domain::{ArgumentId, ClaimId, DomainError, EvidenceId};
use thiserror::Error;

/// Errors that can occur while scoring or applying mutation events
#[derive(Error, Debug)]
pub enum EngineError {
    /// Event or lookup referenced a claim that is not loaded
    #[error("Unknown claim: {0}")]
    UnknownClaim(ClaimId),

    /// Event referenced an argument the claim does not contain
    #[error("Unknown argument: {0}")]
    UnknownArgument(ArgumentId),

    /// Event referenced evidence no loaded claim holds
    #[error("Unknown evidence: {0}")]
    UnknownEvidence(EvidenceId),

    /// Structurally invalid argument graph
    #[error("Invalid argument graph: {0}")]
    Graph(DomainError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownArgument(id) => EngineError::UnknownArgument(id),
            DomainError::UnknownEvidence(id) => EngineError::UnknownEvidence(id),
            other => EngineError::Graph(other),
        }
    }
}

impl From<DedupError> for EngineError {
    fn from(err: DedupError) -> Self {
        match err {
            DedupError::Config(msg) | DedupError::InvalidConfig(msg) => EngineError::Config(msg),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
