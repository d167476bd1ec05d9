//! Duplication scorer error types

use thiserror::Error;

/// Errors that can occur during duplication scoring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DedupError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Values that are each in range but inconsistent with one another
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
