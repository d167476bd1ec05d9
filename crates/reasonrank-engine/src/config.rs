//! Engine configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! assess_duplicates = true
//!
//! [propagation]
//! damping = 0.15
//!
//! [dedup]
//! mechanical_threshold = 0.85
//!
//! [dedup.weights]
//! layer3 = 0.0
//!
//! [corroboration]
//! max_boost = 0.20
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use crate::error::{EngineError, Result};
use reasonrank_dedup::{CorroborationConfig, DedupConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of the bottom-up propagation and claim aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Share of a node's own truth in its blended reasonRank; the rest
    /// comes from its sub-arguments
    pub damping: f64,

    /// Weight of claim-level evidence corroboration in the claim's truth
    pub evidence_weight: f64,

    /// Lowest truth score a claim can have
    pub min_claim_truth: f64,

    /// Highest truth score a claim can have
    pub max_claim_truth: f64,

    /// Arguments whose reasonRank falls below this are reported as debunked
    pub debunked_threshold: f64,

    /// z-value of the claim confidence interval
    pub confidence_z: f64,

    /// Tree levels with at least this many nodes are scored in parallel
    pub parallel_threshold: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            damping: 0.15,
            evidence_weight: 1.0,
            min_claim_truth: 0.01,
            max_claim_truth: 0.99,
            debunked_threshold: 0.05,
            confidence_z: 1.96,
            parallel_threshold: 64,
        }
    }
}

impl PropagationConfig {
    /// Strict configuration: reasonRank is driven almost entirely by
    /// sub-arguments and claims stay further from certainty
    pub fn strict() -> Self {
        Self {
            damping: 0.05,
            evidence_weight: 0.5,
            min_claim_truth: 0.05,
            max_claim_truth: 0.95,
            debunked_threshold: 0.10,
            confidence_z: 2.576,
            parallel_threshold: 64,
        }
    }

    /// Lenient configuration: a node's own truth carries more weight
    pub fn lenient() -> Self {
        Self {
            damping: 0.30,
            evidence_weight: 1.0,
            min_claim_truth: 0.01,
            max_claim_truth: 0.99,
            debunked_threshold: 0.02,
            confidence_z: 1.645,
            parallel_threshold: 64,
        }
    }

    /// Check that every value lies in its meaningful range
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("damping", self.damping),
            ("min_claim_truth", self.min_claim_truth),
            ("max_claim_truth", self.max_claim_truth),
            ("debunked_threshold", self.debunked_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "propagation.{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.min_claim_truth < 0.01 || self.max_claim_truth > 0.99 {
            return Err(EngineError::Config(format!(
                "propagation claim truth bounds must lie within [0.01, 0.99], got [{}, {}]",
                self.min_claim_truth, self.max_claim_truth
            )));
        }
        if self.min_claim_truth > self.max_claim_truth {
            return Err(EngineError::Config(format!(
                "propagation.min_claim_truth ({}) exceeds max_claim_truth ({})",
                self.min_claim_truth, self.max_claim_truth
            )));
        }
        if !(self.evidence_weight.is_finite() && self.evidence_weight >= 0.0) {
            return Err(EngineError::Config(format!(
                "propagation.evidence_weight must be non-negative, got {}",
                self.evidence_weight
            )));
        }
        if !(self.confidence_z.is_finite() && self.confidence_z >= 0.0) {
            return Err(EngineError::Config(format!(
                "propagation.confidence_z must be non-negative, got {}",
                self.confidence_z
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(EngineError::Config(
                "propagation.parallel_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Derive uniqueness for arguments that did not supply one
    pub assess_duplicates: bool,

    /// Propagation settings
    pub propagation: PropagationConfig,

    /// Duplication scoring settings
    pub dedup: DedupConfig,

    /// Evidence corroboration settings
    pub corroboration: CorroborationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assess_duplicates: true,
            propagation: PropagationConfig::default(),
            dedup: DedupConfig::default(),
            corroboration: CorroborationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Strict presets for every stage
    pub fn strict() -> Self {
        Self {
            assess_duplicates: true,
            propagation: PropagationConfig::strict(),
            dedup: DedupConfig::strict(),
            corroboration: CorroborationConfig::strict(),
        }
    }

    /// Lenient presets for every stage
    pub fn lenient() -> Self {
        Self {
            assess_duplicates: true,
            propagation: PropagationConfig::lenient(),
            dedup: DedupConfig::lenient(),
            corroboration: CorroborationConfig::lenient(),
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.propagation.validate()?;
        self.dedup.validate()?;
        self.corroboration.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.assess_duplicates);
        assert_eq!(config.propagation.damping, 0.15);
        assert_eq!(config.propagation.min_claim_truth, 0.01);
        assert_eq!(config.propagation.max_claim_truth, 0.99);
        assert_eq!(config.propagation.parallel_threshold, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        assert!(EngineConfig::strict().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
        assert!(EngineConfig::strict().propagation.damping < EngineConfig::lenient().propagation.damping);
    }

    #[test]
    fn test_parse_toml_sections() {
        let toml = r#"
            assess_duplicates = false

            [propagation]
            damping = 0.2

            [dedup]
            mechanical_threshold = 0.9
            cluster_amplification_cap = 3.0

            [dedup.weights]
            layer3 = 0.0

            [dedup.novelty]
            halflife_hours = 12.0

            [corroboration]
            max_boost = 0.1

            [corroboration.tier_weights]
            t4 = 0.1
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert!(!config.assess_duplicates);
        assert_eq!(config.propagation.damping, 0.2);
        assert_eq!(config.propagation.evidence_weight, 1.0);
        assert_eq!(config.dedup.mechanical_threshold, 0.9);
        assert_eq!(config.dedup.cluster_amplification_cap, Some(3.0));
        assert_eq!(config.dedup.weights.layer1, 0.4);
        assert_eq!(config.dedup.weights.layer3, 0.0);
        assert_eq!(config.dedup.novelty.halflife_hours, 12.0);
        assert_eq!(config.dedup.novelty.peak_multiplier, 1.25);
        assert_eq!(config.corroboration.max_boost, 0.1);
        assert_eq!(config.corroboration.tier_weights.t4, 0.1);
        assert_eq!(config.corroboration.tier_weights.t1, 1.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("[propagation]\ndamping = 1.5\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str("[dedup]\nmechanical_threshold = -0.1\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str(
            "[propagation]\nmin_claim_truth = 0.9\nmax_claim_truth = 0.1\n",
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str("[propagation]\nmin_claim_truth = 0.0\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str("[corroboration.tier_weights]\nt4 = 2.0\n").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("[propagation\n").unwrap_err();
        assert!(matches!(err, EngineError::Toml(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::strict();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("[propagation]"));
        assert!(rendered.contains("[dedup.weights]"));
        assert_eq!(EngineConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[propagation]\ndamping = 0.25\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.propagation.damping, 0.25);

        let missing = EngineConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, EngineError::Io(_)));
    }
}
