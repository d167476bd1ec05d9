//! Duplication scorer configuration
//!
//! Every tunable is a plain value passed to the scorer, so a community or a
//! single claim can run with its own weights.

use crate::error::DedupError;
use reasonrank_domain::QualityTier;
use serde::{Deserialize, Serialize};

/// Weights of the three similarity layers
///
/// Missing layers drop out of the blend and the remaining weights are
/// renormalized, so only the ratios between present layers matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerWeights {
    /// Mechanical (normalized token) similarity weight
    pub layer1: f64,

    /// Externally supplied semantic similarity weight
    pub layer2: f64,

    /// Community verdict similarity weight
    pub layer3: f64,
}

impl Default for LayerWeights {
    fn default() -> Self {
        Self {
            layer1: 0.4,
            layer2: 0.6,
            layer3: 0.5,
        }
    }
}

/// Novelty premium for fresh, unique arguments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoveltyConfig {
    /// Multiplier at the moment of submission
    pub peak_multiplier: f64,

    /// Multiplier the premium decays toward
    pub floor: f64,

    /// Hours for the premium above the floor to halve
    pub halflife_hours: f64,

    /// Arguments less unique than this never earn the premium
    pub novelty_threshold: f64,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            peak_multiplier: 1.25,
            floor: 1.0,
            halflife_hours: 24.0,
            novelty_threshold: 0.5,
        }
    }
}

/// Configuration for duplication scoring and clustering
///
/// # Examples
///
/// ```
/// use reasonrank_dedup::DedupConfig;
///
/// let config = DedupConfig::default();
/// assert_eq!(config.mechanical_threshold, 0.85);
/// assert_eq!(config.cluster_threshold, 0.70);
///
/// let strict = DedupConfig::strict();
/// assert!(strict.mechanical_threshold < config.mechanical_threshold);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Layer-1 similarity at or above which two claims are the same claim
    pub mechanical_threshold: f64,

    /// Blended similarity at or above which two arguments share a cluster
    pub cluster_threshold: f64,

    /// Upper bound on a cluster's summed uniqueness, as a multiple of its
    /// anchor's uniqueness. `None` disables the cap.
    pub cluster_amplification_cap: Option<f64>,

    /// Use character-trigram similarity as Layer 2 when no semantic score
    /// was supplied for a pair
    pub ngram_fallback: bool,

    /// Similarity layer weights
    pub weights: LayerWeights,

    /// Novelty premium settings
    pub novelty: NoveltyConfig,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            mechanical_threshold: 0.85,
            weights: LayerWeights::default(),
            novelty: NoveltyConfig::default(),
            cluster_threshold: 0.70,
            cluster_amplification_cap: Some(2.0),
            ngram_fallback: false,
        }
    }
}

impl DedupConfig {
    /// Strict configuration: duplicates are caught earlier and clusters are
    /// capped harder
    pub fn strict() -> Self {
        Self {
            mechanical_threshold: 0.75,
            weights: LayerWeights::default(),
            novelty: NoveltyConfig {
                halflife_hours: 12.0,
                novelty_threshold: 0.7,
                ..NoveltyConfig::default()
            },
            cluster_threshold: 0.60,
            cluster_amplification_cap: Some(1.5),
            ngram_fallback: true,
        }
    }

    /// Lenient configuration: only near-verbatim restatements are penalized
    pub fn lenient() -> Self {
        Self {
            mechanical_threshold: 0.95,
            weights: LayerWeights::default(),
            novelty: NoveltyConfig {
                halflife_hours: 48.0,
                novelty_threshold: 0.3,
                ..NoveltyConfig::default()
            },
            cluster_threshold: 0.85,
            cluster_amplification_cap: Some(3.0),
            ngram_fallback: false,
        }
    }

    /// Check that every value lies in its meaningful range
    pub fn validate(&self) -> Result<(), DedupError> {
        check_unit("mechanical_threshold", self.mechanical_threshold)?;
        check_unit("cluster_threshold", self.cluster_threshold)?;

        let LayerWeights {
            layer1,
            layer2,
            layer3,
        } = self.weights;
        for (name, weight) in [("layer1", layer1), ("layer2", layer2), ("layer3", layer3)] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(DedupError::Config(format!(
                    "weights.{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if layer1 + layer2 + layer3 <= 0.0 {
            return Err(DedupError::Config(
                "at least one layer weight must be positive".to_string(),
            ));
        }

        let novelty = &self.novelty;
        if !(novelty.floor.is_finite() && novelty.floor > 0.0 && novelty.floor <= 1.0) {
            return Err(DedupError::Config(format!(
                "novelty.floor must be in (0, 1], got {}",
                novelty.floor
            )));
        }
        if !(novelty.peak_multiplier.is_finite() && novelty.peak_multiplier >= novelty.floor) {
            return Err(DedupError::Config(format!(
                "novelty.peak_multiplier must be at least the floor, got {}",
                novelty.peak_multiplier
            )));
        }
        if !(novelty.halflife_hours.is_finite() && novelty.halflife_hours > 0.0) {
            return Err(DedupError::Config(format!(
                "novelty.halflife_hours must be positive, got {}",
                novelty.halflife_hours
            )));
        }
        check_unit("novelty.novelty_threshold", novelty.novelty_threshold)?;

        if let Some(cap) = self.cluster_amplification_cap {
            if !(cap.is_finite() && cap >= 1.0) {
                return Err(DedupError::Config(format!(
                    "cluster_amplification_cap must be at least 1.0, got {cap}"
                )));
            }
        }

        Ok(())
    }
}

/// Per-tier weights for corroborating evidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    /// Tier 1 (peer-reviewed, primary sources)
    pub t1: f64,
    /// Tier 2
    pub t2: f64,
    /// Tier 3
    pub t3: f64,
    /// Tier 4 (anecdotal)
    pub t4: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            t1: 1.0,
            t2: 0.75,
            t3: 0.5,
            t4: 0.25,
        }
    }
}

impl TierWeights {
    /// Weight of a single source of the given tier
    pub fn weight(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::T1 => self.t1,
            QualityTier::T2 => self.t2,
            QualityTier::T3 => self.t3,
            QualityTier::T4 => self.t4,
        }
    }
}

/// Configuration for the evidence corroboration boost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorroborationConfig {
    /// Largest boost any number of sources can produce
    pub max_boost: f64,

    /// How quickly the boost saturates per unit of source weight
    pub saturation_rate: f64,

    /// Multiplier applied to sources that are not yet verified
    pub unverified_weight: f64,

    /// Weight per quality tier
    pub tier_weights: TierWeights,
}

impl Default for CorroborationConfig {
    fn default() -> Self {
        Self {
            max_boost: 0.20,
            saturation_rate: 0.5,
            tier_weights: TierWeights::default(),
            unverified_weight: 0.5,
        }
    }
}

impl CorroborationConfig {
    /// Only verified sources corroborate, and saturation is slower
    pub fn strict() -> Self {
        Self {
            max_boost: 0.15,
            saturation_rate: 0.35,
            tier_weights: TierWeights::default(),
            unverified_weight: 0.0,
        }
    }

    /// Unverified sources count fully
    pub fn lenient() -> Self {
        Self {
            max_boost: 0.25,
            saturation_rate: 0.5,
            tier_weights: TierWeights::default(),
            unverified_weight: 1.0,
        }
    }

    /// Check that every value lies in its meaningful range
    pub fn validate(&self) -> Result<(), DedupError> {
        check_unit("max_boost", self.max_boost)?;
        check_unit("unverified_weight", self.unverified_weight)?;
        if !(self.saturation_rate.is_finite() && self.saturation_rate > 0.0) {
            return Err(DedupError::Config(format!(
                "saturation_rate must be positive, got {}",
                self.saturation_rate
            )));
        }
        let TierWeights { t1, t2, t3, t4 } = self.tier_weights;
        for (name, weight) in [("t1", t1), ("t2", t2), ("t3", t3), ("t4", t4)] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(DedupError::Config(format!(
                    "tier_weights.{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if !(t1 >= t2 && t2 >= t3 && t3 >= t4) {
            return Err(DedupError::InvalidConfig(format!(
                "tier_weights must not increase from t1 to t4, got {t1}, {t2}, {t3}, {t4}"
            )));
        }
        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), DedupError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DedupError::Config(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}
