//! Evidence corroboration boost
//!
//! Independent sources for the same fact add credibility, each one less
//! than the last: `boost = MAX × (1 − e^(−k × Σw))` where `w` is a
//! source's tier weight, discounted while the source is unverified.

use crate::config::CorroborationConfig;
use reasonrank_domain::{Evidence, VerificationStatus};

/// Additive truth boost from a set of corroborating sources
///
/// Falsified sources contribute nothing. The result lies in
/// `[0, max_boost]`; an empty set yields 0.
///
/// # Examples
///
/// ```
/// use reasonrank_dedup::{corroboration_boost, CorroborationConfig};
/// use reasonrank_domain::{Evidence, EvidenceId, QualityTier, VerificationStatus};
///
/// let config = CorroborationConfig::default();
/// assert_eq!(corroboration_boost(std::iter::empty::<&Evidence>(), &config), 0.0);
///
/// let study = Evidence::new(EvidenceId::from_value(1), QualityTier::T1)
///     .with_status(VerificationStatus::Verified);
/// let boost = corroboration_boost([&study], &config);
/// assert!(boost > 0.0 && boost < config.max_boost);
/// ```
pub fn corroboration_boost<'a, I>(sources: I, config: &CorroborationConfig) -> f64
where
    I: IntoIterator<Item = &'a Evidence>,
{
    let total: f64 = sources
        .into_iter()
        .filter_map(|evidence| source_weight(evidence, config))
        .sum();
    if total <= 0.0 {
        return 0.0;
    }

    let boost = config.max_boost * (1.0 - (-config.saturation_rate * total).exp());
    boost.clamp(0.0, config.max_boost)
}

fn source_weight(evidence: &Evidence, config: &CorroborationConfig) -> Option<f64> {
    let status_weight = match evidence.status {
        VerificationStatus::Falsified => return None,
        VerificationStatus::Verified => 1.0,
        VerificationStatus::Unverified => config.unverified_weight,
    };
    let weight = config.tier_weights.weight(evidence.tier) * status_weight;
    (weight > 0.0).then_some(weight)
}
