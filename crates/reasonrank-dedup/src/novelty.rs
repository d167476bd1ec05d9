//! Novelty premium with exponential decay

use crate::config::NoveltyConfig;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Freshness multiplier for an argument
///
/// Decays from `peak_multiplier` toward `floor`, halving the premium every
/// `halflife_hours`. Arguments below `novelty_threshold` uniqueness get the
/// floor straight away. A submission time in the future counts as age zero.
///
/// # Examples
///
/// ```
/// use reasonrank_dedup::{novelty_multiplier, NoveltyConfig};
///
/// let config = NoveltyConfig::default();
/// assert_eq!(novelty_multiplier(1_000, 1.0, 1_000, &config), 1.25);
///
/// let day_later = 1_000 + 24 * 3_600_000;
/// assert!((novelty_multiplier(1_000, 1.0, day_later, &config) - 1.125).abs() < 1e-12);
///
/// assert_eq!(novelty_multiplier(1_000, 0.2, 1_000, &config), 1.0);
/// ```
pub fn novelty_multiplier(
    submitted_at: u64,
    uniqueness: f64,
    now_ms: u64,
    config: &NoveltyConfig,
) -> f64 {
    if uniqueness < config.novelty_threshold {
        return config.floor;
    }
    if config.halflife_hours <= 0.0 {
        return config.floor;
    }
    let age_hours = now_ms.saturating_sub(submitted_at) as f64 / MS_PER_HOUR;
    let decay = 0.5f64.powf(age_hours / config.halflife_hours);
    config.floor + (config.peak_multiplier - config.floor) * decay
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3_600_000;

    #[test]
    fn test_peak_at_submission() {
        let config = NoveltyConfig::default();
        assert_eq!(novelty_multiplier(5 * HOUR, 0.9, 5 * HOUR, &config), 1.25);
    }

    #[test]
    fn test_future_submission_counts_as_fresh() {
        let config = NoveltyConfig::default();
        assert_eq!(novelty_multiplier(10 * HOUR, 1.0, HOUR, &config), 1.25);
    }

    #[test]
    fn test_decays_toward_floor() {
        let config = NoveltyConfig::default();
        let one_day = novelty_multiplier(0, 1.0, 24 * HOUR, &config);
        let two_days = novelty_multiplier(0, 1.0, 48 * HOUR, &config);
        let month = novelty_multiplier(0, 1.0, 30 * 24 * HOUR, &config);
        assert!((one_day - 1.125).abs() < 1e-12);
        assert!((two_days - 1.0625).abs() < 1e-12);
        assert!(month > 1.0 && month < 1.0001);
    }

    #[test]
    fn test_duplicates_never_earn_premium() {
        let config = NoveltyConfig::default();
        assert_eq!(novelty_multiplier(0, 0.49, 0, &config), 1.0);
        assert_eq!(novelty_multiplier(0, 0.5, 0, &config), 1.25);
    }
}
