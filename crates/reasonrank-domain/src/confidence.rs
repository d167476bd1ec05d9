//! Confidence interval around a claim's truth score

/// Confidence interval representing [lower, upper] bounds
///
/// Construction never fails: bounds are clamped into [0, 1] and swapped if
/// given in the wrong order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Lower bound [0.0, 1.0]
    pub lower: f64,
    /// Upper bound [0.0, 1.0]
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Create a new confidence interval
    pub fn new(lower: f64, upper: f64) -> Self {
        let lower = crate::unit_clamp(lower);
        let upper = crate::unit_clamp(upper);
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self {
                lower: upper,
                upper: lower,
            }
        }
    }

    /// Symmetric interval `center ± margin`, clamped into [0, 1]
    pub fn around(center: f64, margin: f64) -> Self {
        let margin = margin.abs();
        Self::new(center - margin, center + margin)
    }

    /// Get the midpoint of the interval
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Get the width of the interval (uncertainty measure)
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any inputs produce a well-formed interval
        #[test]
        fn test_interval_always_valid(a in -2.0f64..2.0, b in -2.0f64..2.0) {
            let ci = ConfidenceInterval::new(a, b);
            prop_assert!(ci.lower <= ci.upper);
            prop_assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
        }
    }
}
