//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the scoring core and the
//! collaborators it does not own: wall-clock time and the record source.

use crate::{ClaimGraph, ClaimId};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for time-dependent scoring (the novelty premium)
///
/// Injected explicitly so that scoring is deterministic under test.
pub trait Clock {
    /// Current time in milliseconds since Unix epoch
    fn now_ms(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock frozen at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Trait for loading claim graphs from the persistence layer
///
/// Implemented outside the core (the CLI implements it over JSON records).
pub trait ClaimSource {
    /// Error type for load operations
    type Error;

    /// Ids of every claim the source can provide
    fn claim_ids(&self) -> Vec<ClaimId>;

    /// Load one claim graph
    fn load_claim(&self, id: ClaimId) -> Result<Option<ClaimGraph>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(1234).now_ms(), 1234);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // After 2020-01-01
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
