//! Command implementations.

pub mod config;
pub mod dedup;
pub mod leaderboard;
pub mod replay;
pub mod score;

pub use self::config::execute_config;
pub use self::dedup::execute_dedup;
pub use self::leaderboard::execute_leaderboard;
pub use self::replay::execute_replay;
pub use self::score::execute_score;

use reasonrank_domain::{Clock, SystemClock};

/// Evaluation time: the explicit value, or the wall clock.
pub(crate) fn evaluation_time(now: Option<u64>) -> u64 {
    now.unwrap_or_else(|| SystemClock.now_ms())
}
