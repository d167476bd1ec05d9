//! ReasonRank Engine
//!
//! Recursive credibility scoring for claim graphs.
//!
//! Scoring runs in two stages. The duplication stage settles each
//! argument's uniqueness against its earlier siblings and caps similarity
//! clusters. Propagation then scores the tree bottom-up and aggregates the
//! claim's direct arguments and evidence into a belief score.
//!
//! Mutation events never edit a snapshot in place: [`ReasonRankEngine::apply`]
//! rescores only the invalidated nodes and their ancestors and returns a
//! new [`ScoredClaim`]. [`ScoreBook`] holds snapshots for many claims and
//! fans evidence falsification out to every claim holding the record.
//!
//! # Examples
//!
//! ```
//! use reasonrank_engine::{MutationEvent, Relevance, ScoreBook};
//! use reasonrank_domain::{
//!     Argument, ArgumentId, ArgumentTree, Claim, ClaimGraph, ClaimId, Evidence, Side,
//! };
//!
//! let claim = ClaimId::from_value(1);
//! let argument = ArgumentId::from_value(1);
//! let tree = ArgumentTree::from_specs(vec![
//!     Argument::new(argument, "Trials show fewer injuries", Side::Pro)
//!         .with_truth(0.9)
//!         .into(),
//! ])
//! .unwrap();
//! let graph = ClaimGraph::new(Claim::new(claim, "Helmets save lives"), tree, Vec::<Evidence>::new())
//!     .unwrap();
//!
//! let book = ScoreBook::default();
//! book.insert(graph, 0);
//! assert_eq!(book.get(claim).unwrap().truth_score(), 0.99);
//!
//! let severed = MutationEvent::RelevanceChanged { claim, argument, relevance: Relevance::SEVERED };
//! assert_eq!(book.apply(&severed, 0).unwrap(), 1);
//! assert_eq!(book.get(claim).unwrap().truth_score(), 0.5);
//! ```

#![warn(missing_docs)]

mod assess;
mod belief;
mod book;
mod config;
mod engine;
mod error;
mod events;
mod metrics;
mod propagation;
mod ranking;
mod snapshot;

pub use assess::{Assessment, GroupKey, NodeAssessment};
pub use belief::{score_protocol_belief, BeliefScore};
pub use book::ScoreBook;
pub use config::{EngineConfig, PropagationConfig};
pub use engine::ReasonRankEngine;
pub use error::{EngineError, Result};
pub use events::{EventLog, EvidenceTarget, MutationEvent, Relevance, ReplayOutcome, ScoreAdjustment};
pub use metrics::EngineMetrics;
pub use propagation::{ArgumentScore, Propagator};
pub use ranking::{is_debunked, leaderboard, ranked_children, score_breakdown, LeaderboardEntry, ScoreBreakdown};
pub use snapshot::{ScoredClaim, SnapshotUpdate};
