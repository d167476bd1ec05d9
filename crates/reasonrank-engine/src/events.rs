//! Mutation events and their replay
//!
//! Events never edit a scored snapshot. Applying one produces a new
//! snapshot, so a log of events replayed against a starting snapshot is an
//! exact audit trail of how scores moved.

use crate::engine::ReasonRankEngine;
use crate::error::{EngineError, Result};
use crate::snapshot::ScoredClaim;
use reasonrank_domain::{unit_clamp, Argument, ArgumentId, ClaimId, Evidence, EvidenceId};
use tracing::info;

/// Relevance weight of an argument→parent edge, always in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Relevance(f64);

impl Relevance {
    /// Fully relevant edge
    pub const FULL: Relevance = Relevance(1.0);

    /// Severed edge
    pub const SEVERED: Relevance = Relevance(0.0);

    /// Create a relevance weight, clamping into `[0, 1]`
    pub fn new(value: f64) -> Self {
        Relevance(unit_clamp(value))
    }

    /// The weight
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Partial update of an argument's scoring inputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAdjustment {
    /// New own truth score
    pub truth: Option<f64>,

    /// New importance weight
    pub importance: Option<f64>,

    /// New uniqueness; replaces any derived value
    pub uniqueness: Option<f64>,
}

impl ScoreAdjustment {
    /// Whether the adjustment changes nothing
    pub fn is_empty(&self) -> bool {
        self.truth.is_none() && self.importance.is_none() && self.uniqueness.is_none()
    }

    pub(crate) fn apply_to(&self, argument: &mut Argument) {
        let mut edited = argument.clone();
        if let Some(truth) = self.truth {
            edited = edited.with_truth(truth);
        }
        if let Some(importance) = self.importance {
            edited = edited.with_importance(importance);
        }
        if let Some(uniqueness) = self.uniqueness {
            edited = edited.with_uniqueness(uniqueness);
        }
        *argument = edited;
    }
}

/// Where newly attached evidence is cited from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceTarget {
    /// The claim itself
    Claim,

    /// One of the claim's arguments
    Argument(ArgumentId),
}

/// A change to the argument graph
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    /// A new argument under `parent` (or the claim when `None`)
    ArgumentSubmitted {
        /// Claim the argument belongs to
        claim: ClaimId,
        /// Parent argument
        parent: Option<ArgumentId>,
        /// The argument
        argument: Argument,
    },

    /// An evidence record was shown to be false; affects every claim citing it
    EvidenceFalsified {
        /// The evidence record
        evidence: EvidenceId,
    },

    /// An argument's relevance to its parent was edited
    RelevanceChanged {
        /// Claim the argument belongs to
        claim: ClaimId,
        /// The argument
        argument: ArgumentId,
        /// New relevance
        relevance: Relevance,
    },

    /// An argument's scoring inputs were adjusted
    ScoresAdjusted {
        /// Claim the argument belongs to
        claim: ClaimId,
        /// The argument
        argument: ArgumentId,
        /// Fields to change
        adjustment: ScoreAdjustment,
    },

    /// Evidence was attached to the claim or one of its arguments
    EvidenceAttached {
        /// Claim the evidence is attached within
        claim: ClaimId,
        /// What cites the evidence
        target: EvidenceTarget,
        /// The evidence record; an existing record with the same id is kept
        evidence: Evidence,
    },
}

impl MutationEvent {
    /// The claim this event is scoped to, `None` for events that fan out
    pub fn claim(&self) -> Option<ClaimId> {
        match self {
            MutationEvent::ArgumentSubmitted { claim, .. }
            | MutationEvent::RelevanceChanged { claim, .. }
            | MutationEvent::ScoresAdjusted { claim, .. }
            | MutationEvent::EvidenceAttached { claim, .. } => Some(*claim),
            MutationEvent::EvidenceFalsified { .. } => None,
        }
    }

    /// Short name for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            MutationEvent::ArgumentSubmitted { .. } => "argument_submitted",
            MutationEvent::EvidenceFalsified { .. } => "evidence_falsified",
            MutationEvent::RelevanceChanged { .. } => "relevance_changed",
            MutationEvent::ScoresAdjusted { .. } => "scores_adjusted",
            MutationEvent::EvidenceAttached { .. } => "evidence_attached",
        }
    }

    /// Whether this event touches the given claim snapshot
    pub fn applies_to(&self, snapshot: &ScoredClaim) -> bool {
        match self {
            MutationEvent::EvidenceFalsified { evidence } => {
                snapshot.graph().references_evidence(*evidence)
            }
            other => other.claim() == Some(snapshot.claim_id()),
        }
    }
}

/// Result of replaying events against a snapshot
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// Snapshot after the last event
    pub snapshot: ScoredClaim,

    /// Events that touched the claim
    pub applied: usize,

    /// Events that did not concern the claim
    pub skipped: usize,

    /// Total nodes rescored across all events
    pub nodes_rescored: usize,
}

/// Ordered log of mutation events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<MutationEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&mut self, event: MutationEvent) {
        self.events.push(event);
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in order
    pub fn iter(&self) -> impl Iterator<Item = &MutationEvent> {
        self.events.iter()
    }

    /// Replay every event that concerns the snapshot's claim
    ///
    /// The starting snapshot is left untouched. Events for other claims are
    /// skipped; an event that references an unknown argument fails the
    /// replay.
    pub fn replay(
        &self,
        engine: &ReasonRankEngine,
        start: &ScoredClaim,
        now_ms: u64,
    ) -> Result<ReplayOutcome> {
        let mut snapshot = start.clone();
        let mut applied = 0;
        let mut nodes_rescored = 0;

        for event in &self.events {
            if !event.applies_to(&snapshot) {
                continue;
            }
            let update = engine.apply(&snapshot, event, now_ms)?;
            nodes_rescored += update.nodes_rescored;
            snapshot = update.snapshot;
            applied += 1;
        }

        info!(
            claim = %snapshot.claim_id(),
            applied,
            skipped = self.events.len() - applied,
            nodes_rescored,
            "Replayed event log"
        );
        Ok(ReplayOutcome {
            snapshot,
            applied,
            skipped: self.events.len() - applied,
            nodes_rescored,
        })
    }
}

impl FromIterator<MutationEvent> for EventLog {
    fn from_iter<T: IntoIterator<Item = MutationEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl Extend<MutationEvent> for EventLog {
    fn extend<T: IntoIterator<Item = MutationEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

/// Check that a claim-scoped event targets the snapshot's claim
pub(crate) fn ensure_claim(event: &MutationEvent, snapshot: &ScoredClaim) -> Result<()> {
    match event.claim() {
        Some(claim) if claim != snapshot.claim_id() => Err(EngineError::UnknownClaim(claim)),
        _ => Ok(()),
    }
}
