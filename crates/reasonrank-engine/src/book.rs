//! ScoreBook: concurrent per-claim snapshots via DashMap
//!
//! Readers clone an `Arc` to a snapshot under a short map guard and never
//! wait for a rescore. Writers to one claim are serialized by a per-claim
//! writer lock that is held while the new snapshot is computed; the map
//! itself is only locked to swap the finished snapshot in.

use crate::engine::ReasonRankEngine;
use crate::error::{EngineError, Result};
use crate::events::MutationEvent;
use crate::metrics::EngineMetrics;
use crate::ranking::{leaderboard, LeaderboardEntry};
use crate::snapshot::ScoredClaim;
use dashmap::DashMap;
use reasonrank_domain::{ClaimGraph, ClaimId, EvidenceId};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Thread-safe store of scored claims
pub struct ScoreBook {
    engine: ReasonRankEngine,
    claims: DashMap<ClaimId, Arc<ScoredClaim>>,
    writers: DashMap<ClaimId, Arc<Mutex<()>>>,
    evidence_index: DashMap<EvidenceId, BTreeSet<ClaimId>>,
    metrics: Mutex<EngineMetrics>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ScoreBook {
    /// Create an empty book scored by `engine`
    pub fn new(engine: ReasonRankEngine) -> Self {
        Self {
            engine,
            claims: DashMap::new(),
            writers: DashMap::new(),
            evidence_index: DashMap::new(),
            metrics: Mutex::new(EngineMetrics::new()),
        }
    }

    /// The engine used for scoring
    pub fn engine(&self) -> &ReasonRankEngine {
        &self.engine
    }

    /// Score a claim and store the snapshot, replacing any previous one
    pub fn insert(&self, graph: ClaimGraph, now_ms: u64) -> Arc<ScoredClaim> {
        let snapshot = self.engine.evaluate(graph, now_ms);
        self.store(snapshot)
    }

    /// Score many claims in parallel and store them
    ///
    /// Returns the number of claims stored.
    pub fn insert_all(&self, graphs: Vec<ClaimGraph>, now_ms: u64) -> usize {
        let snapshots = self.engine.score_claims(graphs, now_ms);
        let count = snapshots.len();
        for snapshot in snapshots {
            self.store(snapshot);
        }
        info!(claims = count, "Stored scored claims");
        count
    }

    fn store(&self, snapshot: ScoredClaim) -> Arc<ScoredClaim> {
        self.with_metrics(|m| m.record_evaluation(snapshot.assessment().clusters_capped()));

        let claim = snapshot.claim_id();
        let snapshot = Arc::new(snapshot);
        let writer = self.writer(claim);
        let _guard = lock(&*writer);
        let previous = self.claims.insert(claim, Arc::clone(&snapshot));
        self.reindex(claim, previous.as_deref(), &snapshot);
        snapshot
    }

    fn writer(&self, claim: ClaimId) -> Arc<Mutex<()>> {
        Arc::clone(self.writers.entry(claim).or_default().value())
    }

    /// Bring the evidence index in line with a claim's new snapshot
    fn reindex(&self, claim: ClaimId, previous: Option<&ScoredClaim>, current: &ScoredClaim) {
        let held: BTreeSet<EvidenceId> = current.graph().evidence_records().map(|e| e.id).collect();

        if let Some(previous) = previous {
            for evidence in previous.graph().evidence_records().map(|e| e.id) {
                if held.contains(&evidence) {
                    continue;
                }
                if let Some(mut claims) = self.evidence_index.get_mut(&evidence) {
                    claims.remove(&claim);
                }
                self.evidence_index.remove_if(&evidence, |_, claims| claims.is_empty());
            }
        }

        for evidence in held {
            self.evidence_index.entry(evidence).or_default().insert(claim);
        }
    }

    fn with_metrics<F: FnOnce(&mut EngineMetrics)>(&self, record: F) {
        record(&mut lock(&self.metrics));
    }

    /// Current snapshot of a claim
    pub fn get(&self, claim: ClaimId) -> Option<Arc<ScoredClaim>> {
        self.claims.get(&claim).map(|entry| Arc::clone(entry.value()))
    }

    /// Claims that hold the given evidence record, in id order
    pub fn claims_citing(&self, evidence: EvidenceId) -> Vec<ClaimId> {
        self.evidence_index
            .get(&evidence)
            .map(|claims| claims.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Apply a mutation event
    ///
    /// Claim-scoped events update one claim. Evidence falsification fans out
    /// to every claim holding the record. Either every target claim is
    /// updated or, on error, none is. Returns the total number of nodes
    /// rescored.
    pub fn apply(&self, event: &MutationEvent, now_ms: u64) -> Result<usize> {
        let targets = match event {
            MutationEvent::EvidenceFalsified { evidence } => self.claims_citing(*evidence),
            other => other.claim().into_iter().collect(),
        };
        self.apply_to_claims(&targets, event, now_ms)
    }

    /// Rescore `targets` under their writer locks, then commit all at once
    ///
    /// `targets` must be sorted so that concurrent fan-outs take writer
    /// locks in the same order.
    fn apply_to_claims(&self, targets: &[ClaimId], event: &MutationEvent, now_ms: u64) -> Result<usize> {
        let writers: Vec<Arc<Mutex<()>>> = targets.iter().map(|claim| self.writer(*claim)).collect();
        let _guards: Vec<MutexGuard<'_, ()>> = writers.iter().map(|w| lock(&**w)).collect();

        let mut current = Vec::with_capacity(targets.len());
        for claim in targets {
            let snapshot = self.get(*claim).ok_or(EngineError::UnknownClaim(*claim))?;
            current.push(snapshot);
        }

        // The index is read before locking; the snapshots decide
        if let MutationEvent::EvidenceFalsified { evidence } = event {
            current.retain(|snapshot| snapshot.graph().references_evidence(*evidence));
            if current.is_empty() {
                return Err(EngineError::UnknownEvidence(*evidence));
            }
        }

        let mut updates = Vec::with_capacity(current.len());
        for snapshot in &current {
            updates.push(self.engine.apply(snapshot, event, now_ms)?);
        }

        let mut nodes_rescored = 0;
        for (previous, update) in current.iter().zip(updates) {
            let claim = previous.claim_id();
            let snapshot = Arc::new(update.snapshot);
            self.claims.insert(claim, Arc::clone(&snapshot));
            if matches!(event, MutationEvent::EvidenceAttached { .. }) {
                self.reindex(claim, Some(previous), &snapshot);
            }
            self.with_metrics(|m| m.record_update(event.kind(), update.nodes_rescored));
            nodes_rescored += update.nodes_rescored;
        }

        debug!(
            event = event.kind(),
            claims = current.len(),
            nodes_rescored,
            "Applied event to score book"
        );
        Ok(nodes_rescored)
    }

    /// All claims ranked by truth score
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let snapshots = self.snapshots();
        leaderboard(snapshots.iter().map(Arc::as_ref))
    }

    /// Current snapshots of every claim, in no particular order
    pub fn snapshots(&self) -> Vec<Arc<ScoredClaim>> {
        self.claims
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Ids of all stored claims, sorted
    pub fn claim_ids(&self) -> Vec<ClaimId> {
        let mut ids: Vec<ClaimId> = self.claims.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of stored claims
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the book holds no claims
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Copy of the metrics collected so far
    pub fn metrics(&self) -> EngineMetrics {
        lock(&self.metrics).clone()
    }
}

impl Default for ScoreBook {
    fn default() -> Self {
        Self::new(ReasonRankEngine::default())
    }
}
