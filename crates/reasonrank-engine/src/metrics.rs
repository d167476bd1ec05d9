//! Metrics collection for scoring operations

use std::collections::BTreeMap;

/// Counters collected while evaluating claims and applying events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineMetrics {
    /// Claims scored from scratch
    pub full_evaluations: usize,

    /// Snapshots produced by applying an event
    pub incremental_updates: usize,

    /// Nodes recomputed across all incremental updates
    pub nodes_rescored: usize,

    /// Events applied, by kind
    pub events_applied: BTreeMap<&'static str, usize>,

    /// Clusters that hit the amplification cap
    pub clusters_capped: usize,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a full evaluation
    pub fn record_evaluation(&mut self, clusters_capped: usize) {
        self.full_evaluations += 1;
        self.clusters_capped += clusters_capped;
    }

    /// Record one snapshot update caused by an event
    pub fn record_update(&mut self, kind: &'static str, nodes_rescored: usize) {
        self.incremental_updates += 1;
        self.nodes_rescored += nodes_rescored;
        *self.events_applied.entry(kind).or_insert(0) += 1;
    }

    /// Total events applied across all kinds
    pub fn total_events(&self) -> usize {
        self.events_applied.values().sum()
    }

    /// Mean nodes rescored per update
    pub fn mean_nodes_rescored(&self) -> f64 {
        if self.incremental_updates == 0 {
            0.0
        } else {
            self.nodes_rescored as f64 / self.incremental_updates as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Scoring Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Full evaluations: {}", self.full_evaluations),
            format!("Incremental updates: {}", self.incremental_updates),
            format!(
                "Nodes rescored: {} ({:.1} per update)",
                self.nodes_rescored,
                self.mean_nodes_rescored()
            ),
            format!("Clusters capped: {}", self.clusters_capped),
        ];

        if !self.events_applied.is_empty() {
            lines.push(String::new());
            lines.push("Events by kind:".to_string());
            for (kind, count) in &self.events_applied {
                lines.push(format!("  {}: {}", kind, count));
            }
            lines.push(format!("  Total: {}", self.total_events()));
        }

        lines.join("\n")
    }
}
