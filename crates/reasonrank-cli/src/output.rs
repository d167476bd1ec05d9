//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use reasonrank_dedup::{ArgumentCluster, ScoredArgument};
use reasonrank_domain::{Argument, ArgumentId, ClaimId};
use reasonrank_engine::{score_breakdown, EngineMetrics, LeaderboardEntry, ScoreBreakdown, ScoredClaim};
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const STATEMENT_WIDTH: usize = 48;

/// Truth score of one claim before and after a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimDelta {
    /// Claim id
    pub claim: ClaimId,
    /// Claim statement
    pub statement: String,
    /// Truth score before any event
    pub before: f64,
    /// Truth score after every event
    pub after: f64,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format scored claims with their argument breakdowns.
    pub fn format_scored_claims(&self, claims: &[ScoredClaim], debunked_threshold: f64) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = claims
                    .iter()
                    .map(|c| scored_claim_json(c, debunked_threshold))
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => self.format_scored_claims_table(claims, debunked_threshold),
            OutputFormat::Quiet => Ok(claims
                .iter()
                .map(|c| format!("{} {:.4}", short_id(c.claim_id().value()), c.truth_score()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_scored_claims_table(&self, claims: &[ScoredClaim], debunked_threshold: f64) -> Result<String> {
        if claims.is_empty() {
            return Ok(self.colorize("No claims found.", "yellow"));
        }

        let mut sections = Vec::with_capacity(claims.len());
        for claim in claims {
            let belief = claim.belief();
            let mut lines = vec![format!(
                "{} {}",
                self.colorize(&format!("Claim {}", short_id(claim.claim_id().value())), "cyan"),
                claim.claim().statement
            )];
            lines.push(format!(
                "  Truth: {:.3}  CI: [{:.3}, {:.3}]  Pro: {:.3}  Con: {:.3}  Evidence: {:.3}",
                belief.truth_score,
                belief.confidence_interval.lower,
                belief.confidence_interval.upper,
                belief.pro_argument_strength,
                belief.con_argument_strength,
                belief.supporting_evidence_score,
            ));

            let breakdown = score_breakdown(claim, debunked_threshold);
            if breakdown.is_empty() {
                lines.push(self.colorize("  No arguments.", "yellow"));
            } else {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Side", "Argument", "Truth", "ReasonRank", "Uniqueness", "Impact", "Status"]);
                let mut rows = Vec::new();
                flatten_breakdown(&breakdown, 0, &mut rows);
                for (depth, entry) in rows {
                    let statement = format!("{}{}", "  ".repeat(depth), truncate(&entry.statement, STATEMENT_WIDTH));
                    let status = if entry.debunked {
                        self.colorize("debunked", "red")
                    } else {
                        String::new()
                    };
                    builder.push_record([
                        short_id(entry.score.id.value()),
                        entry.score.side.as_str().to_string(),
                        statement,
                        format!("{:.3}", entry.score.truth_score),
                        format!("{:.3}", entry.score.reason_rank),
                        format!("{:.3}", entry.score.uniqueness_score),
                        format!("{:+.3}", entry.score.signed_impact),
                        status,
                    ]);
                }
                lines.push(self.table(builder));
            }

            for cluster in claim.clusters().filter(|c| c.len() > 1) {
                lines.push(self.cluster_line(cluster));
            }
            sections.push(lines.join("\n"));
        }

        Ok(sections.join("\n\n"))
    }

    /// Format duplication scores for a list of arguments.
    pub fn format_dedup(
        &self,
        arguments: &[Argument],
        scored: &[ScoredArgument],
        clusters: &[ArgumentCluster],
    ) -> Result<String> {
        let statement_of = |id: ArgumentId| {
            arguments
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.claim.as_str())
                .unwrap_or("")
        };

        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "arguments": scored.iter().map(|s| json!({
                        "id": s.id.to_string(),
                        "claim": statement_of(s.id),
                        "baseScore": s.base_score,
                        "uniquenessScore": s.uniqueness_score,
                        "noveltyMultiplier": s.novelty_multiplier,
                        "effectiveContribution": s.effective_contribution,
                        "maxSimilarity": s.max_similarity(),
                        "mechanicalDuplicates": s.mechanical_duplicates().map(|id| id.to_string()).collect::<Vec<_>>(),
                    })).collect::<Vec<_>>(),
                    "clusters": clusters.iter().map(cluster_json).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                if scored.is_empty() {
                    return Ok(self.colorize("No arguments found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Argument", "Uniqueness", "Novelty", "Contribution", "Max Similarity"]);
                for s in scored {
                    builder.push_record([
                        short_id(s.id.value()),
                        truncate(statement_of(s.id), STATEMENT_WIDTH),
                        format!("{:.3}", s.uniqueness_score),
                        format!("{:.3}", s.novelty_multiplier),
                        format!("{:.3}", s.effective_contribution),
                        s.max_similarity().map(|m| format!("{:.3}", m)).unwrap_or_else(|| "-".to_string()),
                    ]);
                }
                let mut lines = vec![self.table(builder)];
                for cluster in clusters.iter().filter(|c| c.len() > 1) {
                    lines.push(self.cluster_line(cluster));
                }
                Ok(lines.join("\n"))
            }
            OutputFormat::Quiet => Ok(scored
                .iter()
                .map(|s| format!("{} {:.4}", short_id(s.id.value()), s.effective_contribution))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the result of replaying an event log.
    pub fn format_replay(&self, deltas: &[ClaimDelta], events: usize, metrics: &EngineMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "events": events,
                    "claims": deltas.iter().map(|d| json!({
                        "id": d.claim.to_string(),
                        "statement": d.statement,
                        "before": d.before,
                        "after": d.after,
                    })).collect::<Vec<_>>(),
                    "metrics": {
                        "fullEvaluations": metrics.full_evaluations,
                        "incrementalUpdates": metrics.incremental_updates,
                        "nodesRescored": metrics.nodes_rescored,
                        "clustersCapped": metrics.clusters_capped,
                        "eventsApplied": metrics.events_applied,
                    },
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Claim", "Before", "After", "Change"]);
                for d in deltas {
                    builder.push_record([
                        short_id(d.claim.value()),
                        truncate(&d.statement, STATEMENT_WIDTH),
                        format!("{:.3}", d.before),
                        format!("{:.3}", d.after),
                        format!("{:+.3}", d.after - d.before),
                    ]);
                }
                Ok([
                    self.success(&format!("Applied {} event(s)", events)),
                    self.table(builder),
                    metrics.summary(),
                ]
                .join("\n"))
            }
            OutputFormat::Quiet => Ok(deltas
                .iter()
                .map(|d| format!("{} {:.4}", short_id(d.claim.value()), d.after))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a claim leaderboard.
    pub fn format_leaderboard(&self, entries: &[LeaderboardEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = entries
                    .iter()
                    .map(|e| {
                        json!({
                            "rank": e.rank,
                            "id": e.claim.to_string(),
                            "statement": e.statement,
                            "truthScore": e.truth_score,
                            "confidenceInterval": {
                                "lower": e.confidence_interval.lower,
                                "upper": e.confidence_interval.upper
                            },
                            "argumentCount": e.argument_count,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No claims found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Rank", "ID", "Claim", "Truth", "Confidence", "Arguments"]);
                for e in entries {
                    builder.push_record([
                        e.rank.to_string(),
                        short_id(e.claim.value()),
                        truncate(&e.statement, STATEMENT_WIDTH),
                        format!("{:.3}", e.truth_score),
                        format!("[{:.2}, {:.2}]", e.confidence_interval.lower, e.confidence_interval.upper),
                        e.argument_count.to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| short_id(e.claim.value()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn cluster_line(&self, cluster: &ArgumentCluster) -> String {
        let members: Vec<String> = cluster.member_ids.iter().map(|id| short_id(id.value())).collect();
        let message = format!(
            "{}: {} argument(s), representative {}, score {:.3} [{}]",
            cluster.id,
            cluster.len(),
            short_id(cluster.representative_id.value()),
            cluster.cluster_score,
            members.join(", ")
        );
        if cluster.capped {
            self.warning(&format!("{} (capped)", message))
        } else {
            self.info(&message)
        }
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Display form of an id: small values as numbers, UUIDs truncated.
pub fn short_id(value: u128) -> String {
    if value <= u128::from(u64::MAX) {
        value.to_string()
    } else {
        ArgumentId::from_value(value).to_string()[..8].to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn flatten_breakdown<'a>(entries: &'a [ScoreBreakdown], depth: usize, rows: &mut Vec<(usize, &'a ScoreBreakdown)>) {
    for entry in entries {
        rows.push((depth, entry));
        flatten_breakdown(&entry.children, depth + 1, rows);
    }
}

fn breakdown_json(entry: &ScoreBreakdown) -> Value {
    let s = &entry.score;
    json!({
        "id": s.id.to_string(),
        "claim": entry.statement,
        "side": s.side.as_str(),
        "truthScore": s.truth_score,
        "reasonRank": s.reason_rank,
        "rawImpact": s.raw_impact,
        "signedImpact": s.signed_impact,
        "uniquenessScore": s.uniqueness_score,
        "effectiveContribution": s.effective_contribution,
        "fallacyPenalty": s.fallacy_penalty,
        "evidenceFactor": s.evidence_factor,
        "corroborationBoost": s.corroboration_boost,
        "subArgumentScore": s.sub_argument_score,
        "debunked": entry.debunked,
        "subArguments": entry.children.iter().map(breakdown_json).collect::<Vec<_>>(),
    })
}

fn cluster_json(cluster: &ArgumentCluster) -> Value {
    json!({
        "id": cluster.id,
        "representativeId": cluster.representative_id.to_string(),
        "memberIds": cluster.member_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
        "clusterScore": cluster.cluster_score,
        "capped": cluster.capped,
    })
}

fn scored_claim_json(claim: &ScoredClaim, debunked_threshold: f64) -> Value {
    let belief = claim.belief();
    json!({
        "id": claim.claim_id().to_string(),
        "statement": claim.claim().statement,
        "truthScore": belief.truth_score,
        "confidenceInterval": {
            "lower": belief.confidence_interval.lower,
            "upper": belief.confidence_interval.upper
        },
        "proArgumentStrength": belief.pro_argument_strength,
        "conArgumentStrength": belief.con_argument_strength,
        "supportingEvidenceScore": belief.supporting_evidence_score,
        "supportCount": belief.support_count,
        "evaluatedAt": claim.evaluated_at(),
        "arguments": score_breakdown(claim, debunked_threshold)
            .iter()
            .map(breakdown_json)
            .collect::<Vec<_>>(),
        "clusters": claim.clusters().map(cluster_json).collect::<Vec<_>>(),
    })
}
