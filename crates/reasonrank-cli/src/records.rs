//! JSON record import
//!
//! Records use the camelCase field names of the persistence layer. Ids may
//! be given as plain numbers or as UUID strings. Arguments can be nested
//! through `subArguments` or listed flat with a `parentId`; both forms may
//! be mixed within one claim.

use crate::error::{CliError, Result};
use reasonrank_dedup::EquivalenceDebate;
use reasonrank_domain::{
    Argument, ArgumentId, ArgumentTree, Claim, ClaimGraph, ClaimId, ClaimSource, Evidence,
    EvidenceId, FallacyPenalty, FlatArgument, QualityTier, Side, SourceDescriptor,
    VerificationStatus,
};
use reasonrank_engine::{EvidenceTarget, MutationEvent, Relevance, ScoreAdjustment};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

/// An identifier as written in a record file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Plain number
    Number(u64),
    /// Decimal or UUID string
    Text(String),
}

impl RecordId {
    /// Raw 128-bit value
    pub fn raw(&self) -> Result<u128> {
        match self {
            RecordId::Number(n) => Ok(u128::from(*n)),
            RecordId::Text(s) => match s.trim().parse::<u128>() {
                Ok(n) => Ok(n),
                Err(_) => ArgumentId::from_string(s.trim())
                    .map(|id| id.value())
                    .map_err(CliError::InvalidInput),
            },
        }
    }

    fn claim(&self) -> Result<ClaimId> {
        self.raw().map(ClaimId::from_value)
    }

    fn argument(&self) -> Result<ArgumentId> {
        self.raw().map(ArgumentId::from_value)
    }

    fn evidence(&self) -> Result<EvidenceId> {
        self.raw().map(EvidenceId::from_value)
    }
}

fn default_truth() -> f64 {
    0.5
}

fn default_one() -> f64 {
    1.0
}

fn default_status() -> String {
    "unverified".to_string()
}

fn default_tier() -> String {
    "T2".to_string()
}

/// A fallacy detected on an argument
#[derive(Debug, Clone, Deserialize)]
pub struct FallacyRecord {
    /// Fallacy name
    #[serde(alias = "type", alias = "name")]
    pub kind: String,

    /// Fraction of the argument's score removed
    pub penalty: f64,
}

/// Weighted community votes on whether two arguments are the same
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    /// The other argument
    pub other: RecordId,

    /// Weight of "same argument" votes
    #[serde(default)]
    pub same: f64,

    /// Weight of "different argument" votes
    #[serde(default)]
    pub different: f64,
}

/// An argument record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentRecord {
    /// Argument id
    pub id: RecordId,

    /// Argument text
    pub claim: String,

    /// "pro" or "con"
    pub side: String,

    /// Own credibility
    #[serde(default = "default_truth")]
    pub truth_score: f64,

    /// Relevance to the parent
    #[serde(default = "default_one")]
    pub linkage_score: f64,

    /// Importance weight
    #[serde(default)]
    pub importance_score: Option<f64>,

    /// Externally supplied uniqueness
    #[serde(default)]
    pub uniqueness_score: Option<f64>,

    /// Nested sub-arguments
    #[serde(default)]
    pub sub_arguments: Vec<ArgumentRecord>,

    /// Parent argument for flat records
    #[serde(default)]
    pub parent_id: Option<RecordId>,

    /// Detected fallacies
    #[serde(default)]
    pub fallacies_detected: Vec<FallacyRecord>,

    /// Score before duplication discounts
    #[serde(default = "default_one")]
    pub base_score: f64,

    /// Submission time in milliseconds
    #[serde(default)]
    pub submitted_at: u64,

    /// Layer-2 similarity to other arguments, keyed by id
    #[serde(default)]
    pub semantic_similarities: BTreeMap<String, f64>,

    /// Layer-3 similarity to other arguments, keyed by id
    #[serde(default)]
    pub community_scores: BTreeMap<String, f64>,

    /// Unresolved community equivalence votes
    #[serde(default)]
    pub community_votes: Vec<VoteRecord>,

    /// Cited evidence ids
    #[serde(default)]
    pub evidence: Vec<RecordId>,
}

impl ArgumentRecord {
    /// Convert to a domain argument, ignoring sub-arguments
    pub fn to_argument(&self) -> Result<Argument> {
        let id = self.id.argument()?;
        let side = Side::parse(&self.side)
            .ok_or_else(|| CliError::InvalidInput(format!("Invalid side '{}' on argument {}", self.side, id)))?;

        let mut argument = Argument::new(id, self.claim.clone(), side)
            .with_truth(self.truth_score)
            .with_linkage(self.linkage_score)
            .with_base_score(self.base_score)
            .submitted_at(self.submitted_at);
        if let Some(importance) = self.importance_score {
            argument = argument.with_importance(importance);
        }
        if let Some(uniqueness) = self.uniqueness_score {
            argument = argument.with_uniqueness(uniqueness);
        }
        for fallacy in &self.fallacies_detected {
            argument = argument.with_fallacy(FallacyPenalty::new(fallacy.kind.clone(), fallacy.penalty));
        }
        for (other, score) in &self.semantic_similarities {
            let other = RecordId::Text(other.clone()).argument()?;
            argument = argument.with_semantic_similarity(other, *score);
        }
        for (other, score) in &self.community_scores {
            let other = RecordId::Text(other.clone()).argument()?;
            argument = argument.with_community_score(other, *score);
        }
        for evidence in &self.evidence {
            argument = argument.with_evidence(evidence.evidence()?);
        }
        Ok(argument)
    }

    fn debates(&self) -> Result<Vec<EquivalenceDebate>> {
        let id = self.id.argument()?;
        self.community_votes
            .iter()
            .map(|vote| {
                let mut debate = EquivalenceDebate::new(id, vote.other.argument()?);
                debate.vote_same(vote.same);
                debate.vote_different(vote.different);
                Ok(debate)
            })
            .collect()
    }
}

/// An evidence source description
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    /// Short description
    pub title: String,

    /// Link, if any
    #[serde(default)]
    pub url: Option<String>,
}

/// An evidence record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    /// Evidence id
    pub id: RecordId,

    /// "unverified", "verified" or "falsified"
    #[serde(default = "default_status")]
    pub verification_status: String,

    /// "T1" to "T4"
    #[serde(default = "default_tier")]
    pub quality_tier: String,

    /// Where the evidence comes from
    #[serde(default)]
    pub source: Option<SourceRecord>,
}

impl EvidenceRecord {
    /// Convert to a domain evidence record
    pub fn to_evidence(&self) -> Result<Evidence> {
        let id = self.id.evidence()?;
        let tier = QualityTier::parse(&self.quality_tier).ok_or_else(|| {
            CliError::InvalidInput(format!("Invalid quality tier '{}' on evidence {}", self.quality_tier, id))
        })?;
        let status = VerificationStatus::parse(&self.verification_status).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Invalid verification status '{}' on evidence {}",
                self.verification_status, id
            ))
        })?;

        let mut evidence = Evidence::new(id, tier).with_status(status);
        if let Some(source) = &self.source {
            let mut descriptor = SourceDescriptor::new(source.title.clone());
            if let Some(url) = &source.url {
                descriptor = descriptor.with_url(url.clone());
            }
            evidence = evidence.with_source(descriptor);
        }
        Ok(evidence)
    }
}

/// A claim record with its argument tree
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    /// Claim id
    pub id: RecordId,

    /// Claim statement
    pub statement: String,

    /// Creation time in milliseconds
    #[serde(default)]
    pub created_at: u64,

    /// Evidence attached to the claim itself
    #[serde(default)]
    pub evidence: Vec<RecordId>,

    /// Arguments, nested or flat
    #[serde(default)]
    pub arguments: Vec<ArgumentRecord>,

    /// Evidence records used only by this claim
    #[serde(default)]
    pub evidence_records: Vec<EvidenceRecord>,
}

/// Top-level records file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFile {
    /// Claims
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,

    /// Evidence records shared by all claims
    #[serde(default)]
    pub evidence: Vec<EvidenceRecord>,
}

/// Parsed records, ready to be turned into claim graphs
#[derive(Debug, Clone)]
pub struct RecordSet {
    claims: Vec<(ClaimId, ClaimRecord)>,
    evidence: HashMap<EvidenceId, Evidence>,
}

impl RecordSet {
    /// Load a records file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse records from a JSON string
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: RecordFile = serde_json::from_str(contents)?;
        Self::from_records(file)
    }

    /// Validate ids and shared evidence
    pub fn from_records(file: RecordFile) -> Result<Self> {
        let mut evidence = HashMap::new();
        for record in &file.evidence {
            let converted = record.to_evidence()?;
            evidence.insert(converted.id, converted);
        }

        let mut seen = BTreeSet::new();
        let mut claims = Vec::with_capacity(file.claims.len());
        for record in file.claims {
            let id = record.id.claim()?;
            if !seen.insert(id) {
                return Err(CliError::InvalidInput(format!("Duplicate claim id: {}", id)));
            }
            claims.push((id, record));
        }

        debug!(claims = claims.len(), evidence = evidence.len(), "Parsed record file");
        Ok(Self { claims, evidence })
    }

    /// Number of claims
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the file held no claims
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Build every claim graph, in file order
    pub fn graphs(&self) -> Result<Vec<ClaimGraph>> {
        self.claims
            .iter()
            .map(|(id, record)| self.build(*id, record))
            .collect()
    }

    fn build(&self, id: ClaimId, record: &ClaimRecord) -> Result<ClaimGraph> {
        let mut claim = Claim::new(id, record.statement.clone()).created_at(record.created_at);
        for evidence in &record.evidence {
            claim = claim.with_evidence(evidence.evidence()?);
        }

        let mut local = HashMap::new();
        for evidence in &record.evidence_records {
            let converted = evidence.to_evidence()?;
            local.insert(converted.id, converted);
        }

        let (mut arguments, debates) = flatten(&record.arguments)?;
        if !debates.is_empty() {
            let mut plain: Vec<Argument> = arguments.iter().map(|f| f.argument.clone()).collect();
            for debate in &debates {
                debate.apply(&mut plain);
            }
            for (flat, updated) in arguments.iter_mut().zip(plain) {
                flat.argument = updated;
            }
        }

        // Only the evidence this claim cites travels with its graph
        let cited: BTreeSet<EvidenceId> = claim
            .evidence
            .iter()
            .chain(arguments.iter().flat_map(|f| f.argument.evidence.iter()))
            .copied()
            .collect();
        let evidence: Vec<Evidence> = cited
            .into_iter()
            .filter_map(|id| local.get(&id).or_else(|| self.evidence.get(&id)).cloned())
            .collect();

        let tree = ArgumentTree::from_flat(arguments)?;
        Ok(ClaimGraph::new(claim, tree, evidence)?)
    }
}

/// Flatten nested records into parent-id records plus pending debates
fn flatten(records: &[ArgumentRecord]) -> Result<(Vec<FlatArgument>, Vec<EquivalenceDebate>)> {
    let mut flat = Vec::new();
    let mut debates = Vec::new();
    let mut stack: Vec<(Option<ArgumentId>, &ArgumentRecord)> =
        records.iter().rev().map(|r| (None, r)).collect();

    while let Some((nested_parent, record)) = stack.pop() {
        let argument = record.to_argument()?;
        let parent = match (&record.parent_id, nested_parent) {
            (Some(explicit), _) => Some(explicit.argument()?),
            (None, nested) => nested,
        };
        let id = argument.id;
        debates.extend(record.debates()?);
        stack.extend(record.sub_arguments.iter().rev().map(|child| (Some(id), child)));
        flat.push(FlatArgument { argument, parent });
    }
    Ok((flat, debates))
}

impl ClaimSource for RecordSet {
    type Error = CliError;

    fn claim_ids(&self) -> Vec<ClaimId> {
        self.claims.iter().map(|(id, _)| *id).collect()
    }

    fn load_claim(&self, id: ClaimId) -> Result<Option<ClaimGraph>> {
        self.claims
            .iter()
            .find(|(claim, _)| *claim == id)
            .map(|(claim, record)| self.build(*claim, record))
            .transpose()
    }
}

/// Load a flat array of argument records for the dedup command
pub fn load_arguments(path: &Path) -> Result<Vec<Argument>> {
    let contents = fs::read_to_string(path)?;
    let records: Vec<ArgumentRecord> = serde_json::from_str(&contents)?;
    let (flat, debates) = flatten(&records)?;
    let mut arguments: Vec<Argument> = flat.into_iter().map(|f| f.argument).collect();
    for debate in &debates {
        debate.apply(&mut arguments);
    }
    Ok(arguments)
}

/// A mutation event record
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventRecord {
    /// A new argument
    #[serde(rename_all = "camelCase")]
    ArgumentSubmitted {
        /// Claim id
        claim_id: RecordId,
        /// Parent argument, absent for the claim itself
        #[serde(default)]
        parent_id: Option<RecordId>,
        /// The argument; sub-arguments must be submitted separately
        argument: ArgumentRecord,
    },

    /// Evidence shown to be false
    #[serde(rename_all = "camelCase")]
    EvidenceFalsified {
        /// Evidence id
        evidence_id: RecordId,
    },

    /// New relevance for an argument's edge to its parent
    #[serde(rename_all = "camelCase")]
    RelevanceChanged {
        /// Claim id
        claim_id: RecordId,
        /// Argument id
        argument_id: RecordId,
        /// New relevance in [0, 1]
        relevance: f64,
    },

    /// Edited scoring inputs
    #[serde(rename_all = "camelCase")]
    ScoresAdjusted {
        /// Claim id
        claim_id: RecordId,
        /// Argument id
        argument_id: RecordId,
        /// New truth score
        #[serde(default)]
        truth_score: Option<f64>,
        /// New importance
        #[serde(default)]
        importance_score: Option<f64>,
        /// New uniqueness
        #[serde(default)]
        uniqueness_score: Option<f64>,
    },

    /// Evidence linked to an argument or the claim
    #[serde(rename_all = "camelCase")]
    EvidenceAttached {
        /// Claim id
        claim_id: RecordId,
        /// Citing argument, absent for the claim itself
        #[serde(default)]
        argument_id: Option<RecordId>,
        /// The evidence record
        evidence: EvidenceRecord,
    },
}

impl EventRecord {
    /// Convert to an engine event
    pub fn to_event(&self) -> Result<MutationEvent> {
        Ok(match self {
            EventRecord::ArgumentSubmitted {
                claim_id,
                parent_id,
                argument,
            } => {
                if !argument.sub_arguments.is_empty() {
                    return Err(CliError::InvalidInput(
                        "Submitted arguments cannot carry subArguments".to_string(),
                    ));
                }
                MutationEvent::ArgumentSubmitted {
                    claim: claim_id.claim()?,
                    parent: parent_id.as_ref().map(RecordId::argument).transpose()?,
                    argument: argument.to_argument()?,
                }
            }
            EventRecord::EvidenceFalsified { evidence_id } => MutationEvent::EvidenceFalsified {
                evidence: evidence_id.evidence()?,
            },
            EventRecord::RelevanceChanged {
                claim_id,
                argument_id,
                relevance,
            } => MutationEvent::RelevanceChanged {
                claim: claim_id.claim()?,
                argument: argument_id.argument()?,
                relevance: Relevance::new(*relevance),
            },
            EventRecord::ScoresAdjusted {
                claim_id,
                argument_id,
                truth_score,
                importance_score,
                uniqueness_score,
            } => MutationEvent::ScoresAdjusted {
                claim: claim_id.claim()?,
                argument: argument_id.argument()?,
                adjustment: ScoreAdjustment {
                    truth: *truth_score,
                    importance: *importance_score,
                    uniqueness: *uniqueness_score,
                },
            },
            EventRecord::EvidenceAttached {
                claim_id,
                argument_id,
                evidence,
            } => MutationEvent::EvidenceAttached {
                claim: claim_id.claim()?,
                target: match argument_id {
                    Some(id) => EvidenceTarget::Argument(id.argument()?),
                    None => EvidenceTarget::Claim,
                },
                evidence: evidence.to_evidence()?,
            },
        })
    }
}

/// Load a JSON array of event records
pub fn load_events(path: &Path) -> Result<Vec<MutationEvent>> {
    let contents = fs::read_to_string(path)?;
    let records: Vec<EventRecord> = serde_json::from_str(&contents)?;
    records.iter().map(EventRecord::to_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ids() {
        assert_eq!(RecordId::Number(7).raw().unwrap(), 7);
        assert_eq!(RecordId::Text("42".into()).raw().unwrap(), 42);
        assert_eq!(
            RecordId::Text("00000000-0000-0000-0000-000000000010".into())
                .raw()
                .unwrap(),
            16
        );
        assert!(RecordId::Text("not-an-id".into()).raw().is_err());
    }

    #[test]
    fn test_argument_defaults_and_clamping() {
        let record: ArgumentRecord = serde_json::from_str(
            r#"{"id": 1, "claim": "Buses are cheap", "side": "pro", "truthScore": 1.4}"#,
        )
        .unwrap();
        let argument = record.to_argument().unwrap();

        assert_eq!(argument.truth_score, 1.0);
        assert_eq!(argument.linkage_score, 1.0);
        assert_eq!(argument.importance_score, 1.0);
        assert!(!argument.uniqueness.is_supplied());
        assert_eq!(argument.side, Side::Pro);
    }

    #[test]
    fn test_invalid_side() {
        let record: ArgumentRecord =
            serde_json::from_str(r#"{"id": 1, "claim": "x", "side": "maybe"}"#).unwrap();
        assert!(matches!(record.to_argument(), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_community_votes_become_layer_three() {
        let records: Vec<ArgumentRecord> = serde_json::from_str(
            r#"[
                {"id": 1, "claim": "a", "side": "pro"},
                {"id": 2, "claim": "b", "side": "pro",
                 "communityVotes": [{"other": 1, "same": 3.0, "different": 1.0}]}
            ]"#,
        )
        .unwrap();
        let (flat, debates) = flatten(&records).unwrap();
        let mut arguments: Vec<Argument> = flat.into_iter().map(|f| f.argument).collect();
        for debate in &debates {
            debate.apply(&mut arguments);
        }

        assert_eq!(arguments[0].community_score_with(&arguments[1]), Some(0.75));
    }

    #[test]
    fn test_event_record() {
        let record: EventRecord = serde_json::from_str(
            r#"{"type": "relevanceChanged", "claimId": 1, "argumentId": "2", "relevance": 0.0}"#,
        )
        .unwrap();
        let event = record.to_event().unwrap();
        assert_eq!(
            event,
            MutationEvent::RelevanceChanged {
                claim: ClaimId::from_value(1),
                argument: ArgumentId::from_value(2),
                relevance: Relevance::SEVERED,
            }
        );
    }
}
