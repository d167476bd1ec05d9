//! A claim together with its argument arena and referenced evidence

use crate::{Argument, ArgumentId, ArgumentTree, Claim, DomainError, Evidence, EvidenceId, NodeIndex};
use std::collections::BTreeMap;

/// Everything needed to score one claim
///
/// Evidence records are referenced by id from arguments and from the claim
/// itself. Each graph holds the records it references so that claims can be
/// scored independently; the score book keeps copies in sync when a record
/// is falsified.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimGraph {
    /// The claim being scored
    pub claim: Claim,
    tree: ArgumentTree,
    evidence: BTreeMap<EvidenceId, Evidence>,
}

impl ClaimGraph {
    /// Assemble a graph, checking that every cited evidence id is present
    pub fn new(
        claim: Claim,
        tree: ArgumentTree,
        evidence: impl IntoIterator<Item = Evidence>,
    ) -> Result<Self, DomainError> {
        let graph = Self {
            claim,
            tree,
            evidence: evidence.into_iter().map(|e| (e.id, e)).collect(),
        };
        graph.check_citations()?;
        Ok(graph)
    }

    fn check_citations(&self) -> Result<(), DomainError> {
        let cited = self
            .claim
            .evidence
            .iter()
            .chain(self.tree.iter().flat_map(|(_, n)| n.argument.evidence.iter()));
        for id in cited {
            if !self.evidence.contains_key(id) {
                return Err(DomainError::UnknownEvidence(*id));
            }
        }
        Ok(())
    }

    /// The argument arena
    pub fn tree(&self) -> &ArgumentTree {
        &self.tree
    }

    /// Look up an evidence record
    pub fn evidence(&self, id: EvidenceId) -> Option<&Evidence> {
        self.evidence.get(&id)
    }

    /// All evidence records held by this graph
    pub fn evidence_records(&self) -> impl Iterator<Item = &Evidence> {
        self.evidence.values()
    }

    /// Whether this graph holds the given evidence record
    pub fn references_evidence(&self, id: EvidenceId) -> bool {
        self.evidence.contains_key(&id)
    }

    /// Resolve evidence ids to records, skipping unknown ids
    pub fn resolve<'a>(&'a self, ids: &'a [EvidenceId]) -> impl Iterator<Item = &'a Evidence> + 'a {
        ids.iter().filter_map(move |id| self.evidence.get(id))
    }

    /// Evidence attached directly to the claim
    pub fn claim_evidence(&self) -> Vec<&Evidence> {
        self.resolve(&self.claim.evidence).collect()
    }

    /// Attach a new argument, validating its evidence citations
    pub fn attach_argument(
        &mut self,
        parent: Option<ArgumentId>,
        argument: Argument,
    ) -> Result<NodeIndex, DomainError> {
        if let Some(missing) = argument.evidence.iter().find(|e| !self.evidence.contains_key(*e)) {
            return Err(DomainError::UnknownEvidence(*missing));
        }
        self.tree.attach(parent, argument)
    }

    /// Edit an argument in place (see [`ArgumentTree::update`])
    pub fn update_argument<F>(&mut self, id: ArgumentId, edit: F) -> Result<NodeIndex, DomainError>
    where
        F: FnOnce(&mut Argument),
    {
        let node = self.tree.find(id).ok_or(DomainError::UnknownArgument(id))?;
        let mut edited = self.tree.argument(node).clone();
        edit(&mut edited);
        if let Some(missing) = edited.evidence.iter().find(|e| !self.evidence.contains_key(*e)) {
            return Err(DomainError::UnknownEvidence(*missing));
        }
        self.tree.update(id, |argument| *argument = edited)
    }

    /// Insert or replace an evidence record
    pub fn insert_evidence(&mut self, evidence: Evidence) {
        self.evidence.insert(evidence.id, evidence);
    }

    /// Falsify an evidence record
    ///
    /// Returns `true` if the record changed.
    pub fn falsify_evidence(&mut self, id: EvidenceId) -> Result<bool, DomainError> {
        self.evidence
            .get_mut(&id)
            .map(Evidence::falsify)
            .ok_or(DomainError::UnknownEvidence(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgumentSpec, ClaimId, QualityTier, Side};

    fn evidence(id: u128) -> Evidence {
        Evidence::new(EvidenceId::from_value(id), QualityTier::T1)
    }

    #[test]
    fn test_new_rejects_missing_evidence() {
        let claim = Claim::new(ClaimId::from_value(1), "c").with_evidence(EvidenceId::from_value(5));
        let err = ClaimGraph::new(claim, ArgumentTree::new(), Vec::<Evidence>::new()).unwrap_err();
        assert_eq!(err, DomainError::UnknownEvidence(EvidenceId::from_value(5)));
    }

    #[test]
    fn test_falsify_shared_evidence() {
        let e = EvidenceId::from_value(5);
        let tree = ArgumentTree::from_specs(vec![
            ArgumentSpec::leaf(Argument::new(ArgumentId::from_value(1), "a", Side::Pro).with_evidence(e)),
            ArgumentSpec::leaf(Argument::new(ArgumentId::from_value(2), "b", Side::Pro).with_evidence(e)),
        ])
        .unwrap();
        let mut graph = ClaimGraph::new(Claim::new(ClaimId::from_value(1), "c"), tree, vec![evidence(5)]).unwrap();

        assert!(graph.falsify_evidence(e).unwrap());
        assert!(!graph.falsify_evidence(e).unwrap());
        assert_eq!(graph.tree().nodes_citing(e).len(), 2);
        assert!(!graph.evidence(e).unwrap().is_live());
        assert!(graph.falsify_evidence(EvidenceId::from_value(6)).is_err());
    }

    #[test]
    fn test_attach_argument_checks_citations() {
        let mut graph =
            ClaimGraph::new(Claim::new(ClaimId::from_value(1), "c"), ArgumentTree::new(), vec![evidence(5)]).unwrap();

        let ok = Argument::new(ArgumentId::from_value(1), "a", Side::Pro).with_evidence(EvidenceId::from_value(5));
        assert!(graph.attach_argument(None, ok).is_ok());

        let bad = Argument::new(ArgumentId::from_value(2), "b", Side::Pro).with_evidence(EvidenceId::from_value(6));
        assert!(graph.attach_argument(None, bad).is_err());
        assert_eq!(graph.tree().len(), 1);
    }
}
