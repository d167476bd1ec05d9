//! Community verdicts on argument equivalence
//!
//! When two arguments might be the same point in different words, the
//! community can hold a small sub-debate: "these are the same" versus
//! "these are different". The weighted outcome becomes Layer 3 similarity.

use reasonrank_domain::{unit_clamp, Argument, ArgumentId};
use tracing::debug;

/// Resolve weighted same/different votes into a similarity in `[0, 1]`
///
/// With no votes the community is undecided and the result is 0.5.
pub fn resolve_verdict(same_weight: f64, different_weight: f64) -> f64 {
    let same = same_weight.max(0.0);
    let different = different_weight.max(0.0);
    let total = same + different;
    if total <= 0.0 || !total.is_finite() {
        return 0.5;
    }
    unit_clamp(same / total)
}

/// An "are these two arguments the same?" sub-debate
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceDebate {
    /// First argument
    pub left: ArgumentId,

    /// Second argument
    pub right: ArgumentId,

    /// Accumulated weight of "same argument" votes
    pub same_weight: f64,

    /// Accumulated weight of "different argument" votes
    pub different_weight: f64,
}

impl EquivalenceDebate {
    /// Open a debate with no votes
    pub fn new(left: ArgumentId, right: ArgumentId) -> Self {
        Self {
            left,
            right,
            same_weight: 0.0,
            different_weight: 0.0,
        }
    }

    /// Record a weighted vote that the arguments are the same
    pub fn vote_same(&mut self, weight: f64) {
        self.same_weight += weight.max(0.0);
    }

    /// Record a weighted vote that the arguments differ
    pub fn vote_different(&mut self, weight: f64) {
        self.different_weight += weight.max(0.0);
    }

    /// Resolved Layer-3 similarity
    pub fn resolve(&self) -> f64 {
        resolve_verdict(self.same_weight, self.different_weight)
    }

    /// Record the resolved verdict on the debate's arguments
    ///
    /// Returns how many of the given arguments took part in the debate.
    pub fn apply(&self, arguments: &mut [Argument]) -> usize {
        let verdict = self.resolve();
        let mut applied = 0;
        for argument in arguments.iter_mut() {
            let other = if argument.id == self.left {
                self.right
            } else if argument.id == self.right {
                self.left
            } else {
                continue;
            };
            argument.community_scores.insert(other, verdict);
            applied += 1;
        }
        debug!(
            left = %self.left,
            right = %self.right,
            verdict,
            "Applied community equivalence verdict"
        );
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reasonrank_domain::Side;

    #[test]
    fn test_no_votes_is_undecided() {
        let debate = EquivalenceDebate::new(ArgumentId::from_value(1), ArgumentId::from_value(2));
        assert_eq!(debate.resolve(), 0.5);
    }

    #[test]
    fn test_weighted_votes() {
        let mut debate =
            EquivalenceDebate::new(ArgumentId::from_value(1), ArgumentId::from_value(2));
        debate.vote_same(3.0);
        debate.vote_different(1.0);
        debate.vote_different(-5.0);
        assert_eq!(debate.resolve(), 0.75);
    }

    #[test]
    fn test_resolve_verdict_edges() {
        assert_eq!(resolve_verdict(0.0, 0.0), 0.5);
        assert_eq!(resolve_verdict(2.0, 0.0), 1.0);
        assert_eq!(resolve_verdict(0.0, 2.0), 0.0);
        assert_eq!(resolve_verdict(f64::INFINITY, 1.0), 0.5);
    }

    #[test]
    fn test_apply_records_symmetric_scores() {
        let left = ArgumentId::from_value(1);
        let right = ArgumentId::from_value(2);
        let mut arguments = vec![
            Argument::new(left, "a", Side::Pro),
            Argument::new(right, "b", Side::Pro),
            Argument::new(ArgumentId::from_value(3), "c", Side::Pro),
        ];

        let mut debate = EquivalenceDebate::new(left, right);
        debate.vote_same(1.0);
        assert_eq!(debate.apply(&mut arguments), 2);

        assert_eq!(arguments[0].community_score_with(&arguments[1]), Some(1.0));
        assert_eq!(arguments[1].community_scores.get(&left), Some(&1.0));
        assert!(arguments[2].community_scores.is_empty());
    }
}
