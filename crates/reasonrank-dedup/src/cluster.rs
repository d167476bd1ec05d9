//! Similarity clustering
//!
//! Arguments joined by blended-similarity edges at or above the threshold
//! form connected components. Each component gets a representative and a
//! score equal to the sum of its members' effective contributions.

use crate::scorer::ScoredArgument;
use reasonrank_domain::ArgumentId;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A group of near-duplicate arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentCluster {
    /// Stable identifier within one clustering run (`cluster-1`, `cluster-2`, ...)
    pub id: String,

    /// Member with the highest base score, earliest submission on ties
    pub representative_id: ArgumentId,

    /// Members, earliest submission first
    pub member_ids: Vec<ArgumentId>,

    /// Sum of the members' effective contributions
    pub cluster_score: f64,

    /// Whether the amplification cap reduced this cluster's members
    pub capped: bool,
}

impl ArgumentCluster {
    /// Number of members
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    /// Whether the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    /// Whether `id` belongs to this cluster
    pub fn contains(&self, id: ArgumentId) -> bool {
        self.member_ids.contains(&id)
    }
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }
}

/// Group scored arguments into similarity clusters
///
/// Every argument belongs to exactly one cluster; arguments with no edge
/// at or above `threshold` form singleton clusters. Clusters are ordered
/// by their earliest member.
pub fn cluster_arguments(scored: &[ScoredArgument], threshold: f64) -> Vec<ArgumentCluster> {
    let position: HashMap<ArgumentId, usize> = scored
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect();

    let mut sets = DisjointSet::new(scored.len());
    for (i, s) in scored.iter().enumerate() {
        for pair in &s.similarity_pairs {
            if pair.combined < threshold {
                continue;
            }
            if let Some(&j) = position.get(&pair.other) {
                sets.union(i, j);
            }
        }
    }

    let mut by_time: Vec<usize> = (0..scored.len()).collect();
    by_time.sort_by_key(|&i| (scored[i].submitted_at, scored[i].id));

    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in by_time {
        let root = sets.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }

    let clusters: Vec<ArgumentCluster> = groups
        .into_iter()
        .enumerate()
        .filter_map(|(n, members)| {
            // Members are in submission order, so the first maximum wins ties
            let representative = members.iter().copied().reduce(|best, i| {
                if scored[i].base_score > scored[best].base_score {
                    i
                } else {
                    best
                }
            })?;
            Some(ArgumentCluster {
                id: format!("cluster-{}", n + 1),
                representative_id: scored[representative].id,
                member_ids: members.iter().map(|&i| scored[i].id).collect(),
                cluster_score: members
                    .iter()
                    .map(|&i| scored[i].effective_contribution)
                    .sum(),
                capped: false,
            })
        })
        .collect();

    debug!(
        arguments = scored.len(),
        clusters = clusters.len(),
        threshold,
        "Clustered arguments"
    );
    clusters
}

/// Bound how much a cluster can amplify its strongest member
///
/// The anchor (highest uniqueness, earliest submission on ties) keeps its
/// uniqueness. The rest of the members are scaled by one common factor so
/// that the cluster's summed uniqueness is at most `cap × anchor`.
/// Contributions and cluster scores are updated to match. Returns the
/// number of clusters that were capped.
pub fn apply_amplification_cap(
    scored: &mut [ScoredArgument],
    clusters: &mut [ArgumentCluster],
    cap: f64,
) -> usize {
    let position: HashMap<ArgumentId, usize> = scored
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect();

    let mut capped = 0;
    for cluster in clusters.iter_mut() {
        let members: Vec<usize> = cluster
            .member_ids
            .iter()
            .filter_map(|id| position.get(id).copied())
            .collect();
        if members.len() < 2 {
            continue;
        }

        let Some(anchor) = members.iter().copied().reduce(|best, i| {
            if scored[i].uniqueness_score > scored[best].uniqueness_score {
                i
            } else {
                best
            }
        }) else {
            continue;
        };

        let anchor_uniqueness = scored[anchor].uniqueness_score;
        let others: f64 = members
            .iter()
            .filter(|&&i| i != anchor)
            .map(|&i| scored[i].uniqueness_score)
            .sum();
        let allowed = (cap - 1.0).max(0.0) * anchor_uniqueness;
        if others <= allowed {
            continue;
        }

        let factor = allowed / others;
        for &i in members.iter().filter(|&&i| i != anchor) {
            scored[i].scale(factor);
        }
        cluster.cluster_score = members
            .iter()
            .map(|&i| scored[i].effective_contribution)
            .sum();
        cluster.capped = true;
        capped += 1;

        warn!(
            cluster = %cluster.id,
            members = members.len(),
            factor,
            "Cluster amplification cap applied"
        );
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityPair;

    fn scored(id: u128, submitted_at: u64, base: f64, uniqueness: f64) -> ScoredArgument {
        ScoredArgument {
            id: ArgumentId::from_value(id),
            base_score: base,
            submitted_at,
            uniqueness_score: uniqueness,
            novelty_multiplier: 1.0,
            effective_contribution: base * uniqueness,
            similarity_pairs: Vec::new(),
        }
    }

    fn link(target: &mut ScoredArgument, other: u128, combined: f64) {
        target.similarity_pairs.push(SimilarityPair {
            other: ArgumentId::from_value(other),
            layer1: combined,
            layer2: None,
            layer3: None,
            combined,
            mechanical_duplicate: false,
        });
    }

    #[test]
    fn test_transitive_clustering() {
        let a = scored(1, 0, 1.0, 1.0);
        let mut b = scored(2, 1, 1.0, 0.25);
        let mut c = scored(3, 2, 1.0, 0.2);
        let d = scored(4, 3, 1.0, 1.0);
        link(&mut b, 1, 0.75);
        link(&mut c, 2, 0.8);
        link(&mut c, 1, 0.4);

        let clusters = cluster_arguments(&[a, b, c, d], 0.70);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, "cluster-1");
        assert_eq!(clusters[0].len(), 3);
        assert!(clusters[0].contains(ArgumentId::from_value(3)));
        assert!((clusters[0].cluster_score - 1.45).abs() < 1e-12);
        assert_eq!(clusters[1].member_ids, vec![ArgumentId::from_value(4)]);
    }

    #[test]
    fn test_representative_is_highest_base_score() {
        let a = scored(1, 0, 1.0, 1.0);
        let mut b = scored(2, 1, 3.0, 0.1);
        let mut c = scored(3, 2, 3.0, 0.1);
        link(&mut b, 1, 0.9);
        link(&mut c, 1, 0.9);

        let clusters = cluster_arguments(&[c, a, b], 0.70);
        assert_eq!(clusters.len(), 1);
        // b and c tie on base score; b was submitted first
        assert_eq!(clusters[0].representative_id, ArgumentId::from_value(2));
        assert_eq!(clusters[0].member_ids[0], ArgumentId::from_value(1));
    }

    #[test]
    fn test_cap_scales_non_anchor_members() {
        let anchor = scored(1, 0, 1.0, 1.0);
        let mut members = vec![anchor];
        for id in 2..=11 {
            let mut clone = scored(id, id as u64, 1.0, 0.5);
            link(&mut clone, 1, 0.9);
            members.push(clone);
        }

        let mut clusters = cluster_arguments(&members, 0.70);
        let capped = apply_amplification_cap(&mut members, &mut clusters, 2.0);

        assert_eq!(capped, 1);
        assert!(clusters[0].capped);
        assert_eq!(members[0].uniqueness_score, 1.0);
        let total: f64 = members.iter().map(|m| m.uniqueness_score).sum();
        assert!((total - 2.0).abs() < 1e-9);
        assert!((clusters[0].cluster_score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_leaves_small_clusters_alone() {
        let a = scored(1, 0, 1.0, 1.0);
        let mut b = scored(2, 1, 1.0, 0.3);
        link(&mut b, 1, 0.7);
        let mut members = vec![a, b];

        let mut clusters = cluster_arguments(&members, 0.70);
        assert_eq!(apply_amplification_cap(&mut members, &mut clusters, 2.0), 0);
        assert_eq!(members[1].uniqueness_score, 0.3);
        assert!(!clusters[0].capped);
    }

    #[test]
    fn test_empty_input() {
        let clusters = cluster_arguments(&[], 0.7);
        assert!(clusters.is_empty());
    }
}
