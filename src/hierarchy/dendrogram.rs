//! Flat merge history of an agglomeration run.
//!
//! Cluster ids follow the SciPy/MATLAB convention: leaves are `0..n` (the
//! sample index) and the `i`-th merge creates cluster `n + i`.

use crate::error::{Error, Result};

/// Merge history of one clustering run.
///
/// Each merge records:
/// - which clusters were merged
/// - the round it happened in (tied merges share a round)
/// - the distance at which they merged
/// - the size of the resulting cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    merges: Vec<MergeStep>,
    n_items: usize,
}

/// A single merge in the history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStep {
    /// First cluster id (position `a` in the active list).
    pub cluster_a: usize,
    /// Second cluster id.
    pub cluster_b: usize,
    /// Agglomeration round, starting at 0.
    pub round: usize,
    /// Merge height.
    pub distance: f64,
    /// Leaves in the resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create an empty history for `n_items` leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge; returns the id of the new cluster.
    pub fn add_merge(
        &mut self,
        cluster_a: usize,
        cluster_b: usize,
        round: usize,
        distance: f64,
        size: usize,
    ) -> usize {
        self.merges.push(MergeStep {
            cluster_a,
            cluster_b,
            round,
            distance,
            size,
        });
        self.n_items + self.merges.len() - 1
    }

    /// Group assignment after applying merges in order until the first one
    /// above `threshold`.
    pub fn cut_at_distance(&self, threshold: f64) -> Vec<usize> {
        let applied = self
            .merges
            .iter()
            .position(|m| m.distance > threshold)
            .unwrap_or(self.merges.len());
        self.assign(applied)
    }

    /// Group assignment with exactly `k` groups.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_items {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be between 1 and the number of samples",
            });
        }
        Ok(self.assign(self.n_items - k))
    }

    /// Labels `0..groups` per leaf after the first `applied` merges,
    /// numbered by first appearance.
    fn assign(&self, applied: usize) -> Vec<usize> {
        let total = self.n_items + self.merges.len();
        let mut parent: Vec<usize> = (0..total).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for (i, merge) in self.merges.iter().take(applied).enumerate() {
            let id = self.n_items + i;
            let ra = find(&mut parent, merge.cluster_a);
            let rb = find(&mut parent, merge.cluster_b);
            parent[ra] = id;
            parent[rb] = id;
        }

        let mut roots: Vec<usize> = Vec::new();
        (0..self.n_items)
            .map(|leaf| {
                let root = find(&mut parent, leaf);
                match roots.iter().position(|&r| r == root) {
                    Some(label) => label,
                    None => {
                        roots.push(root);
                        roots.len() - 1
                    }
                }
            })
            .collect()
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Number of agglomeration rounds.
    pub fn rounds(&self) -> usize {
        self.merges.last().map_or(0, |m| m.round + 1)
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &MergeStep> {
        self.merges.iter()
    }

    /// Merge heights in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_points() -> Dendrogram {
        let mut dendro = Dendrogram::new(4);
        assert_eq!(dendro.add_merge(0, 1, 0, 1.0, 2), 4);
        assert_eq!(dendro.add_merge(2, 3, 0, 1.0, 2), 5);
        assert_eq!(dendro.add_merge(4, 5, 1, 4.0, 4), 6);
        dendro
    }

    #[test]
    fn test_dendrogram_creation() {
        let dendro = Dendrogram::new(5);
        assert_eq!(dendro.n_items(), 5);
        assert_eq!(dendro.n_merges(), 0);
        assert_eq!(dendro.rounds(), 0);
    }

    #[test]
    fn test_rounds_and_distances() {
        let dendro = four_points();
        assert_eq!(dendro.n_merges(), 3);
        assert_eq!(dendro.rounds(), 2);
        assert_eq!(dendro.distances(), vec![1.0, 1.0, 4.0]);
    }

    #[test]
    fn test_cut_to_k() {
        let dendro = four_points();
        assert_eq!(dendro.cut_to_k(4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(dendro.cut_to_k(2).unwrap(), vec![0, 0, 1, 1]);
        assert_eq!(dendro.cut_to_k(1).unwrap(), vec![0, 0, 0, 0]);
        assert!(dendro.cut_to_k(0).is_err());
        assert!(dendro.cut_to_k(5).is_err());
    }

    #[test]
    fn test_cut_at_distance() {
        let dendro = four_points();
        assert_eq!(dendro.cut_at_distance(0.5), vec![0, 1, 2, 3]);
        assert_eq!(dendro.cut_at_distance(1.0), vec![0, 0, 1, 1]);
        assert_eq!(dendro.cut_at_distance(10.0), vec![0, 0, 0, 0]);
    }
}
