//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters until one remains.
//!
//! # The agglomeration loop
//!
//! ```text
//! S = all leaves, D = leaf-to-leaf matrix
//! while |S| > 1:
//!     m  = min off-diagonal D
//!     P  = every pair at exactly m, scanned in (lo, hi) order,
//!          skipping pairs whose members were already taken this round
//!     for (a, b) in P: merge a and b, D = Lance–Williams update of D
//! ```
//!
//! Disjoint ties therefore merge in the same round and at the same height.
//! Among overlapping ties (three or more mutually equidistant clusters) the
//! lowest-index pair wins. Tie detection is exact floating-point equality,
//! so ties that only exist up to rounding are not merged together.
//!
//! Each round is an O(n²) matrix rebuild, O(n³) for the whole run. The run
//! owns all of its state; independent runs can execute concurrently.

use tracing::{debug, info, trace};

use super::linkage::{LinkageMethod, LinkageRule};
use super::matrix::DissimilarityMatrix;
use super::traits::Clustering;
use crate::config::ClusterConfig;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::hierarchy::{Cluster, ClusterTree, Dendrogram, LabelOrder};
use crate::sample::{validate_samples, Sample};

/// Progress reported at each round boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundInfo {
    /// Round about to run, starting at 0.
    pub round: usize,
    /// Active clusters before the round.
    pub active: usize,
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    config: ClusterConfig,
    /// Group count for [`Clustering::fit_predict`].
    n_clusters: usize,
}

impl Default for HierarchicalClustering {
    fn default() -> Self {
        Self::new()
    }
}

struct Active {
    id: usize,
    cluster: Cluster,
}

impl HierarchicalClustering {
    /// Create a clusterer with the default configuration.
    pub fn new() -> Self {
        Self::from_config(ClusterConfig::default())
    }

    /// Create a clusterer from a configuration.
    pub fn from_config(config: ClusterConfig) -> Self {
        Self {
            config,
            n_clusters: 1,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, method: LinkageMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Set distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Set leaf label order.
    pub fn with_label_order(mut self, order: LabelOrder) -> Self {
        self.config.label_order = order;
        self
    }

    /// Set the group count used by [`Clustering::fit_predict`].
    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Cluster `samples` into a canonically ordered tree.
    pub fn fit_tree(&self, samples: &[Sample]) -> Result<ClusterTree> {
        self.fit_tree_with(samples, |_| false)
    }

    /// Like [`fit_tree`](Self::fit_tree), asking `should_stop` before every
    /// round. Returning `true` abandons the run with [`Error::Cancelled`].
    pub fn fit_tree_with<F>(&self, samples: &[Sample], mut should_stop: F) -> Result<ClusterTree>
    where
        F: FnMut(&RoundInfo) -> bool,
    {
        let rule = self.config.validate()?;
        validate_samples(samples)?;

        let n = samples.len();
        let mut matrix =
            DissimilarityMatrix::initialize(samples_as_vectors(samples).as_slice(), |a, b| {
                rule.working_distance(a, b)
            })?;
        let mut active: Vec<Active> = samples
            .iter()
            .enumerate()
            .map(|(id, sample)| Active {
                id,
                cluster: Cluster::leaf(id, sample),
            })
            .collect();
        let mut history = Dendrogram::new(n);

        let mut round = 0;
        while active.len() > 1 {
            let info = RoundInfo {
                round,
                active: active.len(),
            };
            if should_stop(&info) {
                return Err(Error::Cancelled { round });
            }

            if let Some(value) = matrix.first_non_finite() {
                return Err(Error::NonFiniteDissimilarity { round, value });
            }
            let mindiss = matrix.min_off_diagonal().unwrap_or(f64::NAN);
            if !mindiss.is_finite() {
                return Err(Error::NonFiniteDissimilarity {
                    round,
                    value: mindiss,
                });
            }

            let tied = select_disjoint(&matrix.pairs_at(mindiss), active.len());
            let pairs: Vec<(usize, usize)> = tied
                .into_iter()
                .map(|(a, b)| (active[a].id, active[b].id))
                .collect();
            let height = rule.finish(mindiss);

            for &(id_a, id_b) in &pairs {
                let (a, b) = (position(&active, id_a)?, position(&active, id_b)?);
                let sizes: Vec<usize> = active
                    .iter()
                    .map(|c| c.cluster.subordinate_count())
                    .collect();
                matrix = matrix.update(a, b, &sizes, &rule);

                let right = active.remove(b);
                let left = active.remove(a);
                let cluster = Cluster::merge(left.cluster, right.cluster, height);
                let size = cluster.subordinate_count();
                let id = history.add_merge(id_a, id_b, round, height, size);
                trace!(round, id_a, id_b, id, height, "merge");
                active.insert(a, Active { id, cluster });
            }

            debug!(
                round,
                active = active.len(),
                mindiss,
                merges = pairs.len(),
                "agglomeration round"
            );
            round += 1;
        }

        let mut root = match active.pop() {
            Some(last) => last.cluster,
            None => return Err(Error::EmptyInput),
        };
        root.canonicalize(self.config.label_order);

        info!(
            samples = n,
            rounds = round,
            method = %self.config.method,
            metric = %self.config.metric,
            height = root.distance(),
            "clustering finished"
        );
        Ok(ClusterTree::new(root, history, rule.label()))
    }

    /// The resolved linkage rule for the current configuration.
    pub fn rule(&self) -> Result<LinkageRule> {
        self.config.validate()
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, samples: &[Sample]) -> Result<Vec<usize>> {
        let tree = self.fit_tree(samples)?;
        tree.history().cut_to_k(self.n_clusters)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

fn samples_as_vectors(samples: &[Sample]) -> Vec<&[f64]> {
    samples.iter().map(|s| s.abundances.as_slice()).collect()
}

fn position(active: &[Active], id: usize) -> Result<usize> {
    active
        .iter()
        .position(|c| c.id == id)
        .ok_or(Error::InvalidParameter {
            name: "cluster id",
            message: "cluster consumed twice in one round",
        })
}

/// Greedy disjoint subset of `pairs`, in the given order.
fn select_disjoint(pairs: &[(usize, usize)], n: usize) -> Vec<(usize, usize)> {
    let mut taken = vec![false; n];
    let mut out = Vec::new();
    for &(a, b) in pairs {
        if taken[a] || taken[b] {
            continue;
        }
        taken[a] = true;
        taken[b] = true;
        out.push((a, b));
    }
    out
}
