//! The finished cluster tree handed to renderers and table writers.

use crate::hierarchy::dendrogram::Dendrogram;
use crate::hierarchy::layout::{layout, Layout};
use crate::hierarchy::node::{Cluster, Leaf};
use crate::hierarchy::order::LabelOrder;

/// Root of a completed agglomeration plus its merge history.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterTree {
    root: Cluster,
    history: Dendrogram,
    axis_label: String,
}

impl ClusterTree {
    /// Wrap a finished root.
    pub fn new(root: Cluster, history: Dendrogram, axis_label: impl Into<String>) -> Self {
        Self {
            root,
            history,
            axis_label: axis_label.into(),
        }
    }

    /// Root node.
    pub fn root(&self) -> &Cluster {
        &self.root
    }

    /// Consume the tree, keeping only the root.
    pub fn into_root(self) -> Cluster {
        self.root
    }

    /// Merge history in the order merges happened.
    pub fn history(&self) -> &Dendrogram {
        &self.history
    }

    /// Linkage and metric description for the distance axis.
    pub fn axis_label(&self) -> &str {
        &self.axis_label
    }

    /// Number of leaves.
    pub fn subordinate_count(&self) -> usize {
        self.root.subordinate_count()
    }

    /// Height of the root merge.
    pub fn height(&self) -> f64 {
        self.root.distance()
    }

    /// Reorder children so that left subtrees start with the smaller label.
    pub fn canonicalize(&mut self, order: LabelOrder) {
        self.root.canonicalize(order);
    }

    /// Leaves left to right.
    pub fn leaves(&self) -> Vec<&Leaf> {
        self.root.leaves()
    }

    /// Sample indices left to right.
    pub fn leaf_order(&self) -> Vec<usize> {
        self.root.leaves().iter().map(|leaf| leaf.index).collect()
    }

    /// Leaf labels left to right.
    pub fn labels(&self) -> Vec<&str> {
        self.root
            .leaves()
            .into_iter()
            .map(|leaf| leaf.label.as_str())
            .collect()
    }

    /// Drawing coordinates in the current child order.
    pub fn layout(&self) -> Layout {
        layout(&self.root)
    }

    /// Cophenetic matrix indexed by sample index: entry `(i, j)` is the
    /// height of the lowest merge containing both leaves.
    pub fn cophenetic(&self) -> Vec<Vec<f64>> {
        let n = self.subordinate_count();
        let mut out = vec![vec![0.0; n]; n];
        fill_cophenetic(&self.root, &mut out);
        out
    }
}

/// Returns the sample indices under `node`.
fn fill_cophenetic(node: &Cluster, out: &mut [Vec<f64>]) -> Vec<usize> {
    match node.children() {
        None => vec![node.first_leaf().index],
        Some((left, right)) => {
            let mut l = fill_cophenetic(left, out);
            let r = fill_cophenetic(right, out);
            let h = node.distance();
            for &i in &l {
                for &j in &r {
                    out[i][j] = h;
                    out[j][i] = h;
                }
            }
            l.extend(r);
            l
        }
    }
}
