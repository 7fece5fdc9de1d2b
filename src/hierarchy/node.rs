//! Dendrogram nodes.

use core::fmt;

use crate::hierarchy::order::LabelOrder;
use crate::sample::Sample;

/// A leaf: one original sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Position of the sample in the input slice.
    pub index: usize,
    /// Sample label.
    pub label: String,
    /// Abundance vector.
    pub abundances: Vec<f64>,
    /// Style tags passed through to the renderer.
    pub style: Vec<String>,
}

/// Two clusters joined at a given distance.
///
/// The node owns both children exclusively. Children are only ever swapped
/// by [`Cluster::canonicalize`]; topology and distances never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    left: Box<Cluster>,
    right: Box<Cluster>,
    distance: f64,
    size: usize,
}

impl Merge {
    /// Left child.
    pub fn left(&self) -> &Cluster {
        &self.left
    }

    /// Right child.
    pub fn right(&self) -> &Cluster {
        &self.right
    }

    /// Height at which the children joined.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// A node of the cluster tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Cluster {
    /// One sample.
    Leaf(Leaf),
    /// Two child clusters.
    Merge(Merge),
}

impl Cluster {
    /// Leaf for the sample at `index`.
    pub fn leaf(index: usize, sample: &Sample) -> Self {
        Cluster::Leaf(Leaf {
            index,
            label: sample.label.clone(),
            abundances: sample.abundances.clone(),
            style: sample.style.clone(),
        })
    }

    /// Join two clusters at `distance`.
    pub fn merge(left: Cluster, right: Cluster, distance: f64) -> Self {
        let size = left.subordinate_count() + right.subordinate_count();
        Cluster::Merge(Merge {
            left: Box::new(left),
            right: Box::new(right),
            distance,
            size,
        })
    }

    /// Number of leaves under this node (1 for a leaf).
    pub fn subordinate_count(&self) -> usize {
        match self {
            Cluster::Leaf(_) => 1,
            Cluster::Merge(m) => m.size,
        }
    }

    /// Merge height; 0 for a leaf.
    pub fn distance(&self) -> f64 {
        match self {
            Cluster::Leaf(_) => 0.0,
            Cluster::Merge(m) => m.distance,
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Cluster::Leaf(_))
    }

    /// The leaf, if this is one.
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Cluster::Leaf(leaf) => Some(leaf),
            Cluster::Merge(_) => None,
        }
    }

    /// The children, if this is a merge.
    pub fn children(&self) -> Option<(&Cluster, &Cluster)> {
        match self {
            Cluster::Leaf(_) => None,
            Cluster::Merge(m) => Some((&*m.left, &*m.right)),
        }
    }

    /// Leftmost leaf.
    pub fn first_leaf(&self) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                Cluster::Leaf(leaf) => return leaf,
                Cluster::Merge(m) => node = &*m.left,
            }
        }
    }

    /// Rightmost leaf.
    pub fn last_leaf(&self) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                Cluster::Leaf(leaf) => return leaf,
                Cluster::Merge(m) => node = &*m.right,
            }
        }
    }

    /// Label of the leftmost leaf.
    pub fn first_label(&self) -> &str {
        &self.first_leaf().label
    }

    /// Label of the rightmost leaf.
    pub fn last_label(&self) -> &str {
        &self.last_leaf().label
    }

    /// Style tags of a leaf; empty for merges.
    pub fn style(&self) -> &[String] {
        match self {
            Cluster::Leaf(leaf) => &leaf.style,
            Cluster::Merge(_) => &[],
        }
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::with_capacity(self.subordinate_count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Cluster::Leaf(leaf) => out.push(leaf),
                Cluster::Merge(m) => {
                    stack.push(&*m.right);
                    stack.push(&*m.left);
                }
            }
        }
        out
    }

    /// Swap children bottom-up so that every left child's first label sorts
    /// before its sibling's under `order`.
    pub fn canonicalize(&mut self, order: LabelOrder) {
        if let Cluster::Merge(m) = self {
            m.left.canonicalize(order);
            m.right.canonicalize(order);
            if order.compare(m.right.first_label(), m.left.first_label()).is_lt() {
                core::mem::swap(&mut m.left, &mut m.right);
            }
        }
    }
}

impl fmt::Display for Cluster {
    /// Newick-style rendering: `((a,b):1,c):2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Leaf(leaf) => write!(f, "{}", leaf.label),
            Cluster::Merge(m) => write!(f, "({},{}):{}", m.left, m.right, m.distance),
        }
    }
}
