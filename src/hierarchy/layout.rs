//! Coordinates for drawing a dendrogram.
//!
//! Leaves sit at integer vertical positions `0, 1, 2, ...` in left-to-right
//! order with horizontal position 0. A merge sits halfway between its
//! children vertically, at its merge distance horizontally:
//!
//! ```text
//!  y
//!  0  a ──┐
//!         ├──┐        merge (a,b) at x = 1, y = 0.5
//!  1  b ──┘  │
//!            ├──      root at x = 4, y = 1.25
//!  2  c ─────┘
//! ```
//!
//! Run [`Cluster::canonicalize`](crate::Cluster::canonicalize) first; the
//! layout follows whatever child order the tree currently has.

use crate::hierarchy::node::Cluster;

/// One node's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Sample index of a leaf, or of the leftmost leaf under a merge.
    pub leaf_index: usize,
    /// Vertical position.
    pub y: f64,
    /// Horizontal position: merge distance, 0 for leaves.
    pub x: f64,
    /// Leaves under the node.
    pub subordinates: usize,
}

impl Placement {
    /// True for leaf placements.
    pub fn is_leaf(&self) -> bool {
        self.subordinates == 1
    }
}

/// Axis-aligned line piece, endpoints as `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub from: (f64, f64),
    /// End point.
    pub to: (f64, f64),
}

/// Everything a line renderer needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Node positions in post-order (children before parents, root last).
    pub placements: Vec<Placement>,
    /// Child stems and merge bars.
    pub segments: Vec<Segment>,
}

impl Layout {
    /// Leaf placements in vertical order.
    pub fn leaves(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(|p| p.is_leaf())
    }

    /// Root placement.
    pub fn root(&self) -> Option<&Placement> {
        self.placements.last()
    }
}

/// Assign coordinates to every node under `root`.
pub fn layout(root: &Cluster) -> Layout {
    let mut out = Layout::default();
    let mut next_row = 0usize;
    place(root, &mut next_row, &mut out);
    out
}

fn place(node: &Cluster, next_row: &mut usize, out: &mut Layout) -> Placement {
    let placement = match node.children() {
        None => {
            let y = *next_row as f64;
            *next_row += 1;
            Placement {
                leaf_index: node.first_leaf().index,
                y,
                x: 0.0,
                subordinates: 1,
            }
        }
        Some((left, right)) => {
            let l = place(left, next_row, out);
            let r = place(right, next_row, out);
            let x = node.distance();
            out.segments.push(Segment {
                from: (l.x, l.y),
                to: (x, l.y),
            });
            out.segments.push(Segment {
                from: (r.x, r.y),
                to: (x, r.y),
            });
            out.segments.push(Segment {
                from: (x, l.y),
                to: (x, r.y),
            });
            Placement {
                leaf_index: l.leaf_index,
                y: (l.y + r.y) / 2.0,
                x,
                subordinates: node.subordinate_count(),
            }
        }
    };
    out.placements.push(placement);
    placement
}
