//! The cluster tree and everything renderers read from it.
//!
//! ```text
//!         *  (height=4)
//!        / \
//!       *   *  (height=1)
//!      / \ / \
//!     a  b c  d
//! ```
//!
//! - [`Cluster`]: a leaf or a merge of two owned subtrees.
//! - [`ClusterTree`]: the finished root plus its [`Dendrogram`] merge history.
//! - [`LabelOrder`]: comparators for canonical left-to-right leaf order.
//! - [`Layout`]: coordinates and line segments for drawing.
//! - [`ultrametric`]: cophenetic comparisons against raw dissimilarities.

mod dendrogram;
mod layout;
mod node;
mod order;
mod tree;
pub mod ultrametric;

pub use dendrogram::{Dendrogram, MergeStep};
pub use layout::{layout, Layout, Placement, Segment};
pub use node::{Cluster, Leaf, Merge};
pub use order::LabelOrder;
pub use tree::ClusterTree;
