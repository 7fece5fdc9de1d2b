//! Agglomerative clustering of samples.
//!
//! ## Pipeline
//!
//! ```text
//! samples ──► DistanceMetric ──► DissimilarityMatrix ──► agglomeration loop ──► ClusterTree
//!                                      ▲          │
//!                                      └──────────┘
//!                               Lance–Williams update (LinkageRule)
//! ```
//!
//! ## Linkage methods
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Centroid | distance of centroids | Can produce inversions |
//! | Median | distance of unweighted centroids | Can produce inversions |
//! | Ward | Variance increase | Minimizes within-cluster variance |
//! | Flexible-β | tunable | β < 0 dilates, β > 0 contracts space |
//!
//! All seven are one recurrence with different coefficients; see
//! [`LinkageRule`].
//!
//! ## Usage
//!
//! ```rust
//! use ampliclust::{DistanceMetric, HierarchicalClustering, LinkageMethod, Sample};
//!
//! let samples = vec![
//!     Sample::new("a", vec![0.0]),
//!     Sample::new("b", vec![1.0]),
//!     Sample::new("c", vec![5.0]),
//!     Sample::new("d", vec![6.0]),
//! ];
//!
//! let tree = HierarchicalClustering::new()
//!     .with_linkage(LinkageMethod::Single)
//!     .with_metric(DistanceMetric::Euclidean)
//!     .fit_tree(&samples)
//!     .unwrap();
//!
//! assert_eq!(tree.subordinate_count(), 4);
//! assert_eq!(tree.height(), 4.0);
//! assert_eq!(tree.labels(), vec!["a", "b", "c", "d"]);
//! ```

mod hierarchical;
mod linkage;
mod matrix;
mod traits;

pub use hierarchical::{HierarchicalClustering, RoundInfo};
pub use linkage::{LinkageMethod, LinkageRule};
pub use matrix::{pairwise_table, DissimilarityMatrix, DissimilarityTable};
pub use traits::Clustering;
