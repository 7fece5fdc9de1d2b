//! # ampliclust
//!
//! Groups amplicon-sequencing samples by community similarity into a
//! deterministic binary dendrogram.
//!
//! The core is an agglomerative clustering engine: a small distance-metric
//! library, the Lance–Williams linkage family, an incrementally maintained
//! dissimilarity matrix, tie-aware merge selection and a tree with
//! canonical leaf order. Rendering, typesetting and sample loading live in
//! the surrounding export layer; this crate hands it a [`ClusterTree`] and,
//! for tables, a [`DissimilarityTable`].
//!
//! Samples, metrics and the tree types build without features. The
//! agglomeration engine and its configuration sit behind the default
//! `cluster` feature.

#[cfg(feature = "cluster")]
pub mod cluster;
#[cfg(feature = "cluster")]
pub mod config;
pub mod distance;
/// Error types used across `ampliclust`.
pub mod error;
pub mod hierarchy;
pub mod sample;


#[cfg(feature = "cluster")]
pub use cluster::{
    pairwise_table, Clustering, DissimilarityMatrix, DissimilarityTable, HierarchicalClustering,
    LinkageMethod, LinkageRule, RoundInfo,
};
#[cfg(feature = "cluster")]
pub use config::ClusterConfig;
pub use distance::DistanceMetric;
pub use error::{Error, Result};
pub use hierarchy::{Cluster, ClusterTree, Dendrogram, LabelOrder, Layout};
pub use sample::{validate_samples, Sample};
