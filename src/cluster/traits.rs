//! Clustering traits.

use crate::error::Result;
use crate::sample::Sample;

/// Flat clustering of samples.
pub trait Clustering {
    /// Fit the model to samples and return group assignments.
    ///
    /// Returns one group label per input sample, numbered from 0 in order of
    /// first appearance.
    fn fit_predict(&self, samples: &[Sample]) -> Result<Vec<usize>>;

    /// Get the number of groups.
    fn n_clusters(&self) -> usize;
}
