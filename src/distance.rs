//! Pairwise dissimilarity between abundance vectors.
//!
//! | Metric | Formula |
//! |--------|---------|
//! | Euclidean | sqrt(Σ(aᵢ−bᵢ)²) |
//! | Squared Euclidean | Σ(aᵢ−bᵢ)² |
//! | Bray-Curtis | 1 − 2·Σmin(aᵢ,bᵢ) / Σ(aᵢ+bᵢ) |
//!
//! Bray-Curtis is undefined when both vectors sum to zero. Two empty
//! communities are treated as identical, so the distance is `0.0`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Distance metric used to build the leaf dissimilarity matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    /// Straight-line distance.
    Euclidean,
    /// Euclidean distance without the final square root.
    SquaredEuclidean,
    /// Bray-Curtis dissimilarity in [0, 1].
    #[default]
    BrayCurtis,
}

impl DistanceMetric {
    /// Distance between two vectors of equal length.
    pub fn distance(self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }
        Ok(match self {
            DistanceMetric::Euclidean => squared_euclidean(a, b).sqrt(),
            DistanceMetric::SquaredEuclidean => squared_euclidean(a, b),
            DistanceMetric::BrayCurtis => bray_curtis(a, b),
        })
    }

    /// Whether the metric is Euclidean in either plain or squared form.
    pub fn is_euclidean(self) -> bool {
        matches!(
            self,
            DistanceMetric::Euclidean | DistanceMetric::SquaredEuclidean
        )
    }

    /// Text for a dendrogram axis.
    pub fn label(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "Euclidean distance",
            DistanceMetric::SquaredEuclidean => "squared Euclidean distance",
            DistanceMetric::BrayCurtis => "Bray-Curtis dissimilarity",
        }
    }

    /// Canonical selector name.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::SquaredEuclidean => "squared-euclidean",
            DistanceMetric::BrayCurtis => "bray-curtis",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "squared-euclidean" | "sqeuclidean" => Ok(DistanceMetric::SquaredEuclidean),
            "bray-curtis" | "braycurtis" => Ok(DistanceMetric::BrayCurtis),
            _ => Err(Error::UnknownMetric(s.to_string())),
        }
    }
}

#[inline]
fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
fn bray_curtis(a: &[f64], b: &[f64]) -> f64 {
    let (shared, total) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f64, 0.0f64), |(shared, total), (x, y)| {
            (shared + x.min(*y), total + x + y)
        });
    if total == 0.0 {
        return 0.0;
    }
    1.0 - 2.0 * shared / total
}
