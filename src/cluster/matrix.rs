//! Lower-triangular dissimilarity matrix over the active clusters.
//!
//! Storage is the strict lower triangle, row-major: row `i` holds the `i`
//! entries `(i, 0) .. (i, i-1)`. The diagonal is implicitly zero.
//!
//! Indices refer to positions in the *current* active-cluster list, not to
//! stable cluster identities. [`DissimilarityMatrix::update`] derives the
//! matrix for the next list from the previous one:
//!
//! - positions `a < b` merge; the new cluster takes position `a`,
//! - position `b` is removed and everything after it shifts down by one,
//! - entries between untouched clusters are copied,
//! - entries against the new cluster come from the Lance–Williams update.
//!
//! Only the matrix built by [`DissimilarityMatrix::initialize`] holds raw
//! pairwise distances. After the first update, entries are linkage values.

use crate::cluster::linkage::LinkageRule;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::sample::{validate_samples, Sample};

/// Symmetric dissimilarity matrix with zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DissimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

#[inline]
fn offset(row: usize, col: usize) -> usize {
    debug_assert!(row > col);
    row * (row - 1) / 2 + col
}

impl DissimilarityMatrix {
    /// Evaluate `distance` over every pair of vectors. O(n²) calls.
    pub fn initialize<V, F>(vectors: &[V], distance: F) -> Result<Self>
    where
        V: AsRef<[f64]>,
        F: Fn(&[f64], &[f64]) -> Result<f64>,
    {
        let n = vectors.len();
        let mut values = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for row in 1..n {
            for col in 0..row {
                values.push(distance(vectors[row].as_ref(), vectors[col].as_ref())?);
            }
        }
        Ok(Self { n, values })
    }

    /// Build from a full square matrix, reading the lower triangle.
    pub fn from_square(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if let Some(row) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: row.len(),
            });
        }
        let mut values = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for (i, row) in rows.iter().enumerate() {
            values.extend_from_slice(&row[..i]);
        }
        Ok(Self { n, values })
    }

    /// Number of clusters covered.
    pub fn len(&self) -> usize {
        self.n
    }

    /// True when the matrix covers no clusters.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Dissimilarity between positions `i` and `j` (order does not matter).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.values[offset(i.max(j), i.min(j))]
    }

    /// Smallest off-diagonal value, or `None` below two clusters.
    pub fn min_off_diagonal(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// First off-diagonal entry that is NaN or infinite, in storage order.
    ///
    /// [`min_off_diagonal`](Self::min_off_diagonal) skips NaN, so callers
    /// that need a fully finite matrix check here first.
    pub fn first_non_finite(&self) -> Option<f64> {
        self.values.iter().copied().find(|v| !v.is_finite())
    }

    /// All pairs `(lo, hi)` whose value equals `value` exactly, in
    /// lexicographic `(lo, hi)` order.
    pub fn pairs_at(&self, value: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for lo in 0..self.n {
            for hi in (lo + 1)..self.n {
                if self.values[offset(hi, lo)] == value {
                    pairs.push((lo, hi));
                }
            }
        }
        pairs
    }

    /// Matrix for the list obtained by merging positions `a` and `b`.
    ///
    /// `sizes[i]` is the subordinate count of the cluster at position `i`
    /// before the merge.
    pub fn update(&self, a: usize, b: usize, sizes: &[usize], rule: &LinkageRule) -> Self {
        let (a, b) = (a.min(b), a.max(b));
        debug_assert!(b < self.n);
        debug_assert_eq!(sizes.len(), self.n);

        let n = self.n - 1;
        let old = |i: usize| if i < b { i } else { i + 1 };
        let d_ab = self.get(a, b);

        let mut values = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for row in 1..n {
            for col in 0..row {
                let value = if row == a || col == a {
                    let c = old(if row == a { col } else { row });
                    rule.update(
                        self.get(c, a),
                        self.get(c, b),
                        d_ab,
                        sizes[a],
                        sizes[b],
                        sizes[c],
                    )
                } else {
                    self.get(old(row), old(col))
                };
                values.push(value);
            }
        }
        Self { n, values }
    }

    /// Full square rows, for tabular display.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Raw leaf-to-leaf dissimilarities with row/column labels.
///
/// Built directly from the samples; no agglomeration runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DissimilarityTable {
    labels: Vec<String>,
    metric: DistanceMetric,
    matrix: DissimilarityMatrix,
}

/// Pairwise dissimilarity table over `samples`.
pub fn pairwise_table(samples: &[Sample], metric: DistanceMetric) -> Result<DissimilarityTable> {
    validate_samples(samples)?;
    let vectors: Vec<&[f64]> = samples.iter().map(|s| s.abundances.as_slice()).collect();
    let matrix = DissimilarityMatrix::initialize(&vectors, |a, b| metric.distance(a, b))?;
    Ok(DissimilarityTable {
        labels: samples.iter().map(|s| s.label.clone()).collect(),
        metric,
        matrix,
    })
}

impl DissimilarityTable {
    /// Row and column labels, in input order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Metric the table was computed with.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &DissimilarityMatrix {
        &self.matrix
    }

    /// Dissimilarity between samples `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j)
    }

    /// Dissimilarity between two samples by label.
    pub fn lookup(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.get(i, j))
    }

    /// Labelled square rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<f64>)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(move |(i, label)| {
                let row: Vec<f64> = (0..self.labels.len()).map(|j| self.get(i, j)).collect();
                (label.as_str(), row)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::linkage::LinkageMethod;

    fn line(points: &[f64]) -> DissimilarityMatrix {
        let vectors: Vec<Vec<f64>> = points.iter().map(|p| vec![*p]).collect();
        DissimilarityMatrix::initialize(&vectors, |a, b| DistanceMetric::Euclidean.distance(a, b))
            .unwrap()
    }

    #[test]
    fn test_initialize_symmetric_zero_diagonal() {
        let m = line(&[0.0, 1.0, 5.0, 6.0]);
        assert_eq!(m.len(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.get(0, 3), 6.0);
        assert_eq!(m.get(2, 1), 4.0);
    }

    #[test]
    fn test_initialize_propagates_errors() {
        let vectors = vec![vec![1.0], vec![1.0, 2.0]];
        let err = DissimilarityMatrix::initialize(&vectors, |a, b| {
            DistanceMetric::Euclidean.distance(a, b)
        })
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_min_and_pairs() {
        let m = line(&[0.0, 1.0, 5.0, 6.0]);
        assert_eq!(m.min_off_diagonal(), Some(1.0));
        assert_eq!(m.pairs_at(1.0), vec![(0, 1), (2, 3)]);
        assert_eq!(line(&[3.0]).min_off_diagonal(), None);
    }

    #[test]
    fn test_non_finite_entries_are_found() {
        let inf = f64::INFINITY;
        let m = DissimilarityMatrix::from_square(&[
            vec![0.0, 5.0, inf, 5.0],
            vec![5.0, 0.0, inf, 2.0],
            vec![inf, inf, 0.0, inf],
            vec![5.0, 2.0, inf, 0.0],
        ])
        .unwrap();
        assert_eq!(m.first_non_finite(), Some(inf));

        // Merging across the infinite pair leaves inf − inf behind.
        let rule = LinkageRule::new(LinkageMethod::Median, DistanceMetric::SquaredEuclidean).unwrap();
        let merged = m.update(0, 2, &[1, 1, 1, 1], &rule);
        assert!(merged.get(0, 1).is_nan());
        assert!(merged.first_non_finite().is_some_and(f64::is_nan));
        assert_eq!(merged.min_off_diagonal(), Some(2.0));

        assert_eq!(line(&[0.0, 1.0, 5.0]).first_non_finite(), None);
    }

    #[test]
    fn test_update_single_linkage() {
        let rule = LinkageRule::new(LinkageMethod::Single, DistanceMetric::Euclidean).unwrap();
        let m = line(&[0.0, 1.0, 5.0, 6.0]);

        // Merge positions 0 and 1: list becomes [{0,1}, 5, 6].
        let m = m.update(0, 1, &[1, 1, 1, 1], &rule);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(0, 1), 4.0);
        assert_eq!(m.get(0, 2), 5.0);
        assert_eq!(m.get(1, 2), 1.0);
    }

    #[test]
    fn test_update_removes_higher_index() {
        let rule = LinkageRule::new(LinkageMethod::Complete, DistanceMetric::Euclidean).unwrap();
        let m = line(&[0.0, 10.0, 1.0, 20.0]);

        // Merge positions 0 and 2: list becomes [{0,1.0}, 10, 20].
        let m = m.update(2, 0, &[1, 1, 1, 1], &rule);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(0, 1), 10.0);
        assert_eq!(m.get(0, 2), 20.0);
        assert_eq!(m.get(1, 2), 10.0);
    }

    /// After a merge the entries are linkage values, not raw distances:
    /// the average-linkage value to a merged cluster is a mean that no
    /// single leaf pair needs to realise.
    #[test]
    fn test_updated_entries_are_derived() {
        let rule = LinkageRule::new(LinkageMethod::Average, DistanceMetric::Euclidean).unwrap();
        let raw = line(&[0.0, 2.0, 7.0]);
        let merged = raw.update(0, 1, &[1, 1, 1], &rule);
        assert_eq!(merged.get(0, 1), 6.0);
        assert!((0..3).all(|i| (0..3).all(|j| raw.get(i, j) != 6.0)));
    }

    #[test]
    fn test_pairwise_table() {
        let samples = vec![
            Sample::new("a", vec![1.0, 0.0]),
            Sample::new("b", vec![0.0, 1.0]),
            Sample::new("c", vec![1.0, 1.0]),
        ];
        let table = pairwise_table(&samples, DistanceMetric::BrayCurtis).unwrap();
        assert_eq!(table.labels(), ["a", "b", "c"]);
        assert_eq!(table.metric(), DistanceMetric::BrayCurtis);
        assert_eq!(table.lookup("a", "b"), Some(1.0));
        assert!((table.get(0, 2) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(table.lookup("a", "zz"), None);

        let rows: Vec<(&str, Vec<f64>)> = table.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].0, "b");
        assert_eq!(rows[1].1[1], 0.0);
        assert_eq!(rows[1].1[0], 1.0);
    }

    #[test]
    fn test_pairwise_table_rejects_bad_input() {
        assert_eq!(
            pairwise_table(&[], DistanceMetric::Euclidean),
            Err(Error::EmptyInput)
        );
    }

    #[test]
    fn test_from_square_and_rows() {
        let rows = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ];
        let m = DissimilarityMatrix::from_square(&rows).unwrap();
        assert_eq!(m.to_rows(), rows);
        assert!(DissimilarityMatrix::from_square(&[vec![0.0, 1.0]]).is_err());
    }
}
