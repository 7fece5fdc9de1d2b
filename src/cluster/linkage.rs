//! Linkage methods as instances of the Lance–Williams recurrence.
//!
//! When clusters A and B merge, the dissimilarity from any third cluster C
//! to the new cluster AB is
//!
//! ```text
//! D(C, AB) = αA·D(C,A) + αB·D(C,B) + β·D(A,B) + γ·|D(C,A) − D(C,B)|
//! ```
//!
//! with coefficients depending only on the cluster sizes nA, nB, nC:
//!
//! | Method | αA | αB | β | γ |
//! |--------|----|----|---|---|
//! | Single | ½ | ½ | 0 | −½ |
//! | Complete | ½ | ½ | 0 | ½ |
//! | Average (UPGMA) | nA/(nA+nB) | nB/(nA+nB) | 0 | 0 |
//! | Centroid (UPGMC) | nA/(nA+nB) | nB/(nA+nB) | −nA·nB/(nA+nB)² | 0 |
//! | Median (WPGMC) | ½ | ½ | −¼ | 0 |
//! | Ward | (nA+nC)/N | (nB+nC)/N | −nC/N | 0 |
//! | Flexible-β | (1−β)·nA/(nA+nB) | (1−β)·nB/(nA+nB) | β | 0 |
//!
//! where N = nA + nB + nC.
//!
//! Centroid, median and Ward are only geometrically meaningful on squared
//! Euclidean distances. For those methods the run works on the squared form
//! of the metric and takes the square root of each merge height at the end.
//!
//! The flexible-β family uses size-weighted alphas, so β = 0 is exactly
//! average linkage.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::{Error, Result};

/// Named linkage method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum LinkageMethod {
    /// Nearest neighbour.
    Single,
    /// Furthest neighbour.
    Complete,
    /// Unweighted pair-group mean (UPGMA).
    #[default]
    Average,
    /// Unweighted pair-group centroid (UPGMC).
    Centroid,
    /// Weighted pair-group centroid (WPGMC).
    Median,
    /// Minimum increase of within-cluster sum of squares.
    Ward,
    /// Flexible-β; `beta` must be finite and below 1.
    FlexibleBeta {
        /// Weight of D(A,B) in the update.
        beta: f64,
    },
}

impl LinkageMethod {
    /// Build a method from a selector name and an optional β.
    ///
    /// β is ignored for every method except flexible-beta, where it is required.
    pub fn from_name(name: &str, beta: Option<f64>) -> Result<Self> {
        match normalize(name).as_str() {
            "flexible" | "flexible-beta" | "beta-flexible" => {
                let beta = beta.ok_or(Error::MissingBeta)?;
                let method = LinkageMethod::FlexibleBeta { beta };
                method.check()?;
                Ok(method)
            }
            _ => name.parse(),
        }
    }

    /// Canonical selector name.
    pub fn name(&self) -> &'static str {
        match self {
            LinkageMethod::Single => "single",
            LinkageMethod::Complete => "complete",
            LinkageMethod::Average => "average",
            LinkageMethod::Centroid => "centroid",
            LinkageMethod::Median => "median",
            LinkageMethod::Ward => "ward",
            LinkageMethod::FlexibleBeta { .. } => "flexible-beta",
        }
    }

    /// Text for a dendrogram axis.
    pub fn label(&self) -> String {
        match self {
            LinkageMethod::Single => "Single linkage".into(),
            LinkageMethod::Complete => "Complete linkage".into(),
            LinkageMethod::Average => "Average linkage (UPGMA)".into(),
            LinkageMethod::Centroid => "Centroid linkage (UPGMC)".into(),
            LinkageMethod::Median => "Median linkage (WPGMC)".into(),
            LinkageMethod::Ward => "Ward's minimum variance".into(),
            LinkageMethod::FlexibleBeta { beta } => format!("Flexible-beta linkage (β = {beta})"),
        }
    }

    fn check(&self) -> Result<()> {
        if let LinkageMethod::FlexibleBeta { beta } = *self {
            if !beta.is_finite() || beta >= 1.0 {
                return Err(Error::InvalidBeta(beta));
            }
        }
        Ok(())
    }
}

impl fmt::Display for LinkageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkageMethod::FlexibleBeta { beta } => write!(f, "flexible-beta({beta})"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for LinkageMethod {
    type Err = Error;

    /// Parses selector names. Flexible-beta takes its β in parentheses,
    /// e.g. `flexible-beta(-0.25)`.
    fn from_str(s: &str) -> Result<Self> {
        let key = normalize(s);
        if let Some(inner) = key
            .strip_prefix("flexible-beta(")
            .or_else(|| key.strip_prefix("flexible("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let beta = inner
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::UnknownMethod(s.to_string()))?;
            let method = LinkageMethod::FlexibleBeta { beta };
            method.check()?;
            return Ok(method);
        }
        match key.as_str() {
            "single" | "nearest" => Ok(LinkageMethod::Single),
            "complete" | "furthest" | "farthest" => Ok(LinkageMethod::Complete),
            "average" | "upgma" => Ok(LinkageMethod::Average),
            "centroid" | "upgmc" => Ok(LinkageMethod::Centroid),
            "median" | "wpgmc" => Ok(LinkageMethod::Median),
            "ward" | "ward's" | "wards" => Ok(LinkageMethod::Ward),
            "flexible" | "flexible-beta" | "beta-flexible" => Err(Error::MissingBeta),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

/// A linkage method resolved against a distance metric.
///
/// Construction validates the pairing, so every rule that exists can run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkageRule {
    method: LinkageMethod,
    metric: DistanceMetric,
    squared: bool,
}

impl LinkageRule {
    /// Resolve `method` for `metric`.
    ///
    /// Fails for Ward with a non-Euclidean metric and for flexible-beta with
    /// β ≥ 1 or non-finite β.
    pub fn new(method: LinkageMethod, metric: DistanceMetric) -> Result<Self> {
        method.check()?;
        let squared = match method {
            LinkageMethod::Ward => {
                if !metric.is_euclidean() {
                    return Err(Error::IncompatibleMetric {
                        method: method.name().to_string(),
                        metric: metric.name().to_string(),
                    });
                }
                metric == DistanceMetric::Euclidean
            }
            LinkageMethod::Centroid | LinkageMethod::Median => {
                metric != DistanceMetric::SquaredEuclidean
            }
            _ => false,
        };
        Ok(Self {
            method,
            metric,
            squared,
        })
    }

    /// The linkage method.
    pub fn method(&self) -> LinkageMethod {
        self.method
    }

    /// The metric the caller selected.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Whether the run works on squared distances with a deferred root.
    pub fn uses_squared(&self) -> bool {
        self.squared
    }

    /// Coefficient of D(C, A).
    pub fn alpha_a(&self, na: usize, nb: usize, nc: usize) -> f64 {
        let (na, nb, nc) = (na as f64, nb as f64, nc as f64);
        match self.method {
            LinkageMethod::Single | LinkageMethod::Complete | LinkageMethod::Median => 0.5,
            LinkageMethod::Average | LinkageMethod::Centroid => na / (na + nb),
            LinkageMethod::Ward => (na + nc) / (na + nb + nc),
            LinkageMethod::FlexibleBeta { beta } => (1.0 - beta) * na / (na + nb),
        }
    }

    /// Coefficient of D(C, B).
    pub fn alpha_b(&self, na: usize, nb: usize, nc: usize) -> f64 {
        // Every method in the family is symmetric in A and B.
        self.alpha_a(nb, na, nc)
    }

    /// Coefficient of D(A, B).
    pub fn beta(&self, na: usize, nb: usize, nc: usize) -> f64 {
        let (na, nb, nc) = (na as f64, nb as f64, nc as f64);
        match self.method {
            LinkageMethod::Single | LinkageMethod::Complete | LinkageMethod::Average => 0.0,
            LinkageMethod::Centroid => -(na * nb) / ((na + nb) * (na + nb)),
            LinkageMethod::Median => -0.25,
            LinkageMethod::Ward => -nc / (na + nb + nc),
            LinkageMethod::FlexibleBeta { beta } => beta,
        }
    }

    /// Coefficient of |D(C,A) − D(C,B)|.
    pub fn gamma(&self) -> f64 {
        match self.method {
            LinkageMethod::Single => -0.5,
            LinkageMethod::Complete => 0.5,
            _ => 0.0,
        }
    }

    /// Lance–Williams update: D(C, AB) from D(C,A), D(C,B), D(A,B).
    ///
    /// Single and complete linkage reduce to exact `min`/`max`; the
    /// `½a + ½b ∓ ½|a−b|` form loses the last bit to cancellation.
    pub fn update(&self, d_ca: f64, d_cb: f64, d_ab: f64, na: usize, nb: usize, nc: usize) -> f64 {
        match self.method {
            LinkageMethod::Single => return d_ca.min(d_cb),
            LinkageMethod::Complete => return d_ca.max(d_cb),
            _ => {}
        }
        self.alpha_a(na, nb, nc) * d_ca
            + self.alpha_b(na, nb, nc) * d_cb
            + self.beta(na, nb, nc) * d_ab
            + self.gamma() * (d_ca - d_cb).abs()
    }

    /// Leaf-to-leaf dissimilarity in the units the agglomeration works in.
    pub fn working_distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if !self.squared {
            return self.metric.distance(a, b);
        }
        match self.metric {
            DistanceMetric::Euclidean => DistanceMetric::SquaredEuclidean.distance(a, b),
            other => {
                let d = other.distance(a, b)?;
                Ok(d * d)
            }
        }
    }

    /// Convert a working-unit dissimilarity back into a merge height.
    ///
    /// Negative rounding residue (centroid, median and Ward updates can leave
    /// one, squared input or not) is clamped to zero.
    pub fn finish(&self, d: f64) -> f64 {
        let d = if d < 0.0 {
            tracing::warn!(value = d, "clamping negative dissimilarity to zero");
            0.0
        } else {
            d
        };
        if self.squared {
            d.sqrt()
        } else {
            d
        }
    }

    /// Axis annotation, e.g. `"Average linkage (UPGMA), Bray-Curtis dissimilarity"`.
    pub fn label(&self) -> String {
        format!("{}, {}", self.method.label(), self.metric.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LinkageMethod; 7] = [
        LinkageMethod::Single,
        LinkageMethod::Complete,
        LinkageMethod::Average,
        LinkageMethod::Centroid,
        LinkageMethod::Median,
        LinkageMethod::Ward,
        LinkageMethod::FlexibleBeta { beta: -0.25 },
    ];

    #[test]
    fn test_parse_names() {
        assert_eq!("Single".parse(), Ok(LinkageMethod::Single));
        assert_eq!("UPGMA".parse(), Ok(LinkageMethod::Average));
        assert_eq!("ward".parse(), Ok(LinkageMethod::Ward));
        assert_eq!(
            "flexible-beta(-0.25)".parse(),
            Ok(LinkageMethod::FlexibleBeta { beta: -0.25 })
        );
        assert_eq!(
            "flexible".parse::<LinkageMethod>(),
            Err(Error::MissingBeta)
        );
        assert_eq!(
            "mcquitty".parse::<LinkageMethod>(),
            Err(Error::UnknownMethod("mcquitty".into()))
        );
        for method in ALL {
            assert_eq!(method.to_string().parse::<LinkageMethod>(), Ok(method));
        }
    }

    #[test]
    fn test_from_name_beta() {
        assert_eq!(
            LinkageMethod::from_name("flexible-beta", Some(0.5)),
            Ok(LinkageMethod::FlexibleBeta { beta: 0.5 })
        );
        assert_eq!(
            LinkageMethod::from_name("flexible-beta", None),
            Err(Error::MissingBeta)
        );
        assert_eq!(
            LinkageMethod::from_name("flexible-beta", Some(1.0)),
            Err(Error::InvalidBeta(1.0))
        );
        assert!(matches!(
            LinkageMethod::from_name("flexible-beta", Some(f64::NAN)),
            Err(Error::InvalidBeta(b)) if b.is_nan()
        ));
        // β is ignored for other methods.
        assert_eq!(
            LinkageMethod::from_name("complete", Some(3.0)),
            Ok(LinkageMethod::Complete)
        );
    }

    #[test]
    fn test_ward_requires_euclidean() {
        assert_eq!(
            LinkageRule::new(LinkageMethod::Ward, DistanceMetric::BrayCurtis),
            Err(Error::IncompatibleMetric {
                method: "ward".into(),
                metric: "bray-curtis".into()
            })
        );
        assert!(LinkageRule::new(LinkageMethod::Ward, DistanceMetric::Euclidean).is_ok());
        assert!(LinkageRule::new(LinkageMethod::Ward, DistanceMetric::SquaredEuclidean).is_ok());
    }

    #[test]
    fn test_flexible_beta_bounds() {
        for beta in [1.0, 1.5, f64::INFINITY, f64::NAN] {
            let err = LinkageRule::new(LinkageMethod::FlexibleBeta { beta }, DistanceMetric::Euclidean)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidBeta(_)));
        }
        assert!(LinkageRule::new(
            LinkageMethod::FlexibleBeta { beta: 0.999 },
            DistanceMetric::Euclidean
        )
        .is_ok());
    }

    #[test]
    fn test_squared_flag() {
        let flag = |m, d| LinkageRule::new(m, d).unwrap().uses_squared();
        assert!(flag(LinkageMethod::Ward, DistanceMetric::Euclidean));
        assert!(!flag(LinkageMethod::Ward, DistanceMetric::SquaredEuclidean));
        assert!(flag(LinkageMethod::Centroid, DistanceMetric::Euclidean));
        assert!(flag(LinkageMethod::Centroid, DistanceMetric::BrayCurtis));
        assert!(flag(LinkageMethod::Median, DistanceMetric::BrayCurtis));
        assert!(!flag(LinkageMethod::Median, DistanceMetric::SquaredEuclidean));
        assert!(!flag(LinkageMethod::Single, DistanceMetric::Euclidean));
        assert!(!flag(LinkageMethod::Average, DistanceMetric::BrayCurtis));
    }

    #[test]
    fn test_single_and_complete_are_min_and_max() {
        let single = LinkageRule::new(LinkageMethod::Single, DistanceMetric::Euclidean).unwrap();
        let complete = LinkageRule::new(LinkageMethod::Complete, DistanceMetric::Euclidean).unwrap();
        assert_eq!(single.update(3.0, 5.0, 1.0, 1, 1, 1), 3.0);
        assert_eq!(complete.update(3.0, 5.0, 1.0, 1, 1, 1), 5.0);
    }

    #[test]
    fn test_single_and_complete_are_exact() {
        // Unit-square side against its diagonal: the coefficient form rounds
        // 0.5 + 0.5·√2 − 0.5·(√2 − 1) to 0.9999999999999999.
        let side = 1.0;
        let diagonal = 2.0f64.sqrt();
        let single = LinkageRule::new(LinkageMethod::Single, DistanceMetric::Euclidean).unwrap();
        let complete = LinkageRule::new(LinkageMethod::Complete, DistanceMetric::Euclidean).unwrap();
        for (a, b) in [(side, diagonal), (diagonal, side)] {
            assert_eq!(single.update(a, b, side, 1, 1, 1), side);
            assert_eq!(complete.update(a, b, side, 1, 1, 1), diagonal);
        }
        assert_eq!(single.update(0.1, 0.3, 0.2, 4, 2, 9), 0.1);
        assert_eq!(complete.update(0.1, 0.3, 0.2, 4, 2, 9), 0.3);
    }

    #[test]
    fn test_average_weights_by_size() {
        let rule = LinkageRule::new(LinkageMethod::Average, DistanceMetric::Euclidean).unwrap();
        // A holds 3 leaves, B holds 1.
        assert_eq!(rule.update(4.0, 8.0, 2.0, 3, 1, 1), 5.0);
    }

    #[test]
    fn test_ward_matches_centroid_formula() {
        // Points on a line: A = {0}, B = {2}, C = {5}; squared distances.
        let rule = LinkageRule::new(LinkageMethod::Ward, DistanceMetric::Euclidean).unwrap();
        let d = rule.update(25.0, 9.0, 4.0, 1, 1, 1);
        // Ward: 2·nC·nAB/(nC+nAB) · |c − centroid(AB)|²  with centroid 1 → 4/3 · 16
        assert!((d - 64.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_flexible_zero_is_average() {
        let avg = LinkageRule::new(LinkageMethod::Average, DistanceMetric::Euclidean).unwrap();
        let flex =
            LinkageRule::new(LinkageMethod::FlexibleBeta { beta: 0.0 }, DistanceMetric::Euclidean)
                .unwrap();
        for (na, nb, nc) in [(1, 1, 1), (3, 2, 7), (5, 1, 2)] {
            assert_eq!(avg.alpha_a(na, nb, nc), flex.alpha_a(na, nb, nc));
            assert_eq!(avg.alpha_b(na, nb, nc), flex.alpha_b(na, nb, nc));
            assert_eq!(avg.beta(na, nb, nc), flex.beta(na, nb, nc));
            assert_eq!(
                avg.update(1.3, 2.9, 0.7, na, nb, nc),
                flex.update(1.3, 2.9, 0.7, na, nb, nc)
            );
        }
    }

    #[test]
    fn test_working_distance_and_finish() {
        let rule = LinkageRule::new(LinkageMethod::Centroid, DistanceMetric::Euclidean).unwrap();
        let d = rule.working_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert_eq!(d, 25.0);
        assert_eq!(rule.finish(d), 5.0);
        assert_eq!(rule.finish(-1e-15), 0.0);

        let plain = LinkageRule::new(LinkageMethod::Single, DistanceMetric::Euclidean).unwrap();
        assert_eq!(plain.working_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
        assert_eq!(plain.finish(5.0), 5.0);

        // Squared Euclidean input skips the root but still clamps.
        let sq = LinkageRule::new(LinkageMethod::Median, DistanceMetric::SquaredEuclidean).unwrap();
        assert!(!sq.uses_squared());
        assert_eq!(sq.finish(-1e-15), 0.0);
        assert_eq!(sq.finish(25.0), 25.0);
        let ward = LinkageRule::new(LinkageMethod::Ward, DistanceMetric::SquaredEuclidean).unwrap();
        assert_eq!(ward.finish(-3e-16), 0.0);

        let bc = LinkageRule::new(LinkageMethod::Median, DistanceMetric::BrayCurtis).unwrap();
        let d = bc.working_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_label() {
        let rule = LinkageRule::new(LinkageMethod::Average, DistanceMetric::BrayCurtis).unwrap();
        assert_eq!(rule.label(), "Average linkage (UPGMA), Bray-Curtis dissimilarity");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&LinkageMethod::FlexibleBeta { beta: -0.25 }).unwrap();
        assert_eq!(json, r#"{"name":"flexible-beta","beta":-0.25}"#);
        let back: LinkageMethod = serde_json::from_str(r#"{"name":"ward"}"#).unwrap();
        assert_eq!(back, LinkageMethod::Ward);
    }
}
