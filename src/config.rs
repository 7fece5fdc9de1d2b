//! Run configuration: which linkage, which metric, which leaf order.

use serde::{Deserialize, Serialize};

use crate::cluster::{LinkageMethod, LinkageRule};
use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::hierarchy::LabelOrder;

/// Configuration for one clustering run.
///
/// Deserialises from the selector names used by template layers:
///
/// ```json
/// { "method": { "name": "flexible-beta", "beta": -0.25 },
///   "metric": "bray-curtis",
///   "label_order": "alpha-numeric" }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Linkage method.
    pub method: LinkageMethod,
    /// Leaf-to-leaf distance metric.
    pub metric: DistanceMetric,
    /// Comparator for canonical leaf order.
    pub label_order: LabelOrder,
}

impl ClusterConfig {
    /// Default configuration: average linkage on Bray-Curtis, plain label order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string selectors; `beta` is only read for flexible-beta.
    pub fn from_names(method: &str, beta: Option<f64>, metric: &str) -> Result<Self> {
        Ok(Self {
            method: LinkageMethod::from_name(method, beta)?,
            metric: metric.parse()?,
            label_order: LabelOrder::default(),
        })
    }

    /// Set linkage method.
    pub fn with_method(mut self, method: LinkageMethod) -> Self {
        self.method = method;
        self
    }

    /// Set distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set leaf label order.
    pub fn with_label_order(mut self, order: LabelOrder) -> Self {
        self.label_order = order;
        self
    }

    /// Resolve the linkage rule, failing on invalid method/metric pairings.
    pub fn validate(&self) -> Result<LinkageRule> {
        LinkageRule::new(self.method, self.metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let cfg = ClusterConfig::new();
        assert_eq!(cfg.method, LinkageMethod::Average);
        assert_eq!(cfg.metric, DistanceMetric::BrayCurtis);
        assert_eq!(cfg.label_order, LabelOrder::Lexicographic);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_names() {
        let cfg = ClusterConfig::from_names("flexible-beta", Some(-0.25), "euclidean").unwrap();
        assert_eq!(cfg.method, LinkageMethod::FlexibleBeta { beta: -0.25 });
        assert_eq!(cfg.metric, DistanceMetric::Euclidean);

        assert_eq!(
            ClusterConfig::from_names("flexible-beta", None, "euclidean"),
            Err(Error::MissingBeta)
        );
        assert_eq!(
            ClusterConfig::from_names("average", None, "jaccard"),
            Err(Error::UnknownMetric("jaccard".into()))
        );
    }

    #[test]
    fn test_validate_rejects_ward_bray_curtis() {
        let cfg = ClusterConfig::new().with_method(LinkageMethod::Ward);
        assert!(matches!(
            cfg.validate(),
            Err(Error::IncompatibleMetric { .. })
        ));
        assert!(cfg.with_metric(DistanceMetric::Euclidean).validate().is_ok());
    }

    #[test]
    fn test_deserialize() {
        let cfg: ClusterConfig = serde_json::from_str(
            r#"{"method":{"name":"flexible-beta","beta":-0.25},"metric":"bray-curtis","label_order":"alpha-numeric"}"#,
        )
        .unwrap();
        assert_eq!(cfg.method, LinkageMethod::FlexibleBeta { beta: -0.25 });
        assert_eq!(cfg.label_order, LabelOrder::AlphaNumeric);

        let partial: ClusterConfig = serde_json::from_str(r#"{"metric":"euclidean"}"#).unwrap();
        assert_eq!(partial.method, LinkageMethod::Average);
        assert_eq!(partial.metric, DistanceMetric::Euclidean);
    }

    #[test]
    fn test_serialize_round_trip() {
        let cfg = ClusterConfig::new()
            .with_method(LinkageMethod::Ward)
            .with_metric(DistanceMetric::Euclidean)
            .with_label_order(LabelOrder::AlphaDate);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ClusterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
