use thiserror::Error as ThisError;

/// Result alias for `ampliclust`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by distance, linkage and clustering primitives.
///
/// Every failure is local to one call: nothing is retried and no partial
/// tree is ever returned.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Abundance vector length differs from the rest of the run.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// An abundance was negative, NaN or infinite.
    #[error("sample '{label}' has invalid abundance {value} at index {index}")]
    InvalidAbundance {
        /// Sample label.
        label: String,
        /// Phylotype index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Two samples share a label.
    #[error("duplicate sample label '{0}'")]
    DuplicateLabel(String),

    /// Linkage method name not recognised.
    #[error("unknown linkage method '{0}'")]
    UnknownMethod(String),

    /// Distance metric name not recognised.
    #[error("unknown distance metric '{0}'")]
    UnknownMetric(String),

    /// Label ordering name not recognised.
    #[error("unknown label order '{0}'")]
    UnknownLabelOrder(String),

    /// The linkage method is not defined for the chosen metric.
    #[error("{method} linkage requires a Euclidean metric, got {metric}")]
    IncompatibleMetric {
        /// Linkage method name.
        method: String,
        /// Metric name.
        metric: String,
    },

    /// Flexible-beta was requested without a beta value.
    #[error("flexible-beta linkage requires a beta value")]
    MissingBeta,

    /// Flexible-beta parameter outside (-inf, 1).
    #[error("flexible-beta requires a finite beta < 1, got {0}")]
    InvalidBeta(f64),

    /// A dissimilarity overflowed or became NaN during agglomeration.
    #[error("non-finite dissimilarity {value} in round {round}")]
    NonFiniteDissimilarity {
        /// Agglomeration round.
        round: usize,
        /// Offending value.
        value: f64,
    },

    /// The caller stopped the run at a round boundary.
    #[error("clustering cancelled before round {round}")]
    Cancelled {
        /// First round that did not run.
        round: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}
