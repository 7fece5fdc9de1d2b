//! Samples: one labelled abundance vector per sequenced library.
//!
//! All samples in a clustering run share the same phylotype indexing, so the
//! i-th entry of every vector counts the same phylotype. [`validate_samples`]
//! enforces that before any distance is computed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A labelled abundance vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Label shown on dendrogram leaves and table headers.
    pub label: String,
    /// Read counts (or proportions) per phylotype.
    pub abundances: Vec<f64>,
    /// Free-form style tags carried through to the renderer (colour, font, ...).
    #[serde(default)]
    pub style: Vec<String>,
}

impl Sample {
    /// Create a sample with no style tags.
    pub fn new(label: impl Into<String>, abundances: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            abundances,
            style: Vec::new(),
        }
    }

    /// Attach a style tag.
    pub fn with_style(mut self, tag: impl Into<String>) -> Self {
        self.style.push(tag.into());
        self
    }

    /// Number of phylotypes.
    pub fn len(&self) -> usize {
        self.abundances.len()
    }

    /// True when the abundance vector is empty.
    pub fn is_empty(&self) -> bool {
        self.abundances.is_empty()
    }

    /// Sum of all abundances.
    pub fn total(&self) -> f64 {
        self.abundances.iter().sum()
    }

    /// Relative abundances (each entry divided by the total).
    ///
    /// An all-zero sample stays all-zero.
    pub fn relative(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0.0 {
            return vec![0.0; self.abundances.len()];
        }
        self.abundances.iter().map(|a| a / total).collect()
    }
}

/// Check the invariants every clustering run relies on.
///
/// Returns the shared vector length.
pub fn validate_samples(samples: &[Sample]) -> Result<usize> {
    let first = samples.first().ok_or(Error::EmptyInput)?;
    let dim = first.len();

    let mut seen = HashSet::with_capacity(samples.len());
    for sample in samples {
        if sample.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: sample.len(),
            });
        }
        if let Some((index, &value)) = sample
            .abundances
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::InvalidAbundance {
                label: sample.label.clone(),
                index,
                value,
            });
        }
        if !seen.insert(sample.label.as_str()) {
            return Err(Error::DuplicateLabel(sample.label.clone()));
        }
    }

    Ok(dim)
}
