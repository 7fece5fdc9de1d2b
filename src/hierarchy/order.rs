//! Label comparators for canonical left-to-right leaf order.
//!
//! Structured orders only apply when both labels parse. If either side does
//! not, the comparison falls back to plain string order, so every variant
//! stays a total order on any pair of labels.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

static NUMERIC_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(\d+)$").expect("numeric suffix pattern"));

static EMBEDDED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(\d{4}-\d{2}-\d{2}|\d{2}\.\d{2}\.\d{4}|\d{8})(.*)$")
        .expect("embedded date pattern")
});

/// How leaf labels are compared when canonicalising a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelOrder {
    /// Plain byte-wise string order.
    #[default]
    Lexicographic,
    /// `"S9" < "S10"`: equal alphabetic prefixes compare their trailing number.
    AlphaNumeric,
    /// `"site_2021-03-01" < "site_2021-11-20"`: compares an embedded
    /// `YYYY-MM-DD`, `DD.MM.YYYY` or `YYYYMMDD` date after the prefix.
    AlphaDate,
}

impl LabelOrder {
    /// Compare two labels.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        let structured = match self {
            LabelOrder::Lexicographic => None,
            LabelOrder::AlphaNumeric => compare_numeric_suffix(a, b),
            LabelOrder::AlphaDate => compare_embedded_date(a, b),
        };
        structured.unwrap_or_else(|| a.cmp(b))
    }

    /// Canonical selector name.
    pub fn name(self) -> &'static str {
        match self {
            LabelOrder::Lexicographic => "lexicographic",
            LabelOrder::AlphaNumeric => "alpha-numeric",
            LabelOrder::AlphaDate => "alpha-date",
        }
    }
}

impl fmt::Display for LabelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LabelOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "lexicographic" | "plain" | "alpha" => Ok(LabelOrder::Lexicographic),
            "alpha-numeric" | "alphanumeric" | "numeric" => Ok(LabelOrder::AlphaNumeric),
            "alpha-date" | "date" => Ok(LabelOrder::AlphaDate),
            _ => Err(Error::UnknownLabelOrder(s.to_string())),
        }
    }
}

fn compare_numeric_suffix(a: &str, b: &str) -> Option<Ordering> {
    let ca = NUMERIC_SUFFIX.captures(a)?;
    let cb = NUMERIC_SUFFIX.captures(b)?;
    let ordering = ca[1]
        .cmp(&cb[1])
        .then_with(|| compare_digits(&ca[2], &cb[2]))
        .then_with(|| a.cmp(b));
    Some(ordering)
}

/// Numeric order of two digit strings of any length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_embedded_date(a: &str, b: &str) -> Option<Ordering> {
    let (prefix_a, date_a, rest_a) = split_date(a)?;
    let (prefix_b, date_b, rest_b) = split_date(b)?;
    let ordering = prefix_a
        .cmp(prefix_b)
        .then_with(|| date_a.cmp(&date_b))
        .then_with(|| rest_a.cmp(rest_b))
        .then_with(|| a.cmp(b));
    Some(ordering)
}

fn split_date(label: &str) -> Option<(&str, NaiveDate, &str)> {
    let caps = EMBEDDED_DATE.captures(label)?;
    let raw = caps.get(2)?.as_str();
    let date = ["%Y-%m-%d", "%d.%m.%Y", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())?;
    Some((caps.get(1)?.as_str(), date, caps.get(3)?.as_str()))
}
