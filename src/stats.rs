//! Derived summary statistics over raw sub-measurements.
//!
//! Quartiles use the nearest-rank position `⌊p·n⌋` on the ascending sort,
//! not the interpolated percentile used by box plots. Values precomputed
//! upstream may follow other conventions; those take precedence in the
//! resolver and never reach this module.

use crate::measure::Statistic;
use std::cmp::Ordering;

/// Canonical invalid marker for missing or non-numeric values.
pub const INVALID: f64 = f64::NAN;

/// Whether a value can be plotted.
#[inline]
#[must_use]
pub fn is_valid(value: f64) -> bool {
    value.is_finite()
}

/// Order statistics of a non-empty set of valid values.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Minimum.
    pub min: f64,
    /// Element at sorted position `⌊0.25·n⌋`.
    pub q1: f64,
    /// Middle element, or mean of the two middle elements.
    pub median: f64,
    /// Element at sorted position `⌊0.75·n⌋`.
    pub q3: f64,
    /// Maximum.
    pub max: f64,
}

impl Summary {
    /// Summarize values, skipping invalid ones.
    ///
    /// Returns `None` if no valid value remains.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| is_valid(*v)).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let n = sorted.len();
        let mid = n / 2;
        let median = if n % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            min: sorted[0],
            q1: nearest_rank(&sorted, 0.25),
            median,
            q3: nearest_rank(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }

    /// Range (max - min).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Interquartile range (q3 - q1).
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Value of a derivable statistic.
    ///
    /// `Avg` is only ever read from storage, so it yields [`INVALID`].
    #[must_use]
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Median => self.median,
            Statistic::Max => self.max,
            Statistic::Min => self.min,
            Statistic::Q1 => self.q1,
            Statistic::Q3 => self.q3,
            Statistic::Range => self.range(),
            Statistic::Iqr => self.iqr(),
            Statistic::Avg => INVALID,
        }
    }
}

/// Element at `⌊p·n⌋` of a sorted, non-empty slice.
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() as f64) * p).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Derive a statistic from raw values, or [`INVALID`] if none are valid.
#[must_use]
pub fn derive(values: &[f64], statistic: Statistic) -> f64 {
    Summary::from_values(values).map_or(INVALID, |s| s.get(statistic))
}
