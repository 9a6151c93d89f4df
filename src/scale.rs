//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to pixel positions. The value axis domain is
//! recomputed from the currently valid points on every redraw; the grade
//! axis is fixed.

use crate::error::{Error, Result};

/// Fixed domain of the exam-score axis.
pub const GRADE_DOMAIN: (f64, f64) = (0.0, 100.0);

/// Fraction of the value range added on each side of the value axis.
pub const RANGE_PADDING: f64 = 0.05;

/// Fraction of a lone value added on each side when min equals max.
pub const SINGLE_VALUE_PADDING: f64 = 0.1;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if domain.0 == domain.1 {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Unit domain `[0, 1]` onto `range`, for when no data domain exists.
    #[must_use]
    pub fn unit(range: (f64, f64)) -> Self {
        Self {
            domain_min: 0.0,
            domain_max: 1.0,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Roughly `count` evenly spaced round values inside the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain_min, self.domain_max, count)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Value-axis domain for the given plotted values.
///
/// Pads 5% of the range on each side, or 10% of the value itself when every
/// value is equal. Returns `None` when there is nothing to plot.
#[must_use]
pub fn padded_domain(values: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    if min == max {
        let pad = (min * SINGLE_VALUE_PADDING).abs();
        if pad == 0.0 {
            return Some((min - 1.0, max + 1.0));
        }
        return Some((min - pad, max + pad));
    }

    let pad = (max - min) * RANGE_PADDING;
    Some((min - pad, max + pad))
}

/// Nice tick spacing for `count` ticks over `[start, stop]`.
///
/// Steps are 1, 2 or 5 times a power of ten.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    if raw == 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let step = if error >= 50f64.sqrt() {
        power * 10.0
    } else if error >= 10f64.sqrt() {
        power * 5.0
    } else if error >= 2f64.sqrt() {
        power * 2.0
    } else {
        power
    };
    if stop < start {
        -step
    } else {
        step
    }
}

/// Round tick values inside `[start, stop]`, ascending.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    let step = tick_step(lo, hi, count);
    if step == 0.0 {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }

    // Integer multiples keep values like 0.3 exact in decimal.
    if step < 1.0 {
        let inv = (1.0 / step).round();
        let first = (lo * inv).ceil() as i64;
        let last = (hi * inv).floor() as i64;
        (first..=last).map(|i| i as f64 / inv).collect()
    } else {
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Decimal places needed to print ticks spaced `step` apart.
#[must_use]
pub fn tick_precision(step: f64) -> usize {
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    let exp = step.abs().log10().floor();
    if exp >= 0.0 {
        0
    } else {
        (-exp) as usize
    }
}
