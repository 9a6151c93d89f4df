//! Raw wearable recordings.
//!
//! Each `<MEASURE>.csv` file starts with the session start time (Unix
//! seconds) and the sample rate in Hz, each on its own line, followed by one
//! sample per line. Only the first comma-separated column is used.

use crate::error::{Error, Result};
use std::path::Path;

/// One signal recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Session start, Unix seconds.
    pub start_time: f64,
    /// Samples per second.
    pub sample_rate: f64,
    /// Samples in recording order.
    pub values: Vec<f64>,
}

fn header_value(line: Option<&str>, what: &str) -> std::result::Result<f64, String> {
    let line = line.ok_or_else(|| format!("missing {what} line"))?;
    first_column(line).ok_or_else(|| format!("invalid {what}: {:?}", line.trim()))
}

fn first_column(line: &str) -> Option<f64> {
    line.split(',').next()?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Recording {
    /// Parse recording text. Blank and unparsable sample lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recording`] if either header line is missing or not a
    /// number, or the sample rate is not positive.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let invalid = |message: String| Error::Recording {
            path: origin.to_string(),
            message,
        };

        let mut lines = text.lines();
        let start_time = header_value(lines.next(), "start time").map_err(invalid)?;
        let sample_rate = header_value(lines.next(), "sample rate").map_err(invalid)?;
        if sample_rate <= 0.0 {
            return Err(invalid(format!("sample rate must be positive, got {sample_rate}")));
        }

        let values = lines.filter_map(first_column).collect();
        Ok(Self {
            start_time,
            sample_rate,
            values,
        })
    }

    /// Read and parse a recording file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its header is invalid.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Mean of the samples between two offsets (minutes) from the start.
    ///
    /// The window is clipped to the recorded samples. Returns `None` when it
    /// holds no sample.
    #[must_use]
    pub fn window_mean(&self, start_minute: f64, end_minute: f64) -> Option<f64> {
        let start = (start_minute * 60.0 * self.sample_rate) as usize;
        let end = ((end_minute * 60.0 * self.sample_rate) as usize).min(self.values.len());
        if start >= end {
            return None;
        }
        let window = &self.values[start..end];
        Some(window.iter().sum::<f64>() / window.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_recording() {
        let rec = Recording::parse("1544027337.0\n1.0\n70\n\nabc\n72.5,0.1\n74\n", "HR.csv").unwrap();
        assert_relative_eq!(rec.start_time, 1_544_027_337.0);
        assert_relative_eq!(rec.sample_rate, 1.0);
        assert_eq!(rec.values, vec![70.0, 72.5, 74.0]);
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert!(matches!(
            Recording::parse("start\n4\n1\n", "EDA.csv"),
            Err(Error::Recording { .. })
        ));
        assert!(Recording::parse("0\n0\n1\n", "EDA.csv").is_err());
        assert!(Recording::parse("0\n", "EDA.csv").is_err());
    }

    #[test]
    fn test_window_mean_by_minutes() {
        // 1 sample per second, 3 minutes: 60 ones, 60 twos, 60 threes.
        let values = [1.0, 2.0, 3.0].iter().flat_map(|v| std::iter::repeat(*v).take(60)).collect();
        let rec = Recording {
            start_time: 0.0,
            sample_rate: 1.0,
            values,
        };
        assert_relative_eq!(rec.window_mean(0.0, 1.0).unwrap(), 1.0);
        assert_relative_eq!(rec.window_mean(1.0, 2.0).unwrap(), 2.0);
        assert_relative_eq!(rec.window_mean(0.0, 3.0).unwrap(), 2.0);
    }

    #[test]
    fn test_window_mean_clipped_and_empty() {
        let rec = Recording {
            start_time: 0.0,
            sample_rate: 1.0,
            values: vec![4.0; 90],
        };
        assert_relative_eq!(rec.window_mean(0.0, 30.0).unwrap(), 4.0);
        assert_eq!(rec.window_mean(2.0, 30.0), None);
        assert_eq!(rec.window_mean(1.0, 1.0), None);
    }
}
