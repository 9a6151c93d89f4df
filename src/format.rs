//! Text for axis labels and tooltips.

use crate::dataset::ExamType;
use crate::measure::{label_for, unit_for, Measure};
use crate::stats::is_valid;
use std::fmt;

/// Label of the fixed grade axis.
pub const GRADE_AXIS_LABEL: &str = "Exam Score";

/// Message shown in place of the plot when the dataset fails to load.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Please check console for details.";

/// Message shown while the dataset is loading.
pub const LOADING_MESSAGE: &str = "Loading data...";

/// Fixed-point text with exact halfway cases rounded away from zero, the way
/// browsers round in `Number.prototype.toFixed`.
#[allow(clippy::float_cmp)]
fn to_fixed(value: f64, decimals: u8) -> String {
    let precision = usize::from(decimals);
    let factor = 10f64.powi(i32::from(decimals));
    let scaled = value.abs() * factor;
    // A tie only counts when the product itself was exact.
    let exact = value.abs().mul_add(factor, -scaled) == 0.0;
    if exact && scaled.fract() == 0.5 {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{:.precision$}", scaled.ceil() / factor);
    }
    format!("{value:.precision$}")
}

/// Format a measurement with precision suited to its magnitude.
///
/// Blood-volume pulse and values below 0.1 get 4 decimals, values below 1
/// get 3, everything else 2. Invalid values print as `N/A`.
#[must_use]
pub fn format_measure_value(value: f64, measure: &str) -> String {
    if !is_valid(value) {
        return "N/A".to_string();
    }
    let magnitude = value.abs();
    if measure == Measure::BloodVolumePulse.key() || magnitude < 0.1 {
        to_fixed(value, 4)
    } else if magnitude < 1.0 {
        to_fixed(value, 3)
    } else {
        to_fixed(value, 2)
    }
}

/// Value-axis label, e.g. `HR (Average BPM)`.
#[must_use]
pub fn value_axis_label(measure: &str, statistic: &str) -> String {
    format!("{measure} ({} {})", label_for(statistic), unit_for(measure))
}

/// Hover content for one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Student id.
    pub student_id: String,
    /// Exam.
    pub exam_type: ExamType,
    /// Exam score.
    pub grade: f64,
    /// `<stat label> <measure>` heading of the value line.
    pub value_heading: String,
    /// Formatted value.
    pub value: String,
    /// Unit, empty for unknown measures.
    pub unit: &'static str,
}

impl Tooltip {
    /// Build the tooltip for a resolved point.
    #[must_use]
    pub fn new(
        student_id: &str,
        exam_type: ExamType,
        grade: f64,
        measure: &str,
        statistic: &str,
        value: f64,
    ) -> Self {
        Self {
            student_id: student_id.to_string(),
            exam_type,
            grade,
            value_heading: format!("{} {measure}", label_for(statistic)),
            value: format_measure_value(value, measure),
            unit: unit_for(measure),
        }
    }

    /// Lines as shown on hover.
    #[must_use]
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Student: {}", self.student_id),
            format!("Exam: {}", self.exam_type),
            format!("Score: {}", to_fixed(self.grade, 1)),
            format!("{}: {} {}", self.value_heading, self.value, self.unit)
                .trim_end()
                .to_string(),
        ]
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}
