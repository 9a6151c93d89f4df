//! Statistic resolution for a single (student, exam) point.

use crate::dataset::{Dataset, ExamType};
use crate::measure::{column_key, Statistic};
use crate::stats::{derive, is_valid, INVALID};

/// Resolves the value plotted for one point.
///
/// A stored `<measure>_<statistic>` column always wins, even when it holds
/// the invalid marker. Only when the column is absent is the statistic
/// derived from the measure's raw columns.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    dataset: &'a Dataset,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a loaded dataset.
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Resolve `statistic` of `measure` for one student and exam.
    ///
    /// Returns [`INVALID`] when there is no matching record, no stored
    /// column and no valid raw value, or the statistic is unknown.
    #[must_use]
    pub fn resolve(&self, student_id: &str, exam_type: ExamType, measure: &str, statistic: &str) -> f64 {
        let mut matching = self.dataset.matching(student_id, exam_type).peekable();
        let Some(first) = matching.peek() else {
            return INVALID;
        };

        if let Some(stored) = first.get(&column_key(measure, statistic)) {
            return stored;
        }

        let Some(statistic) = Statistic::parse(statistic) else {
            return INVALID;
        };

        let prefix = format!("{measure}_");
        let avg_key = column_key(measure, Statistic::Avg.key());
        let raw: Vec<f64> = matching
            .flat_map(|record| record.measurements.iter())
            .filter(|(key, value)| key.starts_with(&prefix) && **key != avg_key && is_valid(**value))
            .map(|(_, value)| *value)
            .collect();

        derive(&raw, statistic)
    }
}
