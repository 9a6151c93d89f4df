//! Dataset loading and sanitization.
//!
//! The processed dataset is a JSON array of flat objects:
//!
//! ```json
//! [{"student_id": "S01", "exam_type": "Midterm 1", "grade": 78.0,
//!   "HR_avg": 84.1, "HR_period1": 88.0, "EDA_avg": "NaN"}]
//! ```
//!
//! Every field other than the three identifying ones is a measurement.
//! Missing values are written as the string `"NaN"`; on load these (and
//! `null` or any other non-numeric value) become [`INVALID`].

use crate::error::{Error, Result};
use crate::stats::INVALID;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// String sentinel used for missing values in the JSON file.
pub const MISSING_SENTINEL: &str = "NaN";

/// The exam a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExamType {
    /// First midterm.
    #[serde(rename = "Midterm 1")]
    Midterm1,
    /// Second midterm.
    #[serde(rename = "Midterm 2")]
    Midterm2,
    /// Final exam.
    #[serde(rename = "Final")]
    Final,
}

impl ExamType {
    /// All exams in chronological order.
    pub const ALL: [Self; 3] = [Self::Midterm1, Self::Midterm2, Self::Final];

    /// Name as written in the dataset and the recordings tree.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Midterm1 => "Midterm 1",
            Self::Midterm2 => "Midterm 2",
            Self::Final => "Final",
        }
    }

    /// Parse a dataset label.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == s)
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One student/exam row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Student identifier (`S01`..`S10`).
    pub student_id: String,
    /// Exam.
    pub exam_type: ExamType,
    /// Exam score, nominally 0-100.
    pub grade: f64,
    /// `<measure>_<statistic>` columns. Invalid values are [`INVALID`].
    pub measurements: BTreeMap<String, f64>,
}

/// On-disk shape of a record.
#[derive(Serialize, Deserialize)]
struct RawRecord {
    student_id: String,
    exam_type: ExamType,
    grade: Value,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

/// Normalize a JSON field to a number or [`INVALID`].
fn sanitize(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(INVALID),
        Value::String(s) if s == MISSING_SENTINEL => INVALID,
        Value::String(s) => s.trim().parse().unwrap_or(INVALID),
        _ => INVALID,
    }
}

/// Inverse of [`sanitize`] for writing.
fn desanitize(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map_or_else(|| Value::String(MISSING_SENTINEL.to_string()), Value::Number)
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            student_id: raw.student_id,
            exam_type: raw.exam_type,
            grade: sanitize(&raw.grade),
            measurements: raw.fields.iter().map(|(k, v)| (k.clone(), sanitize(v))).collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RawRecord {
            student_id: self.student_id.clone(),
            exam_type: self.exam_type,
            grade: desanitize(self.grade),
            fields: self.measurements.iter().map(|(k, v)| (k.clone(), desanitize(*v))).collect(),
        }
        .serialize(serializer)
    }
}

impl Record {
    /// Create a record with no measurements.
    #[must_use]
    pub fn new(student_id: impl Into<String>, exam_type: ExamType, grade: f64) -> Self {
        Self {
            student_id: student_id.into(),
            exam_type,
            grade,
            measurements: BTreeMap::new(),
        }
    }

    /// Add a measurement column.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.measurements.insert(key.into(), value);
        self
    }

    /// Stored value of a column, if the column exists.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.measurements.get(key).copied()
    }
}

/// Where the raw dataset text comes from.
pub trait DatasetSource {
    /// Short description for log and error messages.
    fn describe(&self) -> String;

    /// Fetch the raw JSON text. Called once; failures are not retried.
    fn fetch(&self) -> Result<String>;
}

/// Dataset stored in a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Dataset text already in memory (e.g. fetched by a browser host).
#[derive(Debug, Clone)]
pub struct InlineSource {
    text: String,
}

impl InlineSource {
    /// Wrap already-fetched JSON text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DatasetSource for InlineSource {
    fn describe(&self) -> String {
        format!("inline ({} bytes)", self.text.len())
    }

    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// The loaded, sanitized collection of records. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from records that are already sanitized.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Fetch and parse a dataset from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetLoad`] if the fetch or parse fails.
    pub fn load(source: &dyn DatasetSource) -> Result<Self> {
        let origin = source.describe();
        let text = source
            .fetch()
            .map_err(|e| Error::DatasetLoad(format!("{origin}: {e}")))?;
        let dataset =
            Self::from_json_str(&text).map_err(|e| Error::DatasetLoad(format!("{origin}: {e}")))?;
        tracing::info!(source = %origin, records = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Parse and sanitize a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not an array of records.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: Vec<RawRecord> = serde_json::from_str(text)?;
        Ok(Self::new(raw.into_iter().map(Record::from).collect()))
    }

    /// Serialize with `"NaN"` for invalid values.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Write the dataset as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// All records in file order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one student and exam, in file order.
    pub fn matching<'a>(
        &'a self,
        student_id: &'a str,
        exam_type: ExamType,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |r| r.student_id == student_id && r.exam_type == exam_type)
    }

    /// Sorted unique student ids.
    #[must_use]
    pub fn student_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.student_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"student_id": "S02", "exam_type": "Final", "grade": 91.5,
         "HR_avg": "NaN", "HR_1": 60, "HR_2": "80", "EDA_avg": null},
        {"student_id": "S01", "exam_type": "Midterm 1", "grade": 85,
         "HR_avg": 72.0, "TEMP_avg": "warm"}
    ]"#;

    #[test]
    fn test_parse_and_sanitize() {
        let ds = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(ds.len(), 2);

        let s02 = &ds.records()[0];
        assert_eq!(s02.exam_type, ExamType::Final);
        assert!(s02.get("HR_avg").unwrap().is_nan());
        assert_eq!(s02.get("HR_1"), Some(60.0));
        assert_eq!(s02.get("HR_2"), Some(80.0));
        assert!(s02.get("EDA_avg").unwrap().is_nan());
        assert_eq!(s02.get("TEMP_avg"), None);

        let s01 = &ds.records()[1];
        assert_eq!(s01.grade, 85.0);
        assert!(s01.get("TEMP_avg").unwrap().is_nan());
    }

    #[test]
    fn test_identifying_fields_are_not_measurements() {
        let ds = Dataset::from_json_str(SAMPLE).unwrap();
        let keys: Vec<_> = ds.records()[1].measurements.keys().cloned().collect();
        assert_eq!(keys, vec!["HR_avg".to_string(), "TEMP_avg".to_string()]);
    }

    #[test]
    fn test_unknown_exam_type_fails() {
        let text = r#"[{"student_id": "S01", "exam_type": "Quiz", "grade": 1}]"#;
        assert!(Dataset::from_json_str(text).is_err());
    }

    #[test]
    fn test_not_an_array_fails() {
        assert!(Dataset::from_json_str("{}").is_err());
        assert!(Dataset::from_json_str("").is_err());
    }

    #[test]
    fn test_student_ids_sorted_unique() {
        let ds = Dataset::new(vec![
            Record::new("S03", ExamType::Final, 50.0),
            Record::new("S01", ExamType::Final, 50.0),
            Record::new("S03", ExamType::Midterm1, 50.0),
        ]);
        assert_eq!(ds.student_ids(), vec!["S01".to_string(), "S03".to_string()]);
    }

    #[test]
    fn test_matching_filters_student_and_exam() {
        let ds = Dataset::new(vec![
            Record::new("S01", ExamType::Final, 1.0),
            Record::new("S01", ExamType::Midterm2, 2.0),
            Record::new("S02", ExamType::Final, 3.0),
        ]);
        let grades: Vec<f64> = ds.matching("S01", ExamType::Final).map(|r| r.grade).collect();
        assert_eq!(grades, vec![1.0]);
        assert_eq!(ds.matching("S09", ExamType::Final).count(), 0);
    }

    #[test]
    fn test_serialize_writes_sentinel() {
        let ds = Dataset::new(vec![Record::new("S01", ExamType::Midterm2, 80.0)
            .with("HR_avg", 70.5)
            .with("HR_period1", INVALID)]);
        let json = ds.to_json_pretty().unwrap();
        assert!(json.contains("\"exam_type\": \"Midterm 2\""));
        assert!(json.contains("\"HR_period1\": \"NaN\""));

        let back = Dataset::from_json_str(&json).unwrap();
        assert_eq!(back.records()[0].get("HR_avg"), Some(70.5));
        assert!(back.records()[0].get("HR_period1").unwrap().is_nan());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let ds = Dataset::load(&FileSource::new(file.path())).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_dataset_error() {
        let err = Dataset::load(&FileSource::new("/nonexistent/processed_data.json")).unwrap_err();
        assert!(matches!(err, Error::DatasetLoad(_)));
    }

    #[test]
    fn test_inline_source() {
        let ds = Dataset::load(&InlineSource::new(SAMPLE)).unwrap();
        assert_eq!(ds.student_ids().len(), 2);
    }

    #[test]
    fn test_exam_type_labels() {
        for exam in ExamType::ALL {
            assert_eq!(ExamType::parse(exam.label()), Some(exam));
        }
        assert_eq!(ExamType::Midterm1.to_string(), "Midterm 1");
    }
}
