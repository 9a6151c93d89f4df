//! Builds the processed dataset from raw wearable recordings.
//!
//! Expected layout:
//!
//! ```text
//! <input>/StudentGrades.txt
//! <input>/Data/S1/Midterm 1/HR.csv
//! <input>/Data/S1/Midterm 1/EDA.csv
//! ...
//! <input>/Data/S10/Final/BVP.csv
//! ```
//!
//! For every student and exam with a grade, each available measure yields
//! `<M>_avg` over the whole exam and `<M>_period1..3` over its thirds.

mod grades;
mod recording;

pub use grades::{normalize_student_id, parse_grades, Grades};
pub use recording::Recording;

use crate::dataset::{Dataset, ExamType, Record};
use crate::error::{Error, Result};
use crate::measure::Measure;
use crate::stats::INVALID;
use std::path::{Path, PathBuf};

/// Grades file name under the input directory.
pub const GRADES_FILE: &str = "StudentGrades.txt";

/// Recordings directory name under the input directory.
pub const DATA_DIR: &str = "Data";

/// Exam length in minutes.
#[must_use]
pub const fn exam_minutes(exam: ExamType) -> f64 {
    match exam {
        ExamType::Midterm1 | ExamType::Midterm2 => 90.0,
        ExamType::Final => 180.0,
    }
}

/// The three equal windows `(start, end)` in minutes.
#[must_use]
pub fn exam_periods(exam: ExamType) -> [(f64, f64); 3] {
    let third = exam_minutes(exam) / 3.0;
    [(0.0, third), (third, 2.0 * third), (2.0 * third, 3.0 * third)]
}

/// Summary columns for one recording.
fn summarize(record: Record, measure: Measure, recording: &Recording, exam: ExamType) -> Record {
    let key = measure.key();
    let whole = recording.window_mean(0.0, exam_minutes(exam)).unwrap_or(INVALID);
    let record = record.with(format!("{key}_avg"), whole);
    exam_periods(exam)
        .into_iter()
        .enumerate()
        .fold(record, |record, (i, (start, end))| {
            let mean = recording.window_mean(start, end).unwrap_or(INVALID);
            record.with(format!("{key}_period{}", i + 1), mean)
        })
}

/// Student folders under `data_dir`, sorted by normalized id.
fn student_folders(data_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('S') && entry.file_type()?.is_dir() {
            folders.push((normalize_student_id(&name), entry.path()));
        }
    }
    folders.sort();
    Ok(folders)
}

/// Build one record per student and exam with at least one measure.
///
/// Missing recordings are skipped with a warning. A recording with an
/// unreadable header is skipped the same way.
///
/// # Errors
///
/// Returns an error if the grades file or the data directory cannot be read,
/// or [`Error::EmptyData`] if no record has a usable recording.
pub fn prepare_dataset(input: &Path) -> Result<Dataset> {
    let grades_bytes = std::fs::read(input.join(GRADES_FILE))?;
    let grades = parse_grades(&String::from_utf8_lossy(&grades_bytes));
    tracing::info!(students = grades.len(), "grades parsed");

    let mut records = Vec::new();
    for (student_id, folder) in student_folders(&input.join(DATA_DIR))? {
        let Some(student_grades) = grades.get(&student_id) else {
            tracing::warn!(student = %student_id, folder = %folder.display(), "no grades, skipping");
            continue;
        };

        for exam in ExamType::ALL {
            let exam_dir = folder.join(exam.label());
            if !exam_dir.is_dir() {
                tracing::debug!(path = %exam_dir.display(), "exam folder not found");
                continue;
            }
            let Some(&grade) = student_grades.get(&exam) else {
                tracing::warn!(student = %student_id, exam = %exam, "no grade for exam");
                continue;
            };

            let mut record = Record::new(student_id.clone(), exam, grade);
            for measure in Measure::ALL {
                let path = exam_dir.join(format!("{}.csv", measure.key()));
                if !path.is_file() {
                    tracing::debug!(path = %path.display(), "recording not found");
                    continue;
                }
                match Recording::read(&path) {
                    Ok(recording) if !recording.values.is_empty() => {
                        record = summarize(record, measure, &recording, exam);
                    }
                    Ok(_) => tracing::warn!(path = %path.display(), "recording has no samples"),
                    Err(e) => tracing::warn!(error = %e, "skipping recording"),
                }
            }

            if record.measurements.is_empty() {
                tracing::warn!(student = %student_id, exam = %exam, "no recordings, skipping");
            } else {
                tracing::debug!(student = %student_id, exam = %exam, "record prepared");
                records.push(record);
            }
        }
    }

    if records.is_empty() {
        return Err(Error::EmptyData);
    }
    tracing::info!(records = records.len(), "dataset prepared");
    Ok(Dataset::new(records))
}
