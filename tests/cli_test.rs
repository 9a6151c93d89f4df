//! The `physio-viz` binary driven end to end.
//!
//! Run: cargo test --test cli_test

#![allow(clippy::unwrap_used)]

use physio_viz::format::LOAD_ERROR_MESSAGE;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const DATASET: &str = r#"[
    {"student_id": "S01", "exam_type": "Midterm 1", "grade": 85, "HR_avg": 72},
    {"student_id": "S02", "exam_type": "Final", "grade": 60,
     "HR_avg": "NaN", "HR_1": 60, "HR_2": 80}
]"#;

/// A temp dir holding the dataset and a config that picks `max`.
fn workspace() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("processed_data.json");
    fs::write(&data, DATASET).unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "selection:\n  measure: HR\n  statistic: max\n").unwrap();
    (dir, data, config)
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_physio-viz"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_render_writes_svg() {
    let (dir, data, config) = workspace();
    let out = dir.path().join("plot.svg");
    let output = run(
        &config,
        &[
            "render",
            "--data",
            data.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--no-animation",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // Statistic comes from the config file.
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains(r#"id="S02-Final""#));
    assert!(!svg.contains(r#"id="S01-Midterm 1""#));
    assert!(!svg.contains("<animate"));
}

#[test]
fn test_render_flags_override_config() {
    let (dir, data, config) = workspace();
    let out = dir.path().join("avg.svg");
    let output = run(
        &config,
        &[
            "render",
            "--data",
            data.to_str().unwrap(),
            "--stat",
            "avg",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains(r#"id="S01-Midterm 1""#));
    assert!(!svg.contains(r#"id="S02-Final""#));
}

#[test]
fn test_render_missing_data_still_writes_message() {
    let (dir, _, config) = workspace();
    let out = dir.path().join("failed.svg");
    let missing = dir.path().join("nope.json");
    let output = run(
        &config,
        &[
            "render",
            "--data",
            missing.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains(LOAD_ERROR_MESSAGE));
}

#[test]
fn test_resolve_prints_value_with_unit() {
    let (_dir, data, config) = workspace();
    let output = run(
        &config,
        &[
            "resolve",
            "--data",
            data.to_str().unwrap(),
            "--student",
            "S02",
            "--exam",
            "Final",
            "--stat",
            "max",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "Maximum HR for S02 (Final): 80.00 BPM");
}

#[test]
fn test_resolve_invalid_value_is_na() {
    let (_dir, data, config) = workspace();
    let output = run(
        &config,
        &[
            "resolve",
            "--data",
            data.to_str().unwrap(),
            "--student",
            "S02",
            "--exam",
            "Final",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "Average HR for S02 (Final): N/A");
}

#[test]
fn test_resolve_unknown_exam_fails() {
    let (_dir, data, config) = workspace();
    let output = run(
        &config,
        &[
            "resolve",
            "--data",
            data.to_str().unwrap(),
            "--student",
            "S01",
            "--exam",
            "Quiz",
        ],
    );
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}
