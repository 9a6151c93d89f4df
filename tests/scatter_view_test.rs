//! End-to-end tests: dataset text in, SVG out.
//!
//! Run: cargo test --test scatter_view_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use physio_viz::format::LOAD_ERROR_MESSAGE;
use physio_viz::prelude::*;
use physio_viz::view::PointKey;

const DATASET: &str = r#"[
    {"student_id": "S01", "exam_type": "Midterm 1", "grade": 85, "HR_avg": 72},
    {"student_id": "S02", "exam_type": "Final", "grade": 60,
     "HR_avg": "NaN", "HR_1": 60, "HR_2": 80}
]"#;

fn key(student: &str, exam: ExamType) -> PointKey {
    PointKey {
        student_id: student.to_string(),
        exam_type: exam,
    }
}

fn setup() -> (ViewState, SvgSurface) {
    let scene = Scene::default();
    let mut view = ViewState::new(scene.clone(), Selection::default());
    let mut surface = SvgSurface::new(scene);
    view.load(&InlineSource::new(DATASET), &mut surface).unwrap();
    (view, surface)
}

#[test]
fn test_average_shows_only_stored_values() {
    let (view, surface) = setup();
    let frame = view.frame().unwrap();

    assert_eq!(frame.points.len(), 1);
    let s01 = frame.point_for("S01", ExamType::Midterm1).unwrap();
    assert_relative_eq!(s01.value, 72.0);
    assert!(frame.point_for("S02", ExamType::Final).is_none());
    assert!(surface.has_point(&key("S01", ExamType::Midterm1)));
    assert!(!surface.has_point(&key("S02", ExamType::Final)));
}

#[test]
fn test_single_point_domain() {
    let (view, _) = setup();
    let (lo, hi) = view.frame().unwrap().axes.x_domain;
    assert_relative_eq!(lo, 72.0 - 7.2, epsilon = 1e-9);
    assert_relative_eq!(hi, 72.0 + 7.2, epsilon = 1e-9);
}

#[test]
fn test_switch_to_max_and_back() {
    let (mut view, mut surface) = setup();

    view.select_statistic("max", &mut surface).unwrap();
    let frame = view.frame().unwrap();
    assert_eq!(frame.points.len(), 1, "S01 has no raw columns");
    let s02 = frame.point_for("S02", ExamType::Final).unwrap();
    assert_relative_eq!(s02.value, 80.0);
    assert_eq!(frame.axes.x_label, "HR (Maximum BPM)");
    assert_eq!(s02.tooltip.lines()[3], "Maximum HR: 80.00 BPM");

    let svg = surface.render();
    assert!(svg.contains(r#"id="S02-Final""#));
    // S01 is fading out.
    assert!(svg.contains(r#"id="S01-Midterm 1" class="data-point""#));
    assert!(svg.contains(r#"opacity="0""#));

    view.select_statistic("avg", &mut surface).unwrap();
    let frame = view.frame().unwrap();
    assert_eq!(frame.points.len(), 1);
    assert_relative_eq!(frame.point_for("S01", ExamType::Midterm1).unwrap().value, 72.0);
    assert!(surface.has_point(&key("S01", ExamType::Midterm1)));
    assert!(!surface.has_point(&key("S02", ExamType::Final)));
}

#[test]
fn test_derived_statistics_for_s02() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let resolver = Resolver::new(&dataset);
    let resolve = |stat| resolver.resolve("S02", ExamType::Final, "HR", stat);

    assert!(resolve("avg").is_nan(), "stored NaN is not derived");
    assert_relative_eq!(resolve("median"), 70.0);
    assert_relative_eq!(resolve("min"), 60.0);
    assert_relative_eq!(resolve("range"), 20.0);
    assert_relative_eq!(resolve("q1"), 60.0);
    assert_relative_eq!(resolve("q3"), 80.0);
    assert_relative_eq!(resolve("iqr"), 20.0);
}

#[test]
fn test_unknown_selectors_draw_nothing() {
    let (mut view, mut surface) = setup();
    let before = view.frame().unwrap().axes.x_domain;

    view.select_measure("SpO2", &mut surface).unwrap();
    let frame = view.frame().unwrap();
    assert!(frame.points.is_empty());
    assert_eq!(frame.axes.x_domain, before, "axis keeps its last domain");
    assert_eq!(frame.axes.x_label, "SpO2 (Average )");
    assert_eq!(surface.point_count(), 0);
}

#[test]
fn test_load_failure() {
    let scene = Scene::default();
    let mut view = ViewState::new(scene.clone(), Selection::default());
    let mut surface = SvgSurface::new(scene);

    view.load(&FileSource::new("/nonexistent/processed_data.json"), &mut surface)
        .unwrap();
    assert!(matches!(view.load_state(), LoadState::Failed(_)));
    assert!(surface.render().contains(LOAD_ERROR_MESSAGE));

    view.select_measure("EDA", &mut surface).unwrap();
    assert!(view.frame().is_none());
}

#[test]
fn test_svg_written_to_file() {
    let (_, surface) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scatter.svg");
    surface.write_to_file(&path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<title>Student: S01\nExam: Midterm 1\nScore: 85.0\nAverage HR: 72.00 BPM</title>"));
}

#[test]
fn test_config_drives_scene() {
    let config = Config::parse(
        "layout:\n  width: 600\n  transition_ms: 0\npalette:\n  final_exam: \"#000000\"\n",
    )
    .unwrap();
    let scene = Scene::from_config(&config).unwrap();
    assert_eq!(scene.palette.final_exam, Rgba::BLACK);

    let mut view = ViewState::new(scene.clone(), Selection::new("HR", "max"));
    let mut surface = SvgSurface::new(scene);
    view.load(&InlineSource::new(DATASET), &mut surface).unwrap();

    let svg = surface.render();
    assert!(svg.contains(r#"width="690""#));
    assert!(!svg.contains("<animate"));
    assert!(svg.contains(r#"fill="rgb(0,0,0)""#));
}
