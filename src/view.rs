//! View state and frame preparation.
//!
//! The view owns the loaded dataset and the current selector values. Every
//! selection change runs a full cycle: resolve every record's value, drop the
//! invalid ones, rescale the value axis, and push the keyed
//! enter/update/exit changes to a [`PlotSurface`].

use crate::color::{Palette, Rgba};
use crate::config::{Config, Layout};
use crate::dataset::{Dataset, DatasetSource, ExamType, Record};
use crate::error::Result;
use crate::format::{value_axis_label, Tooltip, GRADE_AXIS_LABEL, LOAD_ERROR_MESSAGE, LOADING_MESSAGE};
use crate::render::PlotSurface;
use crate::resolver::Resolver;
use crate::scale::{padded_domain, tick_precision, tick_step, LinearScale, Scale, GRADE_DOMAIN};
use crate::stats::is_valid;
use crate::symbol::Symbol;
use std::collections::BTreeSet;

/// Current selector values. Free-form; unknown values resolve to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Measure key, e.g. `HR`.
    pub measure: String,
    /// Statistic key, e.g. `avg`.
    pub statistic: String,
}

impl Selection {
    /// Create a selection.
    pub fn new(measure: impl Into<String>, statistic: impl Into<String>) -> Self {
        Self {
            measure: measure.into(),
            statistic: statistic.into(),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new("HR", "avg")
    }
}

/// Rendering parameters that do not change between redraws.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Plot geometry.
    pub layout: Layout,
    /// Colors.
    pub palette: Palette,
}

impl Scene {
    /// Build the scene described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a palette color is malformed.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            layout: config.layout.clone(),
            palette: config.palette()?,
        })
    }
}

/// Identity of a point across redraws.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    /// Student id.
    pub student_id: String,
    /// Exam.
    pub exam_type: ExamType,
}

impl PointKey {
    /// Stable string id, e.g. `S01-Midterm 1`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}-{}", self.student_id, self.exam_type)
    }
}

/// A point with a valid value, positioned in plot-area coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint {
    /// Identity.
    pub key: PointKey,
    /// Resolved value (x).
    pub value: f64,
    /// Exam score (y).
    pub grade: f64,
    /// Horizontal position in pixels from the plot-area origin.
    pub x: f64,
    /// Vertical position in pixels from the plot-area origin.
    pub y: f64,
    /// Fill, by exam.
    pub color: Rgba,
    /// Shape, by student.
    pub symbol: Symbol,
    /// Hover content.
    pub tooltip: Tooltip,
}

/// One axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Data value.
    pub value: f64,
    /// Pixel position along the axis.
    pub position: f64,
    /// Printed label.
    pub label: String,
}

/// Axis state for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisFrame {
    /// Value-axis domain.
    pub x_domain: (f64, f64),
    /// Value-axis ticks.
    pub x_ticks: Vec<Tick>,
    /// Grade-axis ticks.
    pub y_ticks: Vec<Tick>,
    /// Value-axis label.
    pub x_label: String,
    /// Grade-axis label.
    pub y_label: String,
    /// Plot-area width.
    pub width: f64,
    /// Plot-area height.
    pub height: f64,
}

/// Everything drawn for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Selection the frame was computed for.
    pub selection: Selection,
    /// Axes.
    pub axes: AxisFrame,
    /// Valid points, in dataset order.
    pub points: Vec<PlacedPoint>,
}

impl Frame {
    /// Point with the given key, if drawn.
    #[must_use]
    pub fn point(&self, key: &PointKey) -> Option<&PlacedPoint> {
        self.points.iter().find(|p| &p.key == key)
    }

    /// Point for a student and exam, if drawn.
    #[must_use]
    pub fn point_for(&self, student_id: &str, exam_type: ExamType) -> Option<&PlacedPoint> {
        self.points
            .iter()
            .find(|p| p.key.student_id == student_id && p.key.exam_type == exam_type)
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Student id.
    pub student_id: String,
    /// Shape.
    pub symbol: Symbol,
}

/// Legend rows for every student in the dataset, sorted by id.
#[must_use]
pub fn legend(dataset: &Dataset) -> Vec<LegendEntry> {
    dataset
        .student_ids()
        .into_iter()
        .map(|student_id| LegendEntry {
            symbol: Symbol::for_student(&student_id),
            student_id,
        })
        .collect()
}

fn axis_ticks(scale: &LinearScale, count: usize) -> Vec<Tick> {
    let (lo, hi) = scale.domain();
    let precision = tick_precision(tick_step(lo, hi, count));
    scale
        .ticks(count)
        .into_iter()
        .map(|value| Tick {
            value,
            position: scale.scale(value),
            label: format!("{value:.precision$}"),
        })
        .collect()
}

/// Compute the frame for a selection. Pure: no logging, no drawing.
///
/// `previous_domain` is kept for the value axis when no point is valid.
#[must_use]
pub fn prepare_frame(
    dataset: &Dataset,
    selection: &Selection,
    scene: &Scene,
    previous_domain: Option<(f64, f64)>,
) -> Frame {
    let resolver = Resolver::new(dataset);
    let resolved: Vec<(&Record, f64)> = dataset
        .records()
        .iter()
        .map(|r| {
            let value = resolver.resolve(&r.student_id, r.exam_type, &selection.measure, &selection.statistic);
            (r, value)
        })
        .filter(|(r, value)| is_valid(*value) && is_valid(r.grade))
        .collect();

    let values: Vec<f64> = resolved.iter().map(|(_, v)| *v).collect();
    let width = scene.layout.inner_width();
    let height = scene.layout.inner_height();
    // Before any valid point has been drawn the value axis shows [0, 1].
    let x_scale = padded_domain(&values)
        .or(previous_domain)
        .and_then(|domain| LinearScale::new(domain, (0.0, width)).ok())
        .unwrap_or_else(|| LinearScale::unit((0.0, width)));
    let y_scale = LinearScale::new(GRADE_DOMAIN, (height, 0.0))
        .unwrap_or_else(|_| LinearScale::unit((height, 0.0)));

    let points = resolved
        .into_iter()
        .map(|(record, value)| PlacedPoint {
            key: PointKey {
                student_id: record.student_id.clone(),
                exam_type: record.exam_type,
            },
            value,
            grade: record.grade,
            x: x_scale.scale(value),
            y: y_scale.scale(record.grade),
            color: scene.palette.exam(record.exam_type),
            symbol: Symbol::for_student(&record.student_id),
            tooltip: Tooltip::new(
                &record.student_id,
                record.exam_type,
                record.grade,
                &selection.measure,
                &selection.statistic,
                value,
            ),
        })
        .collect();

    Frame {
        selection: selection.clone(),
        axes: AxisFrame {
            x_domain: x_scale.domain(),
            x_ticks: axis_ticks(&x_scale, scene.layout.tick_count),
            y_ticks: axis_ticks(&y_scale, scene.layout.tick_count),
            x_label: value_axis_label(&selection.measure, &selection.statistic),
            y_label: GRADE_AXIS_LABEL.to_string(),
            width,
            height,
        },
        points,
    }
}

/// Keyed changes between two frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameDiff {
    /// Keys drawn now but not before.
    pub entered: Vec<PointKey>,
    /// Keys drawn in both frames.
    pub updated: Vec<PointKey>,
    /// Keys drawn before but not now.
    pub exited: Vec<PointKey>,
}

/// Match points by key between the previous frame and the next one.
#[must_use]
pub fn diff_frames(previous: Option<&Frame>, next: &Frame) -> FrameDiff {
    let before: BTreeSet<&PointKey> = previous
        .map(|f| f.points.iter().map(|p| &p.key).collect())
        .unwrap_or_default();
    let after: BTreeSet<&PointKey> = next.points.iter().map(|p| &p.key).collect();

    FrameDiff {
        entered: after.difference(&before).map(|k| (*k).clone()).collect(),
        updated: after.intersection(&before).map(|k| (*k).clone()).collect(),
        exited: before.difference(&after).map(|k| (*k).clone()).collect(),
    }
}

/// Dataset availability.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Fetch not yet finished.
    Loading,
    /// Dataset available.
    Ready(Dataset),
    /// Fetch failed; the message was shown and nothing will be drawn.
    Failed(String),
}

/// The scatter view: selection, dataset, last drawn frame.
#[derive(Debug, Clone)]
pub struct ViewState {
    selection: Selection,
    load: LoadState,
    scene: Scene,
    current: Option<Frame>,
}

impl ViewState {
    /// Create a view that is still waiting for its dataset.
    #[must_use]
    pub fn new(scene: Scene, selection: Selection) -> Self {
        Self {
            selection,
            load: LoadState::Loading,
            scene,
            current: None,
        }
    }

    /// Show the loading message on a fresh surface.
    pub fn begin_load(&self, surface: &mut dyn PlotSurface) -> Result<()> {
        surface.show_message(LOADING_MESSAGE)
    }

    /// Fetch the dataset once and draw the first frame.
    ///
    /// A failed fetch is not an error for the caller: the view records it,
    /// shows the load-error message, and stays empty.
    pub fn load(&mut self, source: &dyn DatasetSource, surface: &mut dyn PlotSurface) -> Result<()> {
        self.begin_load(surface)?;
        let result = Dataset::load(source);
        self.finish_load(result, surface)
    }

    /// Install the outcome of a fetch performed elsewhere.
    pub fn finish_load(
        &mut self,
        result: Result<Dataset>,
        surface: &mut dyn PlotSurface,
    ) -> Result<()> {
        match result {
            Ok(dataset) => {
                surface.set_legend(&legend(&dataset))?;
                surface.clear_message()?;
                self.load = LoadState::Ready(dataset);
                self.redraw(surface)
            }
            Err(e) => {
                tracing::error!(error = %e, "error loading data");
                self.load = LoadState::Failed(e.to_string());
                surface.show_message(LOAD_ERROR_MESSAGE)
            }
        }
    }

    /// Change the measure selector and redraw.
    pub fn select_measure(&mut self, measure: &str, surface: &mut dyn PlotSurface) -> Result<()> {
        self.selection.measure = measure.to_string();
        self.redraw(surface)
    }

    /// Change the statistic selector and redraw.
    pub fn select_statistic(&mut self, statistic: &str, surface: &mut dyn PlotSurface) -> Result<()> {
        self.selection.statistic = statistic.to_string();
        self.redraw(surface)
    }

    /// Recompute every point and push the changes to `surface`.
    ///
    /// Does nothing until the dataset is ready.
    pub fn redraw(&mut self, surface: &mut dyn PlotSurface) -> Result<()> {
        let LoadState::Ready(dataset) = &self.load else {
            return Ok(());
        };

        let previous_domain = self.current.as_ref().map(|f| f.axes.x_domain);
        let frame = prepare_frame(dataset, &self.selection, &self.scene, previous_domain);
        let changes = diff_frames(self.current.as_ref(), &frame);

        tracing::debug!(
            measure = %self.selection.measure,
            statistic = %self.selection.statistic,
            valid = frame.points.len(),
            entered = changes.entered.len(),
            exited = changes.exited.len(),
            "redraw"
        );
        if frame.points.is_empty() {
            tracing::warn!(
                measure = %self.selection.measure,
                statistic = %self.selection.statistic,
                "no valid data points for the current selection"
            );
        }

        surface.set_axes(&frame.axes)?;
        for key in &changes.exited {
            surface.exit_point(key)?;
        }
        for point in &frame.points {
            if changes.entered.contains(&point.key) {
                surface.enter_point(point)?;
            } else {
                surface.update_point(point)?;
            }
        }

        self.current = Some(frame);
        Ok(())
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Load state.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Last drawn frame.
    #[must_use]
    pub fn frame(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// Rendering parameters.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}
