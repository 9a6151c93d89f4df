//! SVG implementation of [`PlotSurface`].
//!
//! The surface keeps the marks of the last redraw keyed by point. Rendering
//! produces a standalone document that replays the last transition: entering
//! points fade in, updated points slide from their previous position,
//! exiting points fade out, and x-axis ticks slide from where their value sat
//! on the previous axis.

use super::PlotSurface;
use crate::color::Rgba;
use crate::dataset::ExamType;
use crate::error::Result;
use crate::output::{Animation, Group, SvgElement, SvgEncoder, TextAnchor};
use crate::symbol::Symbol;
use crate::view::{AxisFrame, LegendEntry, PlacedPoint, PointKey, Scene};
use std::collections::BTreeMap;
use std::path::Path;

const TICK_SIZE: f64 = 6.0;
const TICK_FONT_SIZE: f64 = 11.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const LEGEND_ROW_HEIGHT: f64 = 22.0;
const LEGEND_SYMBOL_AREA: f64 = 100.0;

#[derive(Debug, Clone)]
struct Mark {
    point: PlacedPoint,
    /// Position before this redraw; `None` when the point just entered.
    from: Option<(f64, f64)>,
}

/// Plot surface producing SVG documents.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    scene: Scene,
    axes: Option<AxisFrame>,
    previous_domain: Option<(f64, f64)>,
    marks: BTreeMap<PointKey, Mark>,
    exiting: Vec<PlacedPoint>,
    legend: Vec<LegendEntry>,
    message: Option<String>,
}

impl SvgSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            axes: None,
            previous_domain: None,
            marks: BTreeMap::new(),
            exiting: Vec::new(),
            legend: Vec::new(),
            message: None,
        }
    }

    /// Number of points currently drawn (exiting points excluded).
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.marks.len()
    }

    /// Whether a point is currently drawn.
    #[must_use]
    pub fn has_point(&self, key: &PointKey) -> bool {
        self.marks.contains_key(key)
    }

    /// Current status message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn animated(&self) -> bool {
        self.scene.layout.transition_ms > 0
    }

    fn point_group(&self, point: &PlacedPoint, animation: Option<Animation>) -> Group {
        let mut group = Group::with_class("data-point");
        group.id = Some(point.key.id());
        group.translate = Some((point.x, point.y));
        group.title = Some(point.tooltip.to_string());
        group.animations.extend(animation);
        group.push(SvgElement::Path {
            d: point.symbol.path(self.scene.layout.symbol_area),
            fill: Some(point.color),
            stroke: None,
            stroke_width: 0.0,
        });
        group
    }

    fn points(&self) -> Group {
        let ms = self.scene.layout.transition_ms;
        let mut layer = Group::with_class("points");

        for point in &self.exiting {
            let mut group = self.point_group(
                point,
                self.animated().then_some(Animation::Opacity {
                    from: 1.0,
                    to: 0.0,
                    duration_ms: ms,
                }),
            );
            group.opacity = Some(0.0);
            layer.push(SvgElement::Group(group));
        }

        for mark in self.marks.values() {
            let animation = match mark.from {
                None => Animation::Opacity {
                    from: 0.0,
                    to: 1.0,
                    duration_ms: ms,
                },
                Some(from) => Animation::Translate {
                    from,
                    to: (mark.point.x, mark.point.y),
                    duration_ms: ms,
                },
            };
            let group = self.point_group(&mark.point, self.animated().then_some(animation));
            layer.push(SvgElement::Group(group));
        }
        layer
    }

    /// Where `value` sat on the previous value axis.
    fn previous_position(&self, value: f64, width: f64) -> Option<f64> {
        let (lo, hi) = self.previous_domain?;
        if lo == hi {
            return None;
        }
        Some((value - lo) / (hi - lo) * width)
    }

    fn axes(&self, axes: &AxisFrame) -> Vec<SvgElement> {
        let palette = &self.scene.palette;
        let margin = self.scene.layout.margin;
        let ms = self.scene.layout.transition_ms;
        let (w, h) = (axes.width, axes.height);

        let mut grid = Group::with_class("grid");
        let mut x_axis = Group::with_class("x-axis");
        x_axis.translate = Some((0.0, h));
        x_axis.push(SvgElement::Line {
            x1: 0.0,
            y1: 0.0,
            x2: w,
            y2: 0.0,
            stroke: palette.axis,
            stroke_width: 1.0,
        });

        for tick in &axes.x_ticks {
            let slide = self
                .previous_position(tick.value, w)
                .filter(|_| self.animated())
                .map(|from| Animation::Translate {
                    from: (from, 0.0),
                    to: (tick.position, 0.0),
                    duration_ms: ms,
                });

            let mut grid_line = Group::with_class("x-grid");
            grid_line.translate = Some((tick.position, 0.0));
            grid_line.animations.extend(slide);
            grid_line.push(SvgElement::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 0.0,
                y2: h,
                stroke: palette.grid,
                stroke_width: 1.0,
            });
            grid.push(SvgElement::Group(grid_line));

            let mut tick_group = Group::with_class("tick");
            tick_group.translate = Some((tick.position, 0.0));
            tick_group.animations.extend(slide);
            tick_group.push(SvgElement::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 0.0,
                y2: TICK_SIZE,
                stroke: palette.axis,
                stroke_width: 1.0,
            });
            tick_group.push(SvgElement::Text {
                x: 0.0,
                y: TICK_SIZE + 12.0,
                text: tick.label.clone(),
                font_size: TICK_FONT_SIZE,
                fill: palette.axis,
                anchor: TextAnchor::Middle,
                rotate: None,
            });
            x_axis.push(SvgElement::Group(tick_group));
        }

        let mut y_axis = Group::with_class("y-axis");
        y_axis.push(SvgElement::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: h,
            stroke: palette.axis,
            stroke_width: 1.0,
        });
        for tick in &axes.y_ticks {
            grid.push(SvgElement::Line {
                x1: 0.0,
                y1: tick.position,
                x2: w,
                y2: tick.position,
                stroke: palette.grid,
                stroke_width: 1.0,
            });
            y_axis.push(SvgElement::Line {
                x1: -TICK_SIZE,
                y1: tick.position,
                x2: 0.0,
                y2: tick.position,
                stroke: palette.axis,
                stroke_width: 1.0,
            });
            y_axis.push(SvgElement::Text {
                x: -TICK_SIZE - 3.0,
                y: tick.position + 4.0,
                text: tick.label.clone(),
                font_size: TICK_FONT_SIZE,
                fill: palette.axis,
                anchor: TextAnchor::End,
                rotate: None,
            });
        }

        vec![
            SvgElement::Group(grid),
            SvgElement::Group(x_axis),
            SvgElement::Group(y_axis),
            SvgElement::Text {
                x: w / 2.0,
                y: h + f64::from(margin.bottom) - 10.0,
                text: axes.x_label.clone(),
                font_size: LABEL_FONT_SIZE,
                fill: palette.axis,
                anchor: TextAnchor::Middle,
                rotate: None,
            },
            SvgElement::Text {
                x: -h / 2.0,
                y: -f64::from(margin.left) + 20.0,
                text: axes.y_label.clone(),
                font_size: LABEL_FONT_SIZE,
                fill: palette.axis,
                anchor: TextAnchor::Middle,
                rotate: Some(-90.0),
            },
        ]
    }

    fn legend_heading(&self, text: &str, row: f64) -> SvgElement {
        SvgElement::Text {
            x: 0.0,
            y: row * LEGEND_ROW_HEIGHT,
            text: text.to_string(),
            font_size: 12.0,
            fill: self.scene.palette.axis,
            anchor: TextAnchor::Start,
            rotate: None,
        }
    }

    fn legend_item(&self, symbol: Symbol, fill: Rgba, label: &str, row: f64) -> SvgElement {
        let mut item = Group::with_class("legend-item");
        item.translate = Some((10.0, row * LEGEND_ROW_HEIGHT));
        item.push(SvgElement::Path {
            d: symbol.path(LEGEND_SYMBOL_AREA),
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
        });
        item.push(SvgElement::Text {
            x: 14.0,
            y: 4.0,
            text: label.to_string(),
            font_size: 12.0,
            fill: self.scene.palette.axis,
            anchor: TextAnchor::Start,
            rotate: None,
        });
        SvgElement::Group(item)
    }

    /// Students by shape, then exams by color.
    fn legend(&self) -> Group {
        let palette = &self.scene.palette;
        let mut legend = Group::with_class("legend");
        legend.translate = Some((
            f64::from(self.scene.layout.width),
            f64::from(self.scene.layout.margin.top),
        ));

        legend.push(self.legend_heading("Students", 0.0));
        let mut row = 0.6;
        for student in &self.legend {
            legend.push(self.legend_item(student.symbol, palette.legend, &student.student_id, row));
            row += 1.0;
        }

        row += 0.5;
        legend.push(self.legend_heading("Exams", row));
        row += 0.6;
        for exam in ExamType::ALL {
            legend.push(self.legend_item(Symbol::Circle, palette.exam(exam), exam.label(), row));
            row += 1.0;
        }
        legend
    }

    /// Build the SVG document for the current state.
    #[must_use]
    pub fn encoder(&self) -> SvgEncoder {
        let layout = &self.scene.layout;
        let mut encoder = SvgEncoder::new(layout.width + layout.legend_width, layout.height)
            .background(Some(self.scene.palette.background));

        let mut plot = Group::with_class("plot");
        plot.translate = Some((f64::from(layout.margin.left), f64::from(layout.margin.top)));
        if let Some(axes) = &self.axes {
            for element in self.axes(axes) {
                plot.push(element);
            }
        }
        plot.push(SvgElement::Group(self.points()));
        if let Some(message) = &self.message {
            plot.push(SvgElement::Text {
                x: layout.inner_width() / 2.0,
                y: layout.inner_height() / 2.0,
                text: message.clone(),
                font_size: LABEL_FONT_SIZE,
                fill: self.scene.palette.axis,
                anchor: TextAnchor::Middle,
                rotate: None,
            });
        }

        encoder.add_element(SvgElement::Group(plot));
        encoder.add_element(SvgElement::Group(self.legend()));
        encoder
    }

    /// Render the current state to an SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        self.encoder().render()
    }

    /// Write the current state to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.encoder().write_to_file(path)
    }
}

impl PlotSurface for SvgSurface {
    fn set_legend(&mut self, entries: &[LegendEntry]) -> Result<()> {
        self.legend = entries.to_vec();
        Ok(())
    }

    fn set_axes(&mut self, axes: &AxisFrame) -> Result<()> {
        self.exiting.clear();
        self.previous_domain = self.axes.as_ref().map(|a| a.x_domain);
        self.axes = Some(axes.clone());
        Ok(())
    }

    fn enter_point(&mut self, point: &PlacedPoint) -> Result<()> {
        self.marks.insert(
            point.key.clone(),
            Mark {
                point: point.clone(),
                from: None,
            },
        );
        Ok(())
    }

    fn update_point(&mut self, point: &PlacedPoint) -> Result<()> {
        let from = self.marks.get(&point.key).map(|m| (m.point.x, m.point.y));
        self.marks.insert(
            point.key.clone(),
            Mark {
                point: point.clone(),
                from,
            },
        );
        Ok(())
    }

    fn exit_point(&mut self, key: &PointKey) -> Result<()> {
        if let Some(mark) = self.marks.remove(key) {
            self.exiting.push(mark.point);
        }
        Ok(())
    }

    fn show_message(&mut self, message: &str) -> Result<()> {
        self.message = Some(message.to_string());
        Ok(())
    }

    fn clear_message(&mut self) -> Result<()> {
        self.message = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, InlineSource, Record};
    use crate::format::LOAD_ERROR_MESSAGE;
    use crate::view::{Selection, ViewState};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new("S01", ExamType::Midterm1, 85.0).with("HR_avg", 72.0).with("EDA_avg", 0.3),
            Record::new("S05", ExamType::Final, 40.0).with("HR_avg", 90.0),
        ])
    }

    fn loaded() -> (ViewState, SvgSurface) {
        let scene = Scene::default();
        let mut view = ViewState::new(scene.clone(), Selection::default());
        let mut surface = SvgSurface::new(scene);
        view.finish_load(Ok(dataset()), &mut surface).unwrap();
        (view, surface)
    }

    #[test]
    fn test_initial_render() {
        let (_, surface) = loaded();
        let svg = surface.render();

        assert_eq!(surface.point_count(), 2);
        assert!(svg.contains(r#"id="S01-Midterm 1""#));
        assert!(svg.contains(r#"id="S05-Final""#));
        assert!(svg.contains("HR (Average BPM)"));
        assert!(svg.contains("Exam Score"));
        assert!(svg.contains("<title>Student: S01\nExam: Midterm 1\nScore: 85.0\nAverage HR: 72.00 BPM</title>"));
        assert!(svg.contains(r#"<animate attributeName="opacity" from="0" to="1" dur="750ms""#));
        // Midterm 1 blue, Final green.
        assert!(svg.contains("fill=\"rgb(31,119,180)\""));
        assert!(svg.contains("fill=\"rgb(44,160,44)\""));
    }

    #[test]
    fn test_legend_lists_students_and_exams() {
        let (_, surface) = loaded();
        let svg = surface.render();
        assert!(svg.contains(">S01</text>"));
        assert!(svg.contains(">S05</text>"));
        assert!(svg.contains(">Midterm 2</text>"));
        assert!(svg.contains(&Symbol::Star.path(LEGEND_SYMBOL_AREA)));
    }

    #[test]
    fn test_selection_change_moves_and_removes() {
        let (mut view, mut surface) = loaded();
        view.select_measure("EDA", &mut surface).unwrap();
        let svg = surface.render();

        assert_eq!(surface.point_count(), 1);
        assert!(!surface.has_point(&PointKey {
            student_id: "S05".into(),
            exam_type: ExamType::Final,
        }));
        // S05 fades out, S01 slides.
        assert!(svg.contains(r#"from="1" to="0""#));
        assert!(svg.contains(r#"<animateTransform attributeName="transform" type="translate""#));
        assert!(svg.contains("EDA (Average μS)"));
    }

    #[test]
    fn test_exits_are_dropped_on_next_redraw() {
        let (mut view, mut surface) = loaded();
        view.select_measure("EDA", &mut surface).unwrap();
        view.select_statistic("avg", &mut surface).unwrap();
        assert!(!surface.render().contains("S05-Final"));
    }

    #[test]
    fn test_no_animation_when_disabled() {
        let mut scene = Scene::default();
        scene.layout.transition_ms = 0;
        let mut view = ViewState::new(scene.clone(), Selection::default());
        let mut surface = SvgSurface::new(scene);
        view.finish_load(Ok(dataset()), &mut surface).unwrap();
        let svg = surface.render();
        assert!(!svg.contains("<animate"));
    }

    #[test]
    fn test_load_failure_renders_message_only() {
        let scene = Scene::default();
        let mut view = ViewState::new(scene.clone(), Selection::default());
        let mut surface = SvgSurface::new(scene);
        view.load(&InlineSource::new("[{"), &mut surface).unwrap();

        assert_eq!(surface.message(), Some(LOAD_ERROR_MESSAGE));
        let svg = surface.render();
        assert!(svg.contains(LOAD_ERROR_MESSAGE));
        assert!(!svg.contains("data-point"));
        assert!(!svg.contains("x-axis"));
    }

    #[test]
    fn test_document_size_includes_legend() {
        let surface = SvgSurface::new(Scene::default());
        assert!(surface.render().contains(r#"width="1050" height="500""#));
    }
}
