//! WebAssembly bindings for physio-viz.
//!
//! The host page fetches the processed dataset and hands the text over; the
//! bindings keep the view state and return the SVG to insert after each
//! selector change.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ScatterApp, PlotOptions } from 'physio-viz';
//!
//! await init();
//!
//! const app = new ScatterApp(new PlotOptions().width(960).transition_ms(750));
//! const text = await fetch('processed_data.json').then(r => r.text());
//! app.load_json(text);
//! chart.innerHTML = app.svg();
//!
//! measureSelect.onchange = e => {
//!     app.select_measure(e.target.value);
//!     chart.innerHTML = app.svg();
//! };
//! ```

use wasm_bindgen::prelude::*;

use crate::config::Layout;
use crate::dataset::{Dataset, ExamType};
use crate::error::Result;
use crate::measure::{Measure, Statistic};
use crate::render::SvgSurface;
use crate::resolver::Resolver;
use crate::view::{LoadState, Scene, Selection, ViewState};

fn to_js(e: &crate::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ============================================================================
// Plot Options
// ============================================================================

/// Options for the scatter view.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct PlotOptions {
    layout: Layout,
    measure: String,
    statistic: String,
}

#[wasm_bindgen]
impl PlotOptions {
    /// Create default plot options.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let selection = Selection::default();
        Self {
            layout: Layout::default(),
            measure: selection.measure,
            statistic: selection.statistic,
        }
    }

    /// Set plot width in pixels (legend excluded).
    #[wasm_bindgen]
    pub fn width(mut self, width: u32) -> Self {
        self.layout.width = width;
        self
    }

    /// Set plot height in pixels.
    #[wasm_bindgen]
    pub fn height(mut self, height: u32) -> Self {
        self.layout.height = height;
        self
    }

    /// Set the transition duration; 0 disables animation.
    #[wasm_bindgen]
    pub fn transition_ms(mut self, ms: u32) -> Self {
        self.layout.transition_ms = u64::from(ms);
        self
    }

    /// Set the initial measure.
    #[wasm_bindgen]
    pub fn measure(mut self, measure: &str) -> Self {
        self.measure = measure.to_string();
        self
    }

    /// Set the initial statistic.
    #[wasm_bindgen]
    pub fn statistic(mut self, statistic: &str) -> Self {
        self.statistic = statistic.to_string();
        self
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Scatter App
// ============================================================================

/// Interactive scatter view bound to an SVG surface.
#[wasm_bindgen]
#[derive(Debug)]
pub struct ScatterApp {
    view: ViewState,
    surface: SvgSurface,
}

impl ScatterApp {
    fn build(options: &PlotOptions) -> Result<Self> {
        options.layout.validate()?;
        let scene = Scene {
            layout: options.layout.clone(),
            ..Scene::default()
        };
        let view = ViewState::new(scene.clone(), Selection::new(&options.measure, &options.statistic));
        let mut surface = SvgSurface::new(scene);
        view.begin_load(&mut surface)?;
        Ok(Self { view, surface })
    }
}

#[wasm_bindgen]
impl ScatterApp {
    /// Create a view showing the loading message.
    ///
    /// # Errors
    ///
    /// Returns an error if the options describe an empty plot area.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<PlotOptions>) -> std::result::Result<ScatterApp, JsValue> {
        Self::build(&options.unwrap_or_default()).map_err(|e| to_js(&e))
    }

    /// Install the fetched dataset text. Returns whether it loaded.
    ///
    /// A parse failure shows the load-error message and is also reported on
    /// the browser console.
    pub fn load_json(&mut self, text: &str) -> std::result::Result<bool, JsValue> {
        let result = Dataset::from_json_str(text);
        if let Err(e) = &result {
            web_sys::console::error_1(&JsValue::from_str(&format!("Error loading data: {e}")));
        }
        self.view.finish_load(result, &mut self.surface).map_err(|e| to_js(&e))?;
        Ok(matches!(self.view.load_state(), LoadState::Ready(_)))
    }

    /// Report that the host could not fetch the dataset.
    pub fn load_failed(&mut self, reason: &str) -> std::result::Result<(), JsValue> {
        web_sys::console::error_1(&JsValue::from_str(reason));
        self.view
            .finish_load(Err(crate::Error::DatasetLoad(reason.to_string())), &mut self.surface)
            .map_err(|e| to_js(&e))
    }

    /// Change the measure selector and redraw.
    pub fn select_measure(&mut self, measure: &str) -> std::result::Result<(), JsValue> {
        self.view.select_measure(measure, &mut self.surface).map_err(|e| to_js(&e))
    }

    /// Change the statistic selector and redraw.
    pub fn select_statistic(&mut self, statistic: &str) -> std::result::Result<(), JsValue> {
        self.view
            .select_statistic(statistic, &mut self.surface)
            .map_err(|e| to_js(&e))
    }

    /// Resolve one value; `NaN` when invalid or before loading.
    pub fn resolve(&self, student_id: &str, exam_type: &str, measure: &str, statistic: &str) -> f64 {
        let (LoadState::Ready(dataset), Some(exam)) = (self.view.load_state(), ExamType::parse(exam_type))
        else {
            return f64::NAN;
        };
        Resolver::new(dataset).resolve(student_id, exam, measure, statistic)
    }

    /// The current SVG document.
    #[must_use]
    pub fn svg(&self) -> String {
        self.surface.render()
    }

    /// Number of points currently drawn.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.surface.point_count()
    }
}

// ============================================================================
// Selector Options
// ============================================================================

/// Measure selector values, e.g. `["HR", "EDA", "TEMP", "BVP"]`.
#[wasm_bindgen]
pub fn measures() -> js_sys::Array {
    Measure::ALL.iter().map(|m| JsValue::from_str(m.key())).collect()
}

/// Statistic selector values, e.g. `["avg", "median", ...]`.
#[wasm_bindgen]
pub fn statistics() -> js_sys::Array {
    Statistic::ALL.iter().map(|s| JsValue::from_str(s.key())).collect()
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_options_default() {
        let opts = PlotOptions::new();
        assert_eq!(opts.layout.width, 960);
        assert_eq!(opts.measure, "HR");
        assert_eq!(opts.statistic, "avg");
    }

    #[test]
    fn test_plot_options_builder() {
        let opts = PlotOptions::new()
            .width(640)
            .height(320)
            .transition_ms(0)
            .measure("EDA")
            .statistic("max");
        assert_eq!(opts.layout.width, 640);
        assert_eq!(opts.layout.height, 320);
        assert_eq!(opts.layout.transition_ms, 0);
        assert_eq!(opts.measure, "EDA");
        assert_eq!(opts.statistic, "max");
    }

    #[test]
    fn test_app_build_shows_loading() {
        let app = ScatterApp::build(&PlotOptions::new()).unwrap();
        assert!(app.svg().contains(crate::format::LOADING_MESSAGE));
        assert_eq!(app.point_count(), 0);
    }

    #[test]
    fn test_app_load_and_select() {
        let mut app = ScatterApp::build(&PlotOptions::new().transition_ms(0)).unwrap();
        assert!(app.resolve("S01", "Midterm 1", "HR", "avg").is_nan(), "nothing loaded yet");

        let text = r#"[
            {"student_id": "S01", "exam_type": "Midterm 1", "grade": 85, "HR_avg": 72},
            {"student_id": "S02", "exam_type": "Final", "grade": 60,
             "HR_avg": "NaN", "HR_1": 60, "HR_2": 80}
        ]"#;
        assert!(app.load_json(text).unwrap());
        assert_eq!(app.point_count(), 1);
        assert!(app.svg().contains(r#"id="S01-Midterm 1""#));

        app.select_statistic("max").unwrap();
        assert_eq!(app.point_count(), 1);
        assert!(app.svg().contains(r#"id="S02-Final""#));
        assert!((app.resolve("S02", "Final", "HR", "max") - 80.0).abs() < 1e-9);
        assert!(app.resolve("S02", "Quiz", "HR", "max").is_nan());

        app.select_measure("EDA").unwrap();
        assert_eq!(app.point_count(), 0);
    }
}
