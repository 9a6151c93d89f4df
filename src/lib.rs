//! # Physio-Viz
//!
//! Scatter plots correlating wearable physiological signals with exam
//! performance.
//!
//! Each point is one student's exam: the y axis is the exam score, the x axis
//! a summary statistic of one signal recorded during that exam (heart rate,
//! skin conductance, skin temperature or blood-volume pulse). Points are
//! coloured by exam and shaped by student.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use physio_viz::prelude::*;
//!
//! let scene = Scene::default();
//! let mut view = ViewState::new(scene.clone(), Selection::new("HR", "avg"));
//! let mut surface = SvgSurface::new(scene);
//!
//! view.load(&FileSource::new("processed_data.json"), &mut surface)?;
//! view.select_statistic("max", &mut surface)?;
//! surface.write_to_file("scatter.svg")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `wasm`: WebAssembly bindings for browser usage

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Measure and statistic vocabularies, column keys, units and labels.
pub mod measure;

/// Dataset loading and sanitization.
pub mod dataset;

/// Order statistics over raw measurement values.
pub mod stats;

/// Per-point statistic resolution.
pub mod resolver;

/// Dataset preparation from raw wearable recordings.
pub mod prepare;

// ============================================================================
// Visual Mapping Modules
// ============================================================================

/// Color types and the exam palette.
pub mod color;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Per-student point symbols.
pub mod symbol;

/// Value formatting, axis labels and tooltips.
pub mod format;

/// View state and frame preparation.
pub mod view;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Plot surfaces.
pub mod render;

/// Output encoders (SVG).
pub mod output;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Configuration and Error Types
// ============================================================================

/// YAML configuration.
pub mod config;

/// Error types for physio-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use physio_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Palette, Rgba};
    pub use crate::config::{Config, Layout};
    pub use crate::dataset::{Dataset, DatasetSource, ExamType, FileSource, InlineSource, Record};
    pub use crate::error::{Error, Result};
    pub use crate::measure::{Measure, Statistic};
    pub use crate::render::{PlotSurface, SvgSurface};
    pub use crate::resolver::Resolver;
    pub use crate::scale::{LinearScale, Scale};
    pub use crate::stats::is_valid;
    pub use crate::view::{Frame, LoadState, Scene, Selection, ViewState};
}

// ============================================================================
// Tests
// ============================================================================
