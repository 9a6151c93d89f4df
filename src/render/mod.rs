//! Drawing surfaces.
//!
//! The view never draws directly. It hands prepared points and axes to a
//! [`PlotSurface`], matching points across redraws by their
//! `(student, exam)` key:
//!
//! - **enter**: a point with a valid value that was not drawn before
//! - **update**: a point drawn before and still valid (moves, recolors)
//! - **exit**: a point drawn before whose value is now invalid

mod svg_surface;

pub use svg_surface::SvgSurface;

use crate::error::Result;
use crate::view::{AxisFrame, LegendEntry, PlacedPoint, PointKey};

/// Capability to draw, move and remove plot marks.
///
/// Within one redraw the view calls `set_axes` first, then every
/// `exit_point`, then `enter_point`/`update_point` for each valid point.
pub trait PlotSurface {
    /// Replace the student legend.
    fn set_legend(&mut self, entries: &[LegendEntry]) -> Result<()>;

    /// Start a redraw with new axes.
    fn set_axes(&mut self, axes: &AxisFrame) -> Result<()>;

    /// Draw a point not shown before.
    fn enter_point(&mut self, point: &PlacedPoint) -> Result<()>;

    /// Move an already drawn point.
    fn update_point(&mut self, point: &PlacedPoint) -> Result<()>;

    /// Remove a drawn point.
    fn exit_point(&mut self, key: &PointKey) -> Result<()>;

    /// Show a status message (loading, load failure) over the plot.
    fn show_message(&mut self, message: &str) -> Result<()>;

    /// Hide the status message.
    fn clear_message(&mut self) -> Result<()>;
}
