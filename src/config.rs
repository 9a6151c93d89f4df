//! Configuration for the scatter view.
//!
//! YAML file with precedence: CLI > file > defaults. Every field is
//! optional; a missing file falls back to [`Config::default`].

use crate::color::{Palette, Rgba};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration path under the user's config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("physio-viz/config.yaml"))
}

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin (room for the x-axis label).
    pub bottom: u32,
    /// Left margin (room for the y-axis label).
    pub left: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 40,
            right: 40,
            bottom: 60,
            left: 70,
        }
    }
}

/// Geometry and animation of the plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Total width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Total height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Margins around the plot area.
    #[serde(default)]
    pub margin: Margin,

    /// Width reserved right of the plot area for the student legend.
    #[serde(default = "default_legend_width")]
    pub legend_width: u32,

    /// Symbol area in square pixels.
    #[serde(default = "default_symbol_area")]
    pub symbol_area: f64,

    /// Duration of axis and point transitions.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Approximate number of ticks per axis.
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
}

fn default_width() -> u32 {
    960
}
fn default_height() -> u32 {
    500
}
fn default_legend_width() -> u32 {
    90
}
fn default_symbol_area() -> f64 {
    crate::symbol::DEFAULT_SYMBOL_AREA
}
fn default_transition_ms() -> u64 {
    750
}
fn default_tick_count() -> usize {
    10
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            legend_width: default_legend_width(),
            symbol_area: default_symbol_area(),
            transition_ms: default_transition_ms(),
            tick_count: default_tick_count(),
        }
    }
}

impl Layout {
    /// Width of the plot area inside the margins.
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        f64::from(self.width.saturating_sub(self.margin.left + self.margin.right))
    }

    /// Height of the plot area inside the margins.
    #[must_use]
    pub fn inner_height(&self) -> f64 {
        f64::from(self.height.saturating_sub(self.margin.top + self.margin.bottom))
    }

    /// Check that the plot area is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the margins swallow the plot.
    pub fn validate(&self) -> Result<()> {
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Palette as hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PaletteConfig {
    #[serde(default = "default_midterm1")]
    pub midterm1: String,
    #[serde(default = "default_midterm2")]
    pub midterm2: String,
    #[serde(default = "default_final")]
    pub final_exam: String,
}

fn default_midterm1() -> String {
    Palette::default().midterm1.to_string()
}
fn default_midterm2() -> String {
    Palette::default().midterm2.to_string()
}
fn default_final() -> String {
    Palette::default().final_exam.to_string()
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            midterm1: default_midterm1(),
            midterm2: default_midterm2(),
            final_exam: default_final(),
        }
    }
}

/// Initial selector values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialSelection {
    /// Measure selector value.
    #[serde(default = "default_measure")]
    pub measure: String,
    /// Statistic selector value.
    #[serde(default = "default_statistic")]
    pub statistic: String,
}

fn default_measure() -> String {
    "HR".to_string()
}
fn default_statistic() -> String {
    "avg".to_string()
}

impl Default for InitialSelection {
    fn default() -> Self {
        Self {
            measure: default_measure(),
            statistic: default_statistic(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Processed dataset path.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Where `render` writes the SVG.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Initial selection.
    #[serde(default)]
    pub selection: InitialSelection,

    /// Plot geometry.
    #[serde(default)]
    pub layout: Layout,

    /// Exam colors.
    #[serde(default)]
    pub palette: PaletteConfig,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("processed_data.json")
}
fn default_output_path() -> PathBuf {
    PathBuf::from("scatter.svg")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            output_path: default_output_path(),
            selection: InitialSelection::default(),
            layout: Layout::default(),
            palette: PaletteConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::ConfigNotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Resolve the configured palette.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for a malformed hex string.
    pub fn palette(&self) -> Result<Palette> {
        Ok(Palette {
            midterm1: Rgba::from_hex(&self.palette.midterm1)?,
            midterm2: Rgba::from_hex(&self.palette.midterm2)?,
            final_exam: Rgba::from_hex(&self.palette.final_exam)?,
            ..Palette::default()
        })
    }
}
