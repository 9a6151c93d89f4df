//! Color types and the exam palette.

use crate::dataset::ExamType;
use crate::error::{Error, Result};
use std::fmt;

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for any other input.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || Error::InvalidColor(hex.to_string());
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// CSS color string (`rgb(...)` when opaque, `rgba(...)` otherwise).
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Colors used by the scatter view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill for Midterm 1 points.
    pub midterm1: Rgba,
    /// Fill for Midterm 2 points.
    pub midterm2: Rgba,
    /// Fill for Final points.
    pub final_exam: Rgba,
    /// Fill for legend symbols.
    pub legend: Rgba,
    /// Grid line color.
    pub grid: Rgba,
    /// Axis and label color.
    pub axis: Rgba,
    /// Background.
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            midterm1: Rgba::rgb(0x1f, 0x77, 0xb4),
            midterm2: Rgba::rgb(0xff, 0x7f, 0x0e),
            final_exam: Rgba::rgb(0x2c, 0xa0, 0x2c),
            legend: Rgba::rgb(0x55, 0x55, 0x55),
            grid: Rgba::rgb(0xe0, 0xe0, 0xe0),
            axis: Rgba::rgb(0x33, 0x33, 0x33),
            background: Rgba::WHITE,
        }
    }
}

impl Palette {
    /// Point fill for an exam.
    #[must_use]
    pub const fn exam(&self, exam: ExamType) -> Rgba {
        match exam {
            ExamType::Midterm1 => self.midterm1,
            ExamType::Midterm2 => self.midterm2,
            ExamType::Final => self.final_exam,
        }
    }
}
