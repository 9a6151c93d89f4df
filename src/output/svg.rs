//! SVG document encoder.
//!
//! Vector output keeps the plot scalable for print and web. Groups carry
//! `<title>` children, which browsers show as hover tooltips, and SMIL
//! animations for point and axis transitions.

use crate::color::Rgba;
use crate::error::Result;
use crate::symbol::fmt_coord;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        stroke_width: f64,
    },
    /// Path (SVG path data)
    Path {
        d: String,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f64,
    },
    /// Text, optionally rotated about the origin
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
        rotate: Option<f64>,
    },
    /// Group of child elements
    Group(Group),
}

/// A `<g>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// CSS class.
    pub class: Option<String>,
    /// Element id.
    pub id: Option<String>,
    /// Translation applied to the children.
    pub translate: Option<(f64, f64)>,
    /// Final opacity (1 when unset).
    pub opacity: Option<f64>,
    /// Hover text.
    pub title: Option<String>,
    /// Animations run when the document is displayed.
    pub animations: Vec<Animation>,
    /// Children.
    pub children: Vec<SvgElement>,
}

impl Group {
    /// Empty group with a class.
    #[must_use]
    pub fn with_class(class: &str) -> Self {
        Self {
            class: Some(class.to_string()),
            ..Self::default()
        }
    }

    /// Add a child.
    pub fn push(&mut self, element: SvgElement) {
        self.children.push(element);
    }
}

/// A SMIL animation, frozen at its end value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// Fade between two opacities.
    Opacity {
        /// Start opacity.
        from: f64,
        /// End opacity.
        to: f64,
        /// Duration in milliseconds.
        duration_ms: u64,
    },
    /// Move between two translations.
    Translate {
        /// Start offset.
        from: (f64, f64),
        /// End offset.
        to: (f64, f64),
        /// Duration in milliseconds.
        duration_ms: u64,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(960, 500)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(8192);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }

        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Escape XML special characters.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn stroke_attr(stroke: Option<Rgba>, width: f64) -> String {
    stroke
        .map(|s| format!(r#" stroke="{}" stroke-width="{}""#, s.to_css(), fmt_coord(width)))
        .unwrap_or_default()
}

fn write_animation(out: &mut String, animation: &Animation, depth: usize) {
    let pad = "  ".repeat(depth);
    match animation {
        Animation::Opacity { from, to, duration_ms } => {
            let _ = writeln!(
                out,
                r#"{pad}<animate attributeName="opacity" from="{}" to="{}" dur="{duration_ms}ms" fill="freeze"/>"#,
                fmt_coord(*from),
                fmt_coord(*to)
            );
        }
        Animation::Translate { from, to, duration_ms } => {
            let _ = writeln!(
                out,
                r#"{pad}<animateTransform attributeName="transform" type="translate" from="{} {}" to="{} {}" dur="{duration_ms}ms" fill="freeze"/>"#,
                fmt_coord(from.0),
                fmt_coord(from.1),
                fmt_coord(to.0),
                fmt_coord(to.1)
            );
        }
    }
}

/// Write an element and its children at the given indent depth.
fn write_element(out: &mut String, element: &SvgElement, depth: usize) {
    let pad = "  ".repeat(depth);
    match element {
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = writeln!(
                out,
                r#"{pad}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                fmt_coord(*x1),
                fmt_coord(*y1),
                fmt_coord(*x2),
                fmt_coord(*y2),
                stroke.to_css(),
                fmt_coord(*stroke_width)
            );
        }
        SvgElement::Path {
            d,
            fill,
            stroke,
            stroke_width,
        } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), Rgba::to_css);
            let _ = writeln!(
                out,
                r#"{pad}<path d="{d}" fill="{fill_attr}"{}/>"#,
                stroke_attr(*stroke, *stroke_width)
            );
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
            rotate,
        } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let transform = rotate
                .map(|deg| format!(r#" transform="rotate({})""#, fmt_coord(deg)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                r#"{pad}<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{anchor_str}"{transform}>{}</text>"#,
                fmt_coord(*x),
                fmt_coord(*y),
                fmt_coord(*font_size),
                fill.to_css(),
                escape_xml(text)
            );
        }
        SvgElement::Group(group) => {
            let mut attrs = String::new();
            if let Some(id) = &group.id {
                let _ = write!(attrs, r#" id="{}""#, escape_xml(id));
            }
            if let Some(class) = &group.class {
                let _ = write!(attrs, r#" class="{}""#, escape_xml(class));
            }
            if let Some((tx, ty)) = group.translate {
                let _ = write!(attrs, r#" transform="translate({},{})""#, fmt_coord(tx), fmt_coord(ty));
            }
            if let Some(opacity) = group.opacity {
                let _ = write!(attrs, r#" opacity="{}""#, fmt_coord(opacity));
            }
            let _ = writeln!(out, "{pad}<g{attrs}>");
            if let Some(title) = &group.title {
                let _ = writeln!(out, "{pad}  <title>{}</title>", escape_xml(title));
            }
            for animation in &group.animations {
                write_animation(out, animation, depth + 1);
            }
            for child in &group.children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{pad}</g>");
        }
    }
}
