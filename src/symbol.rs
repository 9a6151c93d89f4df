//! Point symbols.
//!
//! Each student gets a shape; exams are told apart by color. Shapes are
//! emitted as SVG path data centred on the origin with a given area in
//! square pixels, so every symbol has the same visual weight.

use std::f64::consts::PI;
use std::fmt::Write as FmtWrite;

/// Default symbol area in square pixels.
pub const DEFAULT_SYMBOL_AREA: f64 = 150.0;

/// Symbol shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    /// Circle.
    #[default]
    Circle,
    /// Plus-shaped cross.
    Cross,
    /// Rhombus, taller than wide.
    Diamond,
    /// Axis-aligned square.
    Square,
    /// Five-pointed star.
    Star,
    /// Upward triangle.
    Triangle,
    /// Three-armed "Y".
    Wye,
}

impl Symbol {
    /// Shape assigned to a student id. Ids beyond `S07` reuse shapes.
    #[must_use]
    pub fn for_student(student_id: &str) -> Self {
        match student_id {
            "S02" | "S09" => Self::Square,
            "S03" | "S10" => Self::Triangle,
            "S04" => Self::Diamond,
            "S05" => Self::Star,
            "S06" => Self::Cross,
            "S07" => Self::Wye,
            _ => Self::Circle,
        }
    }

    /// SVG path data for this shape with the given area.
    #[must_use]
    pub fn path(self, area: f64) -> String {
        let mut p = PathData::default();
        match self {
            Self::Circle => {
                let r = (area / PI).sqrt();
                p.move_to(r, 0.0);
                p.arc_to(r, -r, 0.0);
                p.arc_to(r, r, 0.0);
            }
            Self::Cross => {
                let r = (area / 5.0).sqrt() / 2.0;
                p.move_to(-3.0 * r, -r);
                for (x, y) in [
                    (-r, -r),
                    (-r, -3.0 * r),
                    (r, -3.0 * r),
                    (r, -r),
                    (3.0 * r, -r),
                    (3.0 * r, r),
                    (r, r),
                    (r, 3.0 * r),
                    (-r, 3.0 * r),
                    (-r, r),
                    (-3.0 * r, r),
                ] {
                    p.line_to(x, y);
                }
            }
            Self::Diamond => {
                let tan30 = (1.0f64 / 3.0).sqrt();
                let y = (area / (2.0 * tan30)).sqrt();
                let x = y * tan30;
                p.move_to(0.0, -y);
                p.line_to(x, 0.0);
                p.line_to(0.0, y);
                p.line_to(-x, 0.0);
            }
            Self::Square => {
                let w = area.sqrt();
                let x = -w / 2.0;
                p.move_to(x, x);
                p.line_to(x + w, x);
                p.line_to(x + w, x + w);
                p.line_to(x, x + w);
            }
            Self::Star => {
                const KA: f64 = 0.890_813_091_529_285_2;
                let kr = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
                let kx = (2.0 * PI / 10.0).sin() * kr;
                let ky = -(2.0 * PI / 10.0).cos() * kr;
                let r = (area * KA).sqrt();
                let (x, y) = (kx * r, ky * r);
                p.move_to(0.0, -r);
                p.line_to(x, y);
                for i in 1..5 {
                    let a = 2.0 * PI * f64::from(i) / 5.0;
                    let (s, c) = a.sin_cos();
                    p.line_to(s * r, -c * r);
                    p.line_to(c * x - s * y, s * x + c * y);
                }
            }
            Self::Triangle => {
                let sqrt3 = 3f64.sqrt();
                let y = -(area / (sqrt3 * 3.0)).sqrt();
                p.move_to(0.0, y * 2.0);
                p.line_to(-sqrt3 * y, -y);
                p.line_to(sqrt3 * y, -y);
            }
            Self::Wye => {
                let c = -0.5;
                let s = 3f64.sqrt() / 2.0;
                let k = 1.0 / 12f64.sqrt();
                let a = (k / 2.0 + 1.0) * 3.0;
                let r = (area / a).sqrt();
                let (x0, y0) = (r / 2.0, r * k);
                let (x1, y1) = (x0, r * k + r);
                let (x2, y2) = (-x1, y1);
                p.move_to(x0, y0);
                p.line_to(x1, y1);
                p.line_to(x2, y2);
                p.line_to(c * x0 - s * y0, s * x0 + c * y0);
                p.line_to(c * x1 - s * y1, s * x1 + c * y1);
                p.line_to(c * x2 - s * y2, s * x2 + c * y2);
                p.line_to(c * x0 + s * y0, c * y0 - s * x0);
                p.line_to(c * x1 + s * y1, c * y1 - s * x1);
                p.line_to(c * x2 + s * y2, c * y2 - s * x2);
            }
        }
        p.close()
    }
}

/// Minimal SVG path-data writer.
#[derive(Default)]
struct PathData {
    d: String,
}

impl PathData {
    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.d, "M{},{}", fmt_coord(x), fmt_coord(y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.d, "L{},{}", fmt_coord(x), fmt_coord(y));
    }

    /// Half-circle arc of radius `r` to (x, y).
    fn arc_to(&mut self, r: f64, x: f64, y: f64) {
        let r = fmt_coord(r);
        let _ = write!(self.d, "A{r},{r},0,1,1,{},{}", fmt_coord(x), fmt_coord(y));
    }

    fn close(mut self) -> String {
        self.d.push('Z');
        self.d
    }
}

/// Three decimals, trailing zeros trimmed, no negative zero.
pub(crate) fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Symbol; 7] = [
        Symbol::Circle,
        Symbol::Cross,
        Symbol::Diamond,
        Symbol::Square,
        Symbol::Star,
        Symbol::Triangle,
        Symbol::Wye,
    ];

    #[test]
    fn test_student_shapes() {
        assert_eq!(Symbol::for_student("S01"), Symbol::Circle);
        assert_eq!(Symbol::for_student("S05"), Symbol::Star);
        assert_eq!(Symbol::for_student("S07"), Symbol::Wye);
        assert_eq!(Symbol::for_student("S08"), Symbol::Circle);
        assert_eq!(Symbol::for_student("S10"), Symbol::Triangle);
        assert_eq!(Symbol::for_student("S42"), Symbol::Circle);
    }

    #[test]
    fn test_paths_are_closed() {
        for sym in ALL {
            let d = sym.path(DEFAULT_SYMBOL_AREA);
            assert!(d.starts_with('M'), "{sym:?}: {d}");
            assert!(d.ends_with('Z'), "{sym:?}: {d}");
        }
    }

    #[test]
    fn test_square_side_matches_area() {
        // Side of a 100px² square is 10.
        assert_eq!(Symbol::Square.path(100.0), "M-5,-5L5,-5L5,5L-5,5Z");
    }

    #[test]
    fn test_circle_radius_matches_area() {
        let d = Symbol::Circle.path(PI * 4.0);
        assert_eq!(d, "M2,0A2,2,0,1,1,-2,0A2,2,0,1,1,2,0Z");
    }

    #[test]
    fn test_star_has_ten_vertices() {
        let d = Symbol::Star.path(DEFAULT_SYMBOL_AREA);
        assert_eq!(d.matches('L').count(), 9);
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(1.5), "1.5");
        assert_eq!(fmt_coord(-0.0001), "0");
        assert_eq!(fmt_coord(10.0), "10");
        assert_eq!(fmt_coord(2.12345), "2.123");
    }
}
