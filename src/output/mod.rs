//! Output encoders.

mod svg;

pub use svg::{Animation, Group, SvgElement, SvgEncoder, TextAnchor};
