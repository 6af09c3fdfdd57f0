//! Adapter helpers turning this crate's plain style values into plotters styles.
//!
//! The core only hands out [`Rgba`] and [`Stroke`] values; the renderer maps
//! them here so plotters types never leak into the geometry modules.
//!
//! ```ignore
//!     let outline = stroke_style(&highlight.stroke);
//!     chart.draw_series(std::iter::once(Rectangle::new([(x0, y0), (x1, y1)], outline)))?;
//! ```

use plotters::prelude::*;

use crate::models::{Rgba, Stroke};

pub fn rgb_color(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, f64::from(c.a) / 255.0)
}

/// Unfilled outline style (highlight box, month lines).
pub fn stroke_style(stroke: &Stroke) -> ShapeStyle {
    rgb_color(stroke.color).stroke_width(stroke.width)
}

/// Filled style for heat cells and backgrounds.
pub fn fill_style(c: Rgba) -> ShapeStyle {
    rgb_color(c).filled()
}
