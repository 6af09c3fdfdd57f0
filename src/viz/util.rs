//! Utility functions for rendering: heat colour scale, font registration.

use crate::models::Rgba;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// ColorBrewer "Reds" (9 classes), light to dark.
const REDS9: [Rgba; 9] = [
    Rgba::rgb(255, 245, 240), // #FFF5F0
    Rgba::rgb(254, 224, 210), // #FEE0D2
    Rgba::rgb(252, 187, 161), // #FCBBA1
    Rgba::rgb(252, 146, 114), // #FC9272
    Rgba::rgb(251, 106, 74),  // #FB6A4A
    Rgba::rgb(239, 59, 44),   // #EF3B2C
    Rgba::rgb(203, 24, 29),   // #CB181D
    Rgba::rgb(165, 15, 21),   // #A50F15
    Rgba::rgb(103, 0, 13),    // #67000D
];

/// Colour for `t` in `[0, 1]` (clamped), interpolated linearly between stops.
pub fn reds(t: f64) -> Rgba {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (REDS9.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(REDS9.len() - 1);
    let f = scaled - lo as f64;
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;
    let (a, b) = (REDS9[lo], REDS9[hi]);
    Rgba::rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Heat colour of `value` relative to the panel maximum.
pub fn heat_color(value: f64, max: f64) -> Rgba {
    if max <= 0.0 {
        reds(0.0)
    } else {
        reds(value / max)
    }
}

/// Places a sans-serif TrueType font is commonly installed.
const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a "sans-serif" font for the `ab_glyph` text path, once per process.
///
/// `ab_glyph` does not discover OS fonts, so text can only be drawn after this
/// returns `true`. The first call decides; later paths are ignored.
pub fn ensure_font_registered(preferred: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let mut candidates: Vec<PathBuf> = preferred.map(Path::to_path_buf).into_iter().collect();
        candidates.extend(FONT_CANDIDATES.iter().map(PathBuf::from));
        for path in candidates {
            let Ok(bytes) = fs::read(&path) else {
                continue;
            };
            // plotters keeps a 'static reference to registered font data.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font(
                "sans-serif",
                plotters::style::FontStyle::Normal,
                bytes,
            ) {
                Ok(()) => {
                    debug!("registered font {}", path.display());
                    return true;
                }
                Err(_) => warn!("{} is not a usable font", path.display()),
            }
        }
        warn!("no font available; titles and tick labels are left out");
        false
    })
}
