//! Immutable session configuration.
//!
//! One `GridConfig` is built at mount time and passed to
//! [`crate::session::GridSession::new`]; nothing mutates it afterwards.
//! Frame-to-frame tuning values that are not meant to vary per mount live in
//! `constants.rs` instead.

use smallvec::{smallvec, SmallVec};

/// Packed 8-bit RGB triplet, the only color representation the engine uses.
pub type Rgb = [u8; 3];

/// Axis of the left-to-right reveal sweep. `Portrait` sweeps top-to-bottom
/// instead, for hosts whose surface is taller than it is wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// One stop of the glyph color gradient. `at` is a position in [0, 1] across
/// the glyph's bounding box.
#[derive(Clone, Copy, Debug)]
pub struct GradientStop {
    pub at: f32,
    pub color: Rgb,
}

#[derive(Clone, Debug)]
pub struct GridConfig {
    /// Side length of the square cell grid.
    pub grid_size: usize,
    /// Text rendered into the grid.
    pub text: String,
    pub orientation: Orientation,
    /// Source pixels per cell side when rasterizing (supersampling factor).
    pub supersample: u32,
    /// A source pixel counts as ink when `max(R,G,B)/255` reaches this.
    pub pixel_alpha_threshold: f32,
    /// Cells below this coverage are discarded outright.
    pub coverage_threshold: f32,
    /// Lower bound on kept glyph cells, as a fraction of the whole grid.
    pub min_cells_ratio: f32,
    /// Upper bound on kept glyph cells, as a fraction of the whole grid.
    pub max_cells_ratio: f32,
    /// Ordered gradient stops keyed by horizontal position within the glyph.
    pub gradient: SmallVec<[GradientStop; 4]>,
    /// Background / idle cell color.
    pub background: Rgb,
    /// Strength of the curl-noise drift applied to scatter particles, 0..1.
    pub curl_amount: f32,
    /// Interval of the host-driven auto-scatter trigger.
    pub auto_scatter_interval_ms: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 96,
            text: "VISUALCORE".to_owned(),
            orientation: Orientation::Landscape,
            supersample: 18,
            pixel_alpha_threshold: 0.5,
            coverage_threshold: 0.35,
            min_cells_ratio: 0.02,
            max_cells_ratio: 0.20,
            gradient: smallvec![
                GradientStop { at: 0.0, color: [0x35, 0xe0, 0xff] },
                GradientStop { at: 0.45, color: [0x7a, 0x5c, 0xff] },
                GradientStop { at: 1.0, color: [0xff, 0x4f, 0x9a] },
            ],
            background: [8, 10, 16],
            curl_amount: 0.6,
            auto_scatter_interval_ms: 6_000.0,
        }
    }
}

/// Linear interpolation across the ordered gradient stops, clamped at both
/// ends.
pub fn gradient_color(stops: &[GradientStop], t: f32) -> Rgb {
    debug_assert!(!stops.is_empty());
    let t = t.clamp(0.0, 1.0);
    if t <= stops[0].at {
        return stops[0].color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.at {
            let span = (b.at - a.at).max(1e-6);
            let f = (t - a.at) / span;
            let mut out = [0u8; 3];
            for (i, slot) in out.iter_mut().enumerate() {
                let v = a.color[i] as f32 + (b.color[i] as f32 - a.color[i] as f32) * f;
                *slot = v.round().clamp(0.0, 255.0) as u8;
            }
            return out;
        }
    }
    stops[stops.len() - 1].color
}
