//! Deterministic 2D curl noise.
//!
//! A scalar field built from two phase-shifted trig sums, differentiated by
//! central finite differences; the perpendicular gradient gives a
//! divergence-free flow that drifts particles without clustering them.

use crate::constants::CURL_EPSILON;
use glam::Vec2;

#[inline]
fn scalar(x: f32, y: f32, t: f32) -> f32 {
    (x * 1.7 + t * 0.9).sin() * (y * 1.3 - t * 0.7).cos()
        + 0.7 * (x * 0.6 - y * 1.1 + t * 0.4).sin()
}

/// Curl of the scalar field at `(x, y)`, already in noise-domain units.
pub fn curl(x: f32, y: f32, t: f32) -> Vec2 {
    let e = CURL_EPSILON;
    let dy = (scalar(x, y + e, t) - scalar(x, y - e, t)) / (2.0 * e);
    let dx = (scalar(x + e, y, t) - scalar(x - e, y, t)) / (2.0 * e);
    Vec2::new(dy, -dx)
}
