//! Drawing seam between the simulation and its host.
//!
//! The engine composes frames in grid units; hosts scale to device pixels.
//! Render never mutates simulation state.

use crate::config::Rgb;

pub trait Surface {
    /// Fill the whole surface with a solid color.
    fn clear(&mut self, color: Rgb);
    /// Fill a square of `size` grid units whose top-left corner is at the
    /// (fractional) grid position `(x, y)`, blended at `alpha` in [0, 1].
    fn fill_cell(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32);
}
