//! Per-cell intensity field with age bookkeeping and highlight tracking.
//!
//! Deposits are max-blended so simultaneous contributions (ripple plus a
//! particle crossing the same cell) never double-count brightness. Decay is
//! exponential, with an independent age-based forced release that bounds how
//! long any ember can linger. Non-glyph glowing cells are tracked in a
//! compact list so neither decay nor render ever scans all N^2 cells.

use crate::constants::{AGE_RELEASE_MS, DECAY_FACTOR, FRAME_UNIT_MS, MIN_VISIBLE, REVEAL_TOLERANCE};
use crate::glyph::GlyphData;

/// Binary sweep-reveal weight: a cell pops in once the global progress plus
/// tolerance crosses its ratio. Intentionally not interpolated.
#[inline]
pub fn reveal_weight(progress: f32, ratio: f32) -> f32 {
    if progress + REVEAL_TOLERANCE >= ratio {
        1.0
    } else {
        0.0
    }
}

pub struct IntensityField {
    intensities: Vec<f32>,
    /// Milliseconds since the last deposit, per cell.
    ages: Vec<f32>,
    highlight_bits: Vec<u64>,
    highlight_cells: Vec<u32>,
}

impl IntensityField {
    pub fn new(grid_size: usize) -> Self {
        let total = grid_size * grid_size;
        Self {
            intensities: vec![0.0; total],
            ages: vec![0.0; total],
            highlight_bits: vec![0; (total + 63) / 64],
            highlight_cells: Vec::new(),
        }
    }

    #[inline]
    pub fn intensity(&self, cell: usize) -> f32 {
        self.intensities[cell]
    }

    /// Non-glyph cells currently glowing, for render iteration.
    #[inline]
    pub fn highlight_cells(&self) -> &[u32] {
        &self.highlight_cells
    }

    #[inline]
    fn highlight_test(&self, cell: usize) -> bool {
        self.highlight_bits[cell >> 6] & (1 << (cell & 63)) != 0
    }

    #[inline]
    fn highlight_set(&mut self, cell: usize) {
        self.highlight_bits[cell >> 6] |= 1 << (cell & 63);
    }

    #[inline]
    fn highlight_clear(&mut self, cell: usize) {
        self.highlight_bits[cell >> 6] &= !(1 << (cell & 63));
    }

    /// Max-blend `value` into the cell and reset its age. `track_highlight`
    /// is false for glyph cells (always iterated) and for explosion-owned
    /// snapshots.
    pub fn deposit(&mut self, cell: usize, value: f32, track_highlight: bool) {
        let v = value.min(1.0);
        if v <= MIN_VISIBLE {
            return;
        }
        if v > self.intensities[cell] {
            self.intensities[cell] = v;
        }
        self.ages[cell] = 0.0;
        if track_highlight && !self.highlight_test(cell) {
            self.highlight_set(cell);
            self.highlight_cells.push(cell as u32);
        }
    }

    /// Advance one frame of decay. Glyph cells not yet scattered are forced
    /// to full glow (reveal-gated) unless `suppress_glyph_glow`, which an
    /// active explosion sets. Returns whether any decaying cell still
    /// carries energy; the static forced glow does not count, so an idle
    /// scene lets the frame loop stop.
    pub fn decay(
        &mut self,
        delta: f32,
        suppress_glyph_glow: bool,
        glyph: &GlyphData,
        scattered: &[bool],
        reveal_progress: f32,
    ) -> bool {
        let decay_mul = DECAY_FACTOR.powf(delta);
        let mut any = false;
        for (k, &cell) in glyph.cell_indices.iter().enumerate() {
            let cell = cell as usize;
            if !suppress_glyph_glow
                && !scattered[k]
                && reveal_weight(reveal_progress, glyph.reveal_ratios[cell]) > 0.0
            {
                self.intensities[cell] = 1.0;
                self.ages[cell] = 0.0;
                continue;
            }
            any |= self.decay_cell(cell, delta, decay_mul);
        }
        let mut write = 0;
        for i in 0..self.highlight_cells.len() {
            let cell = self.highlight_cells[i];
            if self.decay_cell(cell as usize, delta, decay_mul) {
                self.highlight_cells[write] = cell;
                write += 1;
                any = true;
            } else {
                self.highlight_clear(cell as usize);
            }
        }
        self.highlight_cells.truncate(write);
        any
    }

    fn decay_cell(&mut self, cell: usize, delta: f32, decay_mul: f32) -> bool {
        let age = self.ages[cell] + delta * FRAME_UNIT_MS as f32;
        self.ages[cell] = age;
        let mut v = self.intensities[cell];
        if v <= 0.0 {
            return false;
        }
        if age > AGE_RELEASE_MS {
            v = 0.0;
        } else {
            v *= decay_mul;
        }
        if v <= MIN_VISIBLE {
            v = 0.0;
            self.ages[cell] = 0.0;
        }
        self.intensities[cell] = v;
        v > 0.0
    }

    /// Zero-fill everything; used by scatter-all and explosion resets.
    pub fn clear(&mut self) {
        self.intensities.fill(0.0);
        self.ages.fill(0.0);
        self.highlight_bits.fill(0);
        self.highlight_cells.clear();
    }
}
