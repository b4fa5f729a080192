//! Glyph sampling: text -> supersampled bitmap -> N x N coverage grid.
//!
//! `GlyphData` is built once per mount and never mutated afterwards. The
//! rasterization backend is a trait so hosts can plug in a real text renderer
//! (canvas 2d on the web) while tests and terminal hosts use the
//! deterministic built-in block font.

use crate::config::{gradient_color, GridConfig, Orientation};
use crate::constants::{GLYPH_H_MARGIN_CELLS, GLYPH_V_MARGIN_RATIO};
use crate::font;
use thiserror::Error;

/// RGBA rasterizer output, row-major, 4 bytes per pixel.
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Bitmap {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Brightness of a pixel as `max(R,G,B)/255`.
    #[inline]
    pub fn luma(&self, x: u32, y: u32) -> f32 {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let m = self.rgba[i].max(self.rgba[i + 1]).max(self.rgba[i + 2]);
        m as f32 / 255.0
    }
}

/// Rasterization backend seam. Returns `None` when the environment lacks the
/// required text/pixel APIs; the sampler then falls back to a synthetic
/// pattern rather than failing.
pub trait GlyphRaster {
    fn rasterize(&self, text: &str, width: u32, height: u32) -> Option<Bitmap>;
}

#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("rasterization backend unavailable or returned wrong dimensions")]
    Backend,
    #[error("no cell reached the coverage threshold")]
    Empty,
}

/// Deterministic rasterizer over the built-in 5x7 block font. Scales the
/// font to fit the target bitmap and centers it.
pub struct BlockFontRaster;

impl GlyphRaster for BlockFontRaster {
    fn rasterize(&self, text: &str, width: u32, height: u32) -> Option<Bitmap> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let cols = chars.len() as u32 * font::GLYPH_ADVANCE - 1;
        let scale = (width / cols).min(height / font::GLYPH_ROWS);
        if scale == 0 {
            return None;
        }
        let x0 = (width - cols * scale) / 2;
        let y0 = (height - font::GLYPH_ROWS * scale) / 2;
        let mut bm = Bitmap::blank(width, height);
        for (ci, &ch) in chars.iter().enumerate() {
            let rows = font::glyph_rows(ch);
            let cx0 = x0 + ci as u32 * font::GLYPH_ADVANCE * scale;
            for (ry, row) in rows.iter().enumerate() {
                for rx in 0..font::GLYPH_COLS {
                    if row & (1 << (font::GLYPH_COLS - 1 - rx)) == 0 {
                        continue;
                    }
                    fill_block(&mut bm, cx0 + rx * scale, y0 + ry as u32 * scale, scale);
                }
            }
        }
        Some(bm)
    }
}

fn fill_block(bm: &mut Bitmap, x0: u32, y0: u32, size: u32) {
    let w = bm.width as usize;
    for y in y0..(y0 + size).min(bm.height) {
        let row = (y as usize) * w;
        for x in x0..(x0 + size).min(bm.width) {
            let i = (row + x as usize) * 4;
            bm.rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
        }
    }
}

/// Static glyph description, immutable after construction.
pub struct GlyphData {
    pub grid_size: usize,
    /// Normalized coverage per cell, 0 for background cells.
    pub mask: Vec<f32>,
    /// RGB triplet per cell (gradient-sampled, or background color).
    pub colors: Vec<u8>,
    /// Sweep position ratio per cell, drives the left-to-right reveal.
    pub reveal_ratios: Vec<f32>,
    /// Cells belonging to the glyph, ascending row-major order.
    pub cell_indices: Vec<u32>,
    /// Inverse of `cell_indices`: position within it, or -1.
    pub cell_index_lookup: Vec<i32>,
}

impl GlyphData {
    /// Sample `cfg.text` into the grid. Falls back to a synthetic stripe
    /// pattern when the backend is unavailable or nothing qualifies; a glyph
    /// with zero cells is a sampler defect and halts loudly.
    pub fn sample(raster: &dyn GlyphRaster, cfg: &GridConfig) -> GlyphData {
        let data = match Self::try_sample(raster, cfg) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("[glyph] sampling failed ({e}), using fallback pattern");
                Self::fallback(cfg)
            }
        };
        assert!(
            !data.cell_indices.is_empty(),
            "glyph sampling produced an empty mask"
        );
        for &cell in &data.cell_indices {
            let v = data.mask[cell as usize];
            assert!((0.0..=1.0).contains(&v), "mask out of range: {v}");
            assert!(data.cell_index_lookup[cell as usize] >= 0);
        }
        log::info!(
            "[glyph] sampled {:?}: {} of {} cells",
            cfg.text,
            data.cell_indices.len(),
            data.grid_size * data.grid_size
        );
        data
    }

    fn try_sample(raster: &dyn GlyphRaster, cfg: &GridConfig) -> Result<GlyphData, GlyphError> {
        let n = cfg.grid_size;
        let scale = cfg.supersample;
        let px = n as u32 * scale;
        let bm = raster
            .rasterize(&cfg.text, px, px)
            .filter(|b| b.width == px && b.height == px)
            .ok_or(GlyphError::Backend)?;

        // Per-cell coverage: fraction of the scale x scale block that is ink.
        let samples = (scale * scale) as f32;
        let mut candidates: Vec<(u32, f32)> = Vec::new();
        for cy in 0..n {
            for cx in 0..n {
                let mut covered = 0u32;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let x = cx as u32 * scale + sx;
                        let y = cy as u32 * scale + sy;
                        if bm.luma(x, y) >= cfg.pixel_alpha_threshold {
                            covered += 1;
                        }
                    }
                }
                let coverage = covered as f32 / samples;
                if coverage >= cfg.coverage_threshold {
                    candidates.push(((cy * n + cx) as u32, coverage));
                }
            }
        }
        if candidates.is_empty() {
            return Err(GlyphError::Empty);
        }

        // Rank by coverage descending, index as a deterministic tie-break,
        // then clamp the keep count into the configured band.
        candidates.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let total = n * n;
        let min_cells = (cfg.min_cells_ratio * total as f32) as usize;
        let max_cells = ((cfg.max_cells_ratio * total as f32) as usize).max(1);
        let keep = candidates.len().min(max_cells);
        candidates.truncate(keep);
        if keep < min_cells {
            log::warn!(
                "[glyph] kept {keep} cells, below the configured minimum of {min_cells}"
            );
        }

        Ok(Self::assemble(cfg, &candidates))
    }

    /// Recenter kept cells, normalize coverage and assign gradient colors.
    fn assemble(cfg: &GridConfig, kept: &[(u32, f32)]) -> GlyphData {
        let n = cfg.grid_size;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (n, n, 0usize, 0usize);
        let mut max_cov = 0.0f32;
        for &(cell, cov) in kept {
            let (x, y) = (cell as usize % n, cell as usize / n);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            max_cov = max_cov.max(cov);
        }
        let w = max_x - min_x + 1;
        let h = max_y - min_y + 1;

        // Horizontal offset: center a narrow glyph, otherwise keep a small
        // fixed margin. Vertical offset keeps the glyph in a middle band.
        let dx = if w + 2 * GLYPH_H_MARGIN_CELLS <= n {
            (n - w) / 2
        } else {
            GLYPH_H_MARGIN_CELLS.min(n.saturating_sub(w))
        };
        let v_margin = (n as f32 * GLYPH_V_MARGIN_RATIO) as usize;
        let dy = ((n.saturating_sub(h)) / 2).max(v_margin.min(n.saturating_sub(h)));

        let mut data = Self::background_only(cfg);
        let mut moved: Vec<(u32, f32, f32)> = Vec::with_capacity(kept.len());
        for &(cell, cov) in kept {
            let (x, y) = (cell as usize % n, cell as usize / n);
            let nx = x - min_x + dx;
            let ny = y - min_y + dy;
            if nx >= n || ny >= n {
                continue;
            }
            // Position ratio within the glyph bounding box; keys both the
            // gradient and the reveal sweep.
            let x_ratio = if w > 1 { (x - min_x) as f32 / (w - 1) as f32 } else { 0.5 };
            let ratio = match cfg.orientation {
                Orientation::Landscape => x_ratio,
                Orientation::Portrait => {
                    if h > 1 {
                        (y - min_y) as f32 / (h - 1) as f32
                    } else {
                        0.5
                    }
                }
            };
            moved.push(((ny * n + nx) as u32, cov, x_ratio));
            data.reveal_ratios[ny * n + nx] = ratio;
        }
        moved.sort_unstable_by_key(|&(cell, _, _)| cell);
        for (k, &(cell, cov, x_ratio)) in moved.iter().enumerate() {
            let c = cell as usize;
            data.mask[c] = (cov / max_cov).clamp(0.0, 1.0);
            let rgb = gradient_color(&cfg.gradient, x_ratio);
            data.colors[c * 3..c * 3 + 3].copy_from_slice(&rgb);
            data.cell_indices.push(cell);
            data.cell_index_lookup[c] = k as i32;
        }
        data
    }

    /// Synthetic stripe band across the middle third of the grid, used when
    /// no real rasterization is possible. Guaranteed non-empty.
    fn fallback(cfg: &GridConfig) -> GlyphData {
        let n = cfg.grid_size;
        let mut data = Self::background_only(cfg);
        let (y0, y1) = (n / 3, 2 * n / 3);
        let mut k = 0i32;
        for y in y0..y1 {
            for x in 0..n {
                let cell = y * n + x;
                let t = if n > 1 { x as f32 / (n - 1) as f32 } else { 0.5 };
                data.mask[cell] = 1.0;
                let rgb = gradient_color(&cfg.gradient, t);
                data.colors[cell * 3..cell * 3 + 3].copy_from_slice(&rgb);
                data.reveal_ratios[cell] = t;
                data.cell_indices.push(cell as u32);
                data.cell_index_lookup[cell] = k;
                k += 1;
            }
        }
        data
    }

    /// All-background grid: mask 0 everywhere, reveal ratios derived from
    /// absolute grid position so idle cells keep a coherent shading fallback.
    fn background_only(cfg: &GridConfig) -> GlyphData {
        let n = cfg.grid_size;
        let total = n * n;
        let mut colors = vec![0u8; total * 3];
        let mut reveal_ratios = vec![0.0f32; total];
        for cell in 0..total {
            colors[cell * 3..cell * 3 + 3].copy_from_slice(&cfg.background);
            let (x, y) = (cell % n, cell / n);
            let axis = match cfg.orientation {
                Orientation::Landscape => x,
                Orientation::Portrait => y,
            };
            reveal_ratios[cell] = if n > 1 { axis as f32 / (n - 1) as f32 } else { 0.5 };
        }
        GlyphData {
            grid_size: n,
            mask: vec![0.0; total],
            colors,
            reveal_ratios,
            cell_indices: Vec::new(),
            cell_index_lookup: vec![-1; total],
        }
    }

    #[inline]
    pub fn is_glyph(&self, cell: usize) -> bool {
        self.cell_index_lookup[cell] >= 0
    }

    /// RGB triplet of a cell.
    #[inline]
    pub fn color(&self, cell: usize) -> [u8; 3] {
        [
            self.colors[cell * 3],
            self.colors[cell * 3 + 1],
            self.colors[cell * 3 + 2],
        ]
    }
}
