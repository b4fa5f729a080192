use anyhow::anyhow;
use grid_core::config::Rgb;
use grid_core::render::Surface;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Draws grid cells as filled rects on a 2d canvas context. Grid units are
/// mapped to device pixels once per frame, in `clear`, so a resized canvas
/// picks up its new scale on the next draw.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    grid_size: usize,
    cell_px: f64,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement, grid_size: usize) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow!(format!("{e:?}")))?
            .ok_or_else(|| anyhow!("no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow!(format!("{e:?}")))?;
        Ok(Self {
            canvas,
            ctx,
            grid_size,
            cell_px: 1.0,
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Rgb) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.cell_px = w.min(h) / self.grid_size as f64;
        self.ctx
            .set_fill_style_str(&format!("rgb({},{},{})", color[0], color[1], color[2]));
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn fill_cell(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        self.ctx.set_fill_style_str(&format!(
            "rgba({},{},{},{:.3})",
            color[0], color[1], color[2], alpha
        ));
        let s = self.cell_px;
        self.ctx
            .fill_rect(x as f64 * s, y as f64 * s, size as f64 * s, size as f64 * s);
    }
}
