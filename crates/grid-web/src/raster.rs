use grid_core::config::GridConfig;
use grid_core::glyph::{Bitmap, GlyphRaster};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Rasterizes the configured text on an offscreen 2d canvas. Any missing or
/// failing browser API makes `rasterize` return `None`, and the sampler falls
/// back to its synthetic pattern instead of aborting the mount.
pub struct CanvasRaster {
    document: web::Document,
    /// Gradient stops as CSS colors, precomputed from the config.
    stops: Vec<(f32, String)>,
}

impl CanvasRaster {
    pub fn new(document: web::Document, cfg: &GridConfig) -> Self {
        let stops = cfg
            .gradient
            .iter()
            .map(|s| {
                (
                    s.at,
                    format!("rgb({},{},{})", s.color[0], s.color[1], s.color[2]),
                )
            })
            .collect();
        Self { document, stops }
    }

    fn try_rasterize(&self, text: &str, width: u32, height: u32) -> Option<Bitmap> {
        let canvas: web::HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .ok()?
            .dyn_into()
            .ok()?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()??
            .dyn_into()
            .ok()?;

        // Start from a tall font and shrink until the text fits the width.
        let mut size = height as f64 * 0.9;
        ctx.set_font(&format!("bold {size:.0}px sans-serif"));
        let measured = ctx.measure_text(text).ok()?.width();
        let max_w = width as f64 * 0.92;
        if measured > max_w && measured > 0.0 {
            size *= max_w / measured;
            ctx.set_font(&format!("bold {size:.0}px sans-serif"));
        }
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        let grad = ctx.create_linear_gradient(0.0, 0.0, width as f64, 0.0);
        for (at, css) in &self.stops {
            grad.add_color_stop(*at, css).ok()?;
        }
        ctx.set_fill_style_canvas_gradient(&grad);
        ctx.fill_text(text, width as f64 / 2.0, height as f64 / 2.0)
            .ok()?;

        let image = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;
        Some(Bitmap {
            width,
            height,
            rgba: image.data().0,
        })
    }
}

impl GlyphRaster for CanvasRaster {
    fn rasterize(&self, text: &str, width: u32, height: u32) -> Option<Bitmap> {
        let bm = self.try_rasterize(text, width, height);
        if bm.is_none() {
            log::warn!("[raster] canvas text rasterization unavailable");
        }
        bm
    }
}
