//! Debug-build-only preview of the sampled glyph, logged as a data URL so
//! the mask can be inspected in the browser console. Inert in release.

#[cfg(debug_assertions)]
pub fn log_glyph_preview(document: &web_sys::Document, glyph: &grid_core::glyph::GlyphData) {
    use wasm_bindgen::{Clamped, JsCast};

    let n = glyph.grid_size as u32;
    let mut rgba = vec![0u8; (n * n * 4) as usize];
    for cell in 0..(n * n) as usize {
        let c = glyph.color(cell);
        let m = glyph.mask[cell];
        rgba[cell * 4] = (c[0] as f32 * m) as u8;
        rgba[cell * 4 + 1] = (c[1] as f32 * m) as u8;
        rgba[cell * 4 + 2] = (c[2] as f32 * m) as u8;
        rgba[cell * 4 + 3] = 255;
    }
    let url = (|| -> Option<String> {
        let canvas: web_sys::HtmlCanvasElement = document
            .create_element("canvas")
            .ok()?
            .dyn_into()
            .ok()?;
        canvas.set_width(n);
        canvas.set_height(n);
        let ctx: web_sys::CanvasRenderingContext2d =
            canvas.get_context("2d").ok()??.dyn_into().ok()?;
        let image = web_sys::ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba), n, n)
            .ok()?;
        ctx.put_image_data(&image, 0.0, 0.0).ok()?;
        canvas.to_data_url().ok()
    })();
    match url {
        Some(u) => log::debug!("[glyph] mask preview: {u}"),
        None => log::debug!("[glyph] mask preview unavailable"),
    }
}

#[cfg(not(debug_assertions))]
pub fn log_glyph_preview(_document: &web_sys::Document, _glyph: &grid_core::glyph::GlyphData) {}
