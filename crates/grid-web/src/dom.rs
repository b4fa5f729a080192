use web_sys as web;

/// Keep the canvas backing store square and matched to its CSS size times
/// devicePixelRatio; the grid itself is square, so the shorter CSS edge wins.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let side = (rect.width().min(rect.height()) * dpr) as u32;
        canvas.set_width(side.max(1));
        canvas.set_height(side.max(1));
    }
}
