#![cfg(target_arch = "wasm32")]
mod debug;
mod dom;
mod events;
mod frame;
mod raster;
mod surface;

use frame::App;
use grid_core::config::{GridConfig, Orientation};
use grid_core::session::GridSession;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("grid-web starting");

    if let Err(e) = init() {
        log::error!("init error: {e:?}");
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("grid-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #grid-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;

    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();
        resize_closure.forget();
    }

    let mut cfg = GridConfig::default();
    let rect = canvas.get_bounding_client_rect();
    if rect.height() > rect.width() {
        cfg.orientation = Orientation::Portrait;
    }
    let grid_size = cfg.grid_size;
    let auto_scatter_ms = cfg.auto_scatter_interval_ms;

    let raster = raster::CanvasRaster::new(document.clone(), &cfg);
    let seed = js_sys::Date::now() as u64;
    let session = GridSession::new(cfg, &raster, seed);
    debug::log_glyph_preview(&document, session.glyph());
    let surface = surface::CanvasSurface::new(canvas.clone(), grid_size)?;

    let app: frame::SharedApp = Rc::new(RefCell::new(App { session, surface }));
    let frame_loop = frame::FrameLoop::install(app.clone());
    events::install_pointer_handlers(&canvas, app.clone(), frame_loop.clone());
    frame::install_auto_scatter(&window, app, frame_loop.clone(), auto_scatter_ms);
    frame_loop.ensure_running();
    Ok(())
}
