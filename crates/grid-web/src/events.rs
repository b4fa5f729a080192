use crate::frame::{FrameLoop, SharedApp};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Client (CSS px) pointer position to fractional grid coordinates.
fn to_grid(canvas: &web::HtmlCanvasElement, client_x: f32, client_y: f32, n: usize) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let side = rect.width().min(rect.height()).max(1.0) as f32;
    let gx = (client_x - rect.left() as f32) / side * n as f32;
    let gy = (client_y - rect.top() as f32) / side * n as f32;
    (gx, gy)
}

pub fn install_pointer_handlers(
    canvas: &web::HtmlCanvasElement,
    app: SharedApp,
    frame_loop: Rc<FrameLoop>,
) {
    {
        let canvas_m = canvas.clone();
        let app_m = app.clone();
        let loop_m = frame_loop.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let now = js_sys::Date::now();
            let mut a = app_m.borrow_mut();
            let n = a.session.config().grid_size;
            let (gx, gy) = to_grid(&canvas_m, ev.client_x() as f32, ev.client_y() as f32, n);
            a.session.pointer_move(gx, gy, now);
            if a.session.needs_frame() {
                drop(a);
                loop_m.ensure_running();
            }
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    {
        let canvas_e = canvas.clone();
        let app_e = app.clone();
        let loop_e = frame_loop.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let now = js_sys::Date::now();
            let mut a = app_e.borrow_mut();
            let n = a.session.config().grid_size;
            let (gx, gy) = to_grid(&canvas_e, ev.client_x() as f32, ev.client_y() as f32, n);
            a.session.pointer_enter(gx, gy, now);
            if a.session.needs_frame() {
                drop(a);
                loop_e.ensure_running();
            }
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("pointerenter", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    {
        let canvas_d = canvas.clone();
        let loop_d = frame_loop;
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let now = js_sys::Date::now();
            let mut a = app.borrow_mut();
            let n = a.session.config().grid_size;
            let (gx, gy) = to_grid(&canvas_d, ev.client_x() as f32, ev.client_y() as f32, n);
            a.session.pointer_down(gx, gy, now);
            if a.session.needs_frame() {
                drop(a);
                loop_d.ensure_running();
            }
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
}
