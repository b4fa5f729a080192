//! Conditional requestAnimationFrame driver. Frames are only requested while
//! the session reports residual activity; an idle scene schedules nothing
//! until an input or the auto-scatter interval re-arms the loop.

use crate::surface::CanvasSurface;
use grid_core::session::GridSession;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct App {
    pub session: GridSession,
    pub surface: CanvasSurface,
}

pub type SharedApp = Rc<RefCell<App>>;

pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    running: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn install(app: SharedApp) -> Rc<Self> {
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let running = Rc::new(Cell::new(false));

        let tick_clone = tick.clone();
        let running_tick = running.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let now = js_sys::Date::now();
            let cont = {
                let mut a = app.borrow_mut();
                let App { session, surface } = &mut *a;
                session.frame(now, surface)
            };
            if cont {
                request_frame(&tick_clone);
            } else {
                running_tick.set(false);
                log::debug!("[frame] loop idle");
            }
        }) as Box<dyn FnMut()>));

        Rc::new(Self { tick, running })
    }

    /// Request a frame unless one is already in flight.
    pub fn ensure_running(&self) {
        if self.running.get() {
            return;
        }
        self.running.set(true);
        request_frame(&self.tick);
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Periodic scatter trigger. The session defers it while a scatter or burst
/// is already in flight, so a fixed interval is safe.
pub fn install_auto_scatter(
    window: &web::Window,
    app: SharedApp,
    frame_loop: Rc<FrameLoop>,
    interval_ms: f64,
) {
    let closure = Closure::wrap(Box::new(move || {
        app.borrow_mut().session.trigger_scatter(js_sys::Date::now());
        frame_loop.ensure_running();
    }) as Box<dyn FnMut()>);
    let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        interval_ms as i32,
    );
    closure.forget();
}
