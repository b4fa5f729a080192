// End-to-end session scenarios driven through the virtual frame clock: the
// reveal-then-idle lifecycle, scatter-all completion and deferral, the
// one-shot explosion, click bursts and pointer ripples.

use grid_core::config::GridConfig;
use grid_core::constants::{BURST_TIMEOUT_MS, FRAME_UNIT_MS};
use grid_core::glyph::{Bitmap, GlyphRaster};
use grid_core::render::Surface;
use grid_core::session::{GridSession, Mode};

struct NoRaster;

impl GlyphRaster for NoRaster {
    fn rasterize(&self, _text: &str, _w: u32, _h: u32) -> Option<Bitmap> {
        None
    }
}

/// Records draw calls; the tests only care about counts and the clear color.
#[derive(Default)]
struct RecordingSurface {
    clears: Vec<[u8; 3]>,
    fills: usize,
}

impl RecordingSurface {
    fn reset(&mut self) {
        self.clears.clear();
        self.fills = 0;
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: [u8; 3]) {
        self.clears.push(color);
    }

    fn fill_cell(&mut self, _x: f32, _y: f32, _size: f32, _color: [u8; 3], _alpha: f32) {
        self.fills += 1;
    }
}

struct Harness {
    session: GridSession,
    surface: RecordingSurface,
    now_ms: f64,
}

impl Harness {
    fn new(grid_size: usize) -> Self {
        let cfg = GridConfig {
            grid_size,
            ..GridConfig::default()
        };
        Self {
            session: GridSession::new(cfg, &NoRaster, 7),
            surface: RecordingSurface::default(),
            now_ms: 0.0,
        }
    }

    fn step(&mut self) -> bool {
        self.now_ms += FRAME_UNIT_MS;
        self.session.frame(self.now_ms, &mut self.surface)
    }

    /// Step until the predicate holds, asserting it does within `cap` frames.
    fn step_until(&mut self, cap: usize, what: &str, mut pred: impl FnMut(&GridSession) -> bool) {
        for _ in 0..cap {
            self.step();
            if pred(&self.session) {
                return;
            }
        }
        panic!("'{what}' did not happen within {cap} frames");
    }

    /// Step until the loop reports it can stop.
    fn step_to_idle(&mut self, cap: usize) {
        for _ in 0..cap {
            if !self.step() {
                assert!(!self.session.needs_frame());
                return;
            }
        }
        panic!("loop still running after {cap} frames");
    }
}

#[test]
fn reveal_completes_and_the_loop_goes_idle() {
    let mut h = Harness::new(32);
    assert!(h.session.needs_frame(), "a fresh session wants its first frame");
    h.step_to_idle(120);
    assert_eq!(h.session.mode(), Mode::Interactive);
    assert_eq!(h.session.reveal_progress(), 1.0);

    // The idle scene still renders the fully revealed glyph.
    h.surface.reset();
    h.session.render(&mut h.surface);
    assert_eq!(h.surface.clears, vec![h.session.config().background]);
    assert_eq!(h.surface.fills, h.session.glyph().cell_indices.len());
}

#[test]
fn pointer_move_rearms_an_idle_loop_and_ripples_the_background() {
    let mut h = Harness::new(32);
    h.step_to_idle(120);
    assert!(!h.session.needs_frame());

    // An interior background cell, well above the glyph band.
    h.session.pointer_move(4.5, 2.5, h.now_ms);
    assert!(h.session.needs_frame(), "pointer input must re-arm the loop");
    assert!(h.step(), "scheduled ripple ignitions keep the loop running");
    assert!(
        !h.session.field().highlight_cells().is_empty(),
        "rippled background cells must be highlight-tracked"
    );
    h.step_to_idle(600);
}

#[test]
fn pointer_move_within_the_same_cell_stays_idle() {
    let mut h = Harness::new(32);
    h.step_to_idle(120);
    h.session.pointer_move(4.5, 2.5, h.now_ms);
    h.step_to_idle(600);
    // Sub-cell movement resolves to the same cell and schedules nothing.
    h.session.pointer_move(4.2, 2.8, h.now_ms);
    assert!(!h.session.needs_frame());
}

#[test]
fn scatter_all_completes_exactly_once() {
    let mut h = Harness::new(32);
    h.step_to_idle(120);

    h.session.trigger_scatter(h.now_ms);
    assert_eq!(h.session.mode(), Mode::Scattering);
    assert!(h.session.needs_frame());

    h.step_until(200, "scatter completion", |s| s.mode() == Mode::Interactive);
    assert_eq!(h.session.completed_scatters(), 1);
    assert_eq!(h.session.remaining_text_cells(), 0);
    assert!(
        h.session.reveal_progress() < 1.0,
        "the glyph reforms through a fresh reveal sweep"
    );

    h.step_to_idle(600);
    assert_eq!(h.session.completed_scatters(), 1, "no double completion");
    assert_eq!(h.session.scatter_len(), 0);
}

#[test]
fn a_trigger_during_scattering_is_deferred_not_dropped() {
    let mut h = Harness::new(32);
    h.step_to_idle(120);

    h.session.trigger_scatter(h.now_ms);
    h.step();
    assert_eq!(h.session.mode(), Mode::Scattering);
    h.session.trigger_scatter(h.now_ms);

    h.step_until(200, "first completion", |s| s.completed_scatters() == 1);
    // The deferred trigger starts the next cycle on the completion frame.
    assert_eq!(h.session.mode(), Mode::Scattering);

    h.step_until(200, "second completion", |s| s.completed_scatters() == 2);
    h.step_to_idle(600);
    assert_eq!(h.session.completed_scatters(), 2);
}

#[test]
fn first_press_fires_the_one_shot_burst() {
    let mut h = Harness::new(24);
    h.step_to_idle(120);

    h.session.pointer_down(12.0, 12.0, h.now_ms);
    assert!(h.session.burst_active());
    assert_eq!(h.session.mode(), Mode::Exploding);

    // While exploding, only burst particles are drawn.
    h.surface.reset();
    h.session.render(&mut h.surface);
    assert_eq!(h.surface.fills, 24 * 24);

    // Further presses and scatter triggers are absorbed during the burst.
    h.session.pointer_down(3.0, 3.0, h.now_ms);
    assert_eq!(h.session.mode(), Mode::Exploding);
    h.session.trigger_scatter(h.now_ms);

    let cap = (BURST_TIMEOUT_MS / FRAME_UNIT_MS).ceil() as usize + 4;
    h.step_until(cap, "burst end", |s| !s.burst_active());
    // The deferred scatter fires as soon as the burst hands control back.
    assert_eq!(h.session.mode(), Mode::Scattering);
    h.step_until(200, "deferred scatter completion", |s| {
        s.mode() == Mode::Interactive
    });
    assert_eq!(h.session.completed_scatters(), 1);
    h.step_to_idle(600);
}

#[test]
fn later_presses_are_repeatable_click_bursts() {
    let mut h = Harness::new(24);
    h.step_to_idle(120);

    h.session.pointer_down(12.0, 12.0, h.now_ms);
    let cap = (BURST_TIMEOUT_MS / FRAME_UNIT_MS).ceil() as usize + 4;
    h.step_until(cap, "burst end", |s| !s.burst_active());
    h.step_to_idle(600);

    for _ in 0..2 {
        h.session.pointer_down(12.0, 12.0, h.now_ms);
        assert!(!h.session.burst_active(), "the full burst never repeats");
        h.step_until(40, "click burst spawns particles", |s| s.scatter_len() > 0);
        h.step_to_idle(600);
        assert_eq!(h.session.scatter_len(), 0);
    }
}

#[test]
fn teardown_clears_all_activity() {
    let mut h = Harness::new(24);
    h.step();
    h.session.trigger_scatter(h.now_ms);
    h.step();
    h.session.pointer_move(2.5, 2.5, h.now_ms);

    h.session.teardown();
    assert!(!h.session.needs_frame());
    assert_eq!(h.session.scatter_len(), 0);
    assert!(!h.session.burst_active());
    assert!(h.session.field().highlight_cells().is_empty());

    h.surface.reset();
    h.session.render(&mut h.surface);
    assert_eq!(h.surface.fills, 0, "a torn-down session draws nothing");
}

#[test]
fn out_of_bounds_pointer_input_is_ignored() {
    let mut h = Harness::new(24);
    h.step_to_idle(120);
    h.session.pointer_move(-1.0, 5.0, h.now_ms);
    h.session.pointer_down(24.0, 5.0, h.now_ms);
    assert!(!h.session.needs_frame());
    assert!(!h.session.burst_active());
}
