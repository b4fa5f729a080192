//! One simulation session: every mutable buffer, timer and particle pool is
//! owned here, constructed per mount and torn down explicitly. No
//! process-wide state.
//!
//! The host drives the session with a per-frame callback carrying a virtual
//! clock (`now_ms`); `frame` advances every time-based subsystem by a
//! 60 fps-normalized delta and reports whether another frame is needed, so
//! an idle scene costs nothing.

use crate::config::{gradient_color, GridConfig};
use crate::constants::*;
use crate::effects;
use crate::field::IntensityField;
use crate::glyph::{GlyphData, GlyphRaster};
use crate::particles::{ExplosionBurst, ScatterPool};
use crate::render::Surface;
use crate::timers::{EffectAction, EffectTimers};
use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

/// What the session is currently doing. A single dispatcher reads this
/// instead of chaining completion callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Scattering,
    Exploding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FramePhase {
    Idle,
    Running,
    /// A re-schedule was requested while running; honored after the current
    /// frame completes so bursts of triggers coalesce into one next frame.
    Pending,
}

struct PendingScatter {
    cell: u32,
    /// Position within `GlyphData::cell_indices`.
    k: u32,
    due_ms: f64,
}

pub struct GridSession {
    cfg: GridConfig,
    glyph: GlyphData,
    field: IntensityField,
    scatter: ScatterPool,
    burst: ExplosionBurst,
    timers: EffectTimers,
    rng: StdRng,

    mode: Mode,
    phase: FramePhase,
    frame_queued: bool,

    /// Per glyph-cell dispersal flags, indexed like `cell_indices`.
    scattered: Vec<bool>,
    pending_scatter: Vec<PendingScatter>,
    remaining_text_cells: usize,
    completed_scatters: u32,
    deferred_scatter: bool,

    reveal_progress: f32,
    noise_time: f32,
    curl_amount: f32,

    last_frame_ms: Option<f64>,
    burst_fired: bool,
    last_pointer_cell: i32,
    ripple_cooldowns: FnvHashMap<u32, f64>,
}

impl GridSession {
    pub fn new(cfg: GridConfig, raster: &dyn GlyphRaster, seed: u64) -> Self {
        let glyph = GlyphData::sample(raster, &cfg);
        let scattered = vec![false; glyph.cell_indices.len()];
        let n = cfg.grid_size;
        log::info!("[session] ready: grid {n}x{n}, seed {seed}");
        Self {
            field: IntensityField::new(n),
            scatter: ScatterPool::new(n),
            burst: ExplosionBurst::new(n),
            timers: EffectTimers::new(),
            rng: StdRng::seed_from_u64(seed),
            mode: Mode::Interactive,
            phase: FramePhase::Idle,
            frame_queued: true,
            scattered,
            pending_scatter: Vec::new(),
            remaining_text_cells: 0,
            completed_scatters: 0,
            deferred_scatter: false,
            reveal_progress: 0.0,
            noise_time: 0.0,
            curl_amount: cfg.curl_amount,
            last_frame_ms: None,
            burst_fired: false,
            last_pointer_cell: -1,
            ripple_cooldowns: FnvHashMap::default(),
            glyph,
            cfg,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.cfg
    }

    pub fn glyph(&self) -> &GlyphData {
        &self.glyph
    }

    pub fn field(&self) -> &IntensityField {
        &self.field
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn completed_scatters(&self) -> u32 {
        self.completed_scatters
    }

    pub fn remaining_text_cells(&self) -> usize {
        self.remaining_text_cells
    }

    pub fn reveal_progress(&self) -> f32 {
        self.reveal_progress
    }

    pub fn scatter_len(&self) -> usize {
        self.scatter.len()
    }

    pub fn burst_active(&self) -> bool {
        self.burst.is_active()
    }

    /// Whether the host should drive another frame.
    pub fn needs_frame(&self) -> bool {
        self.frame_queued
    }

    /// Request a visual update. Coalesces: while a frame is running this
    /// only flags a re-schedule, and an already-queued frame is a no-op.
    pub fn schedule_frame(&mut self) {
        match self.phase {
            FramePhase::Running => self.phase = FramePhase::Pending,
            _ => self.frame_queued = true,
        }
    }

    /// External curl tuning input, clamped to [0, 1].
    pub fn set_curl_amount(&mut self, amount: f32) {
        self.curl_amount = amount.clamp(0.0, 1.0);
    }

    pub fn curl_amount(&self) -> f32 {
        self.curl_amount
    }

    /// External scatter trigger (also driven by the host's auto-scatter
    /// interval). Deferred while a scatter or explosion is in progress and
    /// fired when the current one completes.
    pub fn trigger_scatter(&mut self, now_ms: f64) {
        if self.mode != Mode::Interactive || self.burst.is_active() {
            self.deferred_scatter = true;
            return;
        }
        self.start_scatter_all(now_ms);
    }

    pub fn pointer_move(&mut self, gx: f32, gy: f32, now_ms: f64) {
        let Some(cell) = self.cell_at(gx, gy) else {
            return;
        };
        if self.burst.is_active() || cell as i32 == self.last_pointer_cell {
            return;
        }
        self.last_pointer_cell = cell as i32;
        // Per-cell cooldown bounds spawn storms from rapid pointer movement.
        if let Some(&until) = self.ripple_cooldowns.get(&(cell as u32)) {
            if now_ms < until {
                return;
            }
        }
        self.ripple_cooldowns.insert(cell as u32, now_ms + RIPPLE_COOLDOWN_MS);
        effects::ripple(cell, self.cfg.grid_size, now_ms, &mut self.timers);
        self.schedule_frame();
    }

    pub fn pointer_enter(&mut self, gx: f32, gy: f32, now_ms: f64) {
        self.last_pointer_cell = -1;
        self.pointer_move(gx, gy, now_ms);
    }

    /// First press ignites the one-shot full-grid burst; every later press
    /// is a repeatable radial click burst.
    pub fn pointer_down(&mut self, gx: f32, gy: f32, now_ms: f64) {
        let Some(cell) = self.cell_at(gx, gy) else {
            return;
        };
        if self.burst.is_active() {
            return;
        }
        if !self.burst_fired {
            self.burst_fired = true;
            self.start_burst(cell, now_ms);
        } else {
            effects::click_burst(cell, self.cfg.grid_size, now_ms, &mut self.timers);
        }
        self.schedule_frame();
    }

    /// Advance one frame and compose the draw. Returns whether the host
    /// should keep the loop running.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> bool {
        self.phase = FramePhase::Running;
        self.frame_queued = false;

        let elapsed = match self.last_frame_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => FRAME_UNIT_MS,
        };
        self.last_frame_ms = Some(now_ms);
        let delta = ((elapsed / FRAME_UNIT_MS) as f32).min(FRAME_DELTA_CAP);
        let elapsed_capped = delta * FRAME_UNIT_MS as f32;

        self.noise_time += elapsed_capped / 1000.0;
        if self.reveal_progress < 1.0 {
            self.reveal_progress =
                (self.reveal_progress + elapsed_capped / REVEAL_DURATION_MS).min(1.0);
        }

        let burst_active = self.burst.advance(delta, now_ms, &mut self.field);
        if self.mode == Mode::Exploding && !burst_active {
            self.finish_burst(now_ms);
        }

        // Delayed pointer-effect ignitions due this tick.
        let mut due: SmallVec<[EffectAction; 16]> = SmallVec::new();
        self.timers.drain_due(now_ms, &mut due);
        for action in due {
            match action {
                EffectAction::Ignite { cell, intensity } => {
                    let cell = cell as usize;
                    self.field.deposit(cell, intensity, !self.glyph.is_glyph(cell));
                }
                EffectAction::IgniteAndScatter { cell, intensity } => {
                    let cell = cell as usize;
                    self.field.deposit(cell, intensity, !self.glyph.is_glyph(cell));
                    self.scatter.spawn(
                        cell,
                        intensity,
                        &mut self.rng,
                        &mut self.field,
                        &self.glyph,
                    );
                }
            }
        }

        let field_energy = self.field.decay(
            delta,
            burst_active,
            &self.glyph,
            &self.scattered,
            self.reveal_progress,
        );

        self.drain_pending_scatter(now_ms);
        if self.mode == Mode::Scattering
            && self.pending_scatter.is_empty()
            && self.remaining_text_cells == 0
        {
            self.complete_scatter(now_ms);
        }

        self.scatter.advance(
            delta,
            elapsed_capped,
            self.noise_time,
            self.curl_amount,
            &mut self.field,
            &self.glyph,
        );

        self.render(surface);

        let rescheduled = self.phase == FramePhase::Pending;
        self.phase = FramePhase::Idle;
        let cont = field_energy
            || self.burst.is_active()
            || !self.scatter.is_empty()
            || !self.pending_scatter.is_empty()
            || !self.timers.is_empty()
            || self.reveal_progress < 1.0
            || rescheduled;
        if cont {
            self.frame_queued = true;
        } else {
            // Fresh delta baseline when the loop resumes after idling.
            self.last_frame_ms = None;
        }
        cont
    }

    /// Compose the current state onto the surface. Reads only.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear(self.cfg.background);
        let half = CELL_FILL * 0.5;
        if self.burst.is_active() {
            // Full-screen takeover: only burst particles are drawn.
            for p in self.burst.iter() {
                surface.fill_cell(
                    p.pos.x - half,
                    p.pos.y - half,
                    CELL_FILL,
                    p.color,
                    p.intensity.min(1.0),
                );
            }
            return;
        }
        let n = self.cfg.grid_size;
        let inset = (1.0 - CELL_FILL) * 0.5;
        for (k, &cell) in self.glyph.cell_indices.iter().enumerate() {
            let cell = cell as usize;
            let v = self.field.intensity(cell);
            if v <= 0.0 {
                continue;
            }
            // Scattered cells show residual ember energy only.
            let alpha = if self.scattered[k] { v } else { v * self.glyph.mask[cell] };
            if alpha <= 0.0 {
                continue;
            }
            surface.fill_cell(
                (cell % n) as f32 + inset,
                (cell / n) as f32 + inset,
                CELL_FILL,
                self.glyph.color(cell),
                alpha.min(1.0),
            );
        }
        for &cell in self.field.highlight_cells() {
            let cell = cell as usize;
            let v = self.field.intensity(cell);
            if v <= 0.0 {
                continue;
            }
            let color = gradient_color(&self.cfg.gradient, self.glyph.reveal_ratios[cell]);
            surface.fill_cell(
                (cell % n) as f32 + inset,
                (cell / n) as f32 + inset,
                CELL_FILL,
                color,
                v.min(1.0),
            );
        }
        for p in self.scatter.iter() {
            surface.fill_cell(
                p.pos.x - half,
                p.pos.y - half,
                CELL_FILL,
                p.color,
                p.intensity.min(1.0),
            );
        }
    }

    /// Cancel every pending timer and zero all mutable buffers. Host calls
    /// this on unmount, before dropping its rendering surface.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.pending_scatter.clear();
        self.remaining_text_cells = 0;
        self.scatter.clear();
        self.burst.reset();
        self.field.clear();
        self.ripple_cooldowns.clear();
        self.frame_queued = false;
        self.phase = FramePhase::Idle;
        self.last_frame_ms = None;
        log::info!("[session] torn down");
    }

    fn cell_at(&self, gx: f32, gy: f32) -> Option<usize> {
        let n = self.cfg.grid_size as f32;
        if gx < 0.0 || gy < 0.0 || gx >= n || gy >= n {
            return None;
        }
        Some(gy as usize * self.cfg.grid_size + gx as usize)
    }

    fn start_scatter_all(&mut self, now_ms: f64) {
        // Reset event: stale delayed ignitions must not fire into the new
        // cycle.
        self.timers.cancel_all();
        self.ripple_cooldowns.clear();
        self.field.clear();
        self.scattered.fill(false);
        self.pending_scatter = self
            .glyph
            .cell_indices
            .iter()
            .enumerate()
            .map(|(k, &cell)| PendingScatter {
                cell,
                k: k as u32,
                due_ms: now_ms
                    + self.glyph.reveal_ratios[cell as usize] as f64 * SCATTER_STAGGER_MS,
            })
            .collect();
        self.pending_scatter
            .sort_unstable_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.cell.cmp(&b.cell)));
        self.remaining_text_cells = self.pending_scatter.len();
        self.mode = Mode::Scattering;
        self.schedule_frame();
        log::info!("[session] scatter-all: {} cells", self.remaining_text_cells);
    }

    /// Convert due pending cells into particles, rate-limited per frame.
    fn drain_pending_scatter(&mut self, now_ms: f64) {
        let mut due = 0;
        while due < self.pending_scatter.len()
            && due < SCATTER_DRAIN_PER_FRAME
            && self.pending_scatter[due].due_ms <= now_ms
        {
            due += 1;
        }
        for p in self.pending_scatter.drain(..due) {
            let k = p.k as usize;
            if !self.scattered[k] {
                self.scattered[k] = true;
                self.remaining_text_cells = self.remaining_text_cells.saturating_sub(1);
            }
            // A full pool drops the particle; the cell still disperses.
            self.scatter.spawn(
                p.cell as usize,
                1.0,
                &mut self.rng,
                &mut self.field,
                &self.glyph,
            );
        }
    }

    fn complete_scatter(&mut self, now_ms: f64) {
        self.completed_scatters += 1;
        self.mode = Mode::Interactive;
        self.reveal_progress = 0.0;
        self.scattered.fill(false);
        log::info!(
            "[session] scatter complete ({} so far), reforming",
            self.completed_scatters
        );
        if std::mem::take(&mut self.deferred_scatter) {
            self.start_scatter_all(now_ms);
        }
    }

    fn start_burst(&mut self, origin: usize, now_ms: f64) {
        self.timers.cancel_all();
        self.pending_scatter.clear();
        self.remaining_text_cells = 0;
        self.scatter.clear();
        self.mode = Mode::Exploding;
        self.burst
            .ignite(origin, now_ms, &self.glyph, &mut self.rng, &mut self.field);
    }

    fn finish_burst(&mut self, now_ms: f64) {
        self.mode = Mode::Interactive;
        self.reveal_progress = 0.0;
        self.scattered.fill(false);
        if std::mem::take(&mut self.deferred_scatter) {
            self.start_scatter_all(now_ms);
        }
    }
}
