//! Pointer-driven effects: ripple and radial click burst.
//!
//! Both only schedule delayed ignitions on the effect timer queue; the frame
//! scheduler applies them when due, so an effect triggered mid-frame never
//! mutates the field re-entrantly.

use crate::constants::{
    CLICK_DELAY_SPAN_MS, CLICK_INTENSITY_FLOOR, CLICK_RADIUS_CELLS, RIPPLE_MIN_INTENSITY,
    RIPPLE_STEP_MS,
};
use crate::timers::{EffectAction, EffectKind, EffectTimers};
use fnv::FnvHashSet;
use std::collections::VecDeque;

const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Breadth-first ignition spreading from `origin_cell`. Delay grows with
/// graph depth (not Euclidean distance) and intensity halves per depth
/// level; a branch stops once it falls below the ripple floor.
pub fn ripple(origin_cell: usize, grid_size: usize, now_ms: f64, timers: &mut EffectTimers) {
    let n = grid_size as i32;
    let (x0, y0) = ((origin_cell % grid_size) as i32, (origin_cell / grid_size) as i32);
    let mut visited: FnvHashSet<(i32, i32)> = FnvHashSet::default();
    let mut queue: VecDeque<(i32, i32, u32, f32)> = VecDeque::new();
    visited.insert((x0, y0));
    queue.push_back((x0, y0, 0, 1.0));
    while let Some((x, y, depth, intensity)) = queue.pop_front() {
        let cell = (y * n + x) as u32;
        timers.schedule(
            now_ms + depth as f64 * RIPPLE_STEP_MS,
            EffectKind::Ripple,
            EffectAction::Ignite { cell, intensity },
        );
        let next = intensity * 0.5;
        if next < RIPPLE_MIN_INTENSITY {
            continue;
        }
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= n || ny >= n || !visited.insert((nx, ny)) {
                continue;
            }
            queue.push_back((nx, ny, depth + 1, next));
        }
    }
}

/// Radial explosion-on-click: every cell within the click radius ignites and
/// scatters after a delay proportional to its normalized distance, so the
/// effect visibly expands outward. Repeatable, unlike the full-grid burst.
pub fn click_burst(origin_cell: usize, grid_size: usize, now_ms: f64, timers: &mut EffectTimers) {
    let n = grid_size as i32;
    let (x0, y0) = ((origin_cell % grid_size) as i32, (origin_cell / grid_size) as i32);
    let r = CLICK_RADIUS_CELLS;
    let ri = r.ceil() as i32;
    for dy in -ri..=ri {
        for dx in -ri..=ri {
            let (x, y) = (x0 + dx, y0 + dy);
            if x < 0 || y < 0 || x >= n || y >= n {
                continue;
            }
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist > r {
                continue;
            }
            let norm = dist / r;
            let intensity =
                (1.0 - norm * (1.0 - CLICK_INTENSITY_FLOOR)).max(CLICK_INTENSITY_FLOOR);
            timers.schedule(
                now_ms + norm as f64 * CLICK_DELAY_SPAN_MS,
                EffectKind::ClickBurst,
                EffectAction::IgniteAndScatter {
                    cell: (y * n + x) as u32,
                    intensity,
                },
            );
        }
    }
}
