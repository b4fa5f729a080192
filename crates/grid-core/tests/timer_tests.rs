// Effect timer queue ordering and cancellation, plus the ripple and
// click-burst schedulers that feed it.

use grid_core::constants::{CLICK_DELAY_SPAN_MS, CLICK_RADIUS_CELLS, RIPPLE_STEP_MS};
use grid_core::effects;
use grid_core::timers::{EffectAction, EffectKind, EffectTimers};
use smallvec::SmallVec;

fn drain(timers: &mut EffectTimers, now_ms: f64) -> Vec<EffectAction> {
    let mut out: SmallVec<[EffectAction; 16]> = SmallVec::new();
    timers.drain_due(now_ms, &mut out);
    out.into_vec()
}

fn cell_of(action: &EffectAction) -> u32 {
    match action {
        EffectAction::Ignite { cell, .. } => *cell,
        EffectAction::IgniteAndScatter { cell, .. } => *cell,
    }
}

#[test]
fn entries_drain_in_fire_order_regardless_of_schedule_order() {
    let mut timers = EffectTimers::new();
    for (at, cell) in [(300.0, 3u32), (100.0, 1), (200.0, 2), (50.0, 0)] {
        timers.schedule(at, EffectKind::Ripple, EffectAction::Ignite { cell, intensity: 1.0 });
    }
    let fired = drain(&mut timers, 1000.0);
    let cells: Vec<u32> = fired.iter().map(cell_of).collect();
    assert_eq!(cells, vec![0, 1, 2, 3]);
    assert!(timers.is_empty());
}

#[test]
fn same_instant_entries_keep_schedule_order() {
    let mut timers = EffectTimers::new();
    for cell in 0..5u32 {
        timers.schedule(40.0, EffectKind::Ripple, EffectAction::Ignite { cell, intensity: 1.0 });
    }
    let cells: Vec<u32> = drain(&mut timers, 40.0).iter().map(cell_of).collect();
    assert_eq!(cells, vec![0, 1, 2, 3, 4]);
}

#[test]
fn drain_leaves_future_entries_queued() {
    let mut timers = EffectTimers::new();
    timers.schedule(10.0, EffectKind::Ripple, EffectAction::Ignite { cell: 1, intensity: 1.0 });
    timers.schedule(90.0, EffectKind::Ripple, EffectAction::Ignite { cell: 2, intensity: 1.0 });
    assert_eq!(drain(&mut timers, 50.0).len(), 1);
    assert_eq!(timers.len(), 1);
    assert_eq!(drain(&mut timers, 90.0).len(), 1);
    assert!(timers.is_empty());
}

#[test]
fn cancel_removes_only_the_named_kind() {
    let mut timers = EffectTimers::new();
    timers.schedule(10.0, EffectKind::Ripple, EffectAction::Ignite { cell: 1, intensity: 1.0 });
    timers.schedule(20.0, EffectKind::ClickBurst, EffectAction::IgniteAndScatter {
        cell: 2,
        intensity: 0.5,
    });
    timers.schedule(30.0, EffectKind::Ripple, EffectAction::Ignite { cell: 3, intensity: 0.5 });
    timers.cancel(EffectKind::Ripple);
    let fired = drain(&mut timers, 100.0);
    assert_eq!(fired.len(), 1);
    assert_eq!(cell_of(&fired[0]), 2);
}

#[test]
fn cancel_all_empties_the_queue() {
    let mut timers = EffectTimers::new();
    timers.schedule(10.0, EffectKind::Ripple, EffectAction::Ignite { cell: 1, intensity: 1.0 });
    timers.schedule(20.0, EffectKind::ClickBurst, EffectAction::IgniteAndScatter {
        cell: 2,
        intensity: 0.5,
    });
    timers.cancel_all();
    assert!(timers.is_empty());
    assert!(drain(&mut timers, 1000.0).is_empty());
}

#[test]
fn ripple_delays_grow_with_depth_and_intensity_halves() {
    let n = 32usize;
    let origin = 16 * n + 16;
    let mut timers = EffectTimers::new();
    effects::ripple(origin, n, 0.0, &mut timers);

    // Collect until a horizon well past the deepest scheduled delay.
    let fired = drain(&mut timers, 100_000.0);
    assert!(timers.is_empty());
    assert!(fired.len() > 1, "ripple must spread beyond the origin");

    // The origin fires first, at full intensity and zero delay.
    match fired[0] {
        EffectAction::Ignite { cell, intensity } => {
            assert_eq!(cell as usize, origin);
            assert_eq!(intensity, 1.0);
        }
        _ => panic!("ripple schedules plain ignitions"),
    }
    // Intensity halves per depth: 1.0, 0.5, 0.25, 0.125; the next halving
    // would fall below the floor, so depth stops at 3.
    let mut seen = std::collections::BTreeSet::new();
    for a in &fired {
        if let EffectAction::Ignite { intensity, .. } = a {
            seen.insert((intensity * 1000.0) as i32);
        }
    }
    assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![125, 250, 500, 1000]);
}

#[test]
fn ripple_covers_the_chebyshev_neighborhood_once() {
    let n = 32usize;
    let origin = 16 * n + 16;
    let mut timers = EffectTimers::new();
    effects::ripple(origin, n, 0.0, &mut timers);
    let fired = drain(&mut timers, 100_000.0);
    // 8-connected BFS to depth 3 around an interior origin is a 7x7 block.
    assert_eq!(fired.len(), 49);
    let unique: std::collections::BTreeSet<u32> = fired.iter().map(cell_of).collect();
    assert_eq!(unique.len(), 49, "no cell may be scheduled twice");
}

#[test]
fn ripple_depth_one_fires_a_step_after_the_origin() {
    let n = 32usize;
    let origin = 16 * n + 16;
    let mut timers = EffectTimers::new();
    effects::ripple(origin, n, 0.0, &mut timers);
    let at_origin = drain(&mut timers, 0.0);
    assert_eq!(at_origin.len(), 1);
    assert!(drain(&mut timers, RIPPLE_STEP_MS - 1.0).is_empty());
    let ring1 = drain(&mut timers, RIPPLE_STEP_MS);
    assert_eq!(ring1.len(), 8, "all 8 neighbors ignite at depth one");
}

#[test]
fn click_burst_is_bounded_by_its_radius_and_the_grid() {
    let n = 24usize;
    let mut timers = EffectTimers::new();
    // Corner origin: only the in-bounds quadrant is scheduled.
    effects::click_burst(0, n, 0.0, &mut timers);
    let fired = drain(&mut timers, 10_000.0);
    let r = CLICK_RADIUS_CELLS;
    for a in &fired {
        let cell = cell_of(a) as usize;
        let (x, y) = ((cell % n) as f32, (cell / n) as f32);
        assert!((x * x + y * y).sqrt() <= r, "cell ({x},{y}) outside radius");
    }
    // Roughly a quarter disc.
    assert!(fired.len() > 30 && fired.len() < 60, "got {}", fired.len());
}

#[test]
fn click_burst_fires_center_first_and_rim_last() {
    let n = 24usize;
    let origin = 12 * n + 12;
    let mut timers = EffectTimers::new();
    effects::click_burst(origin, n, 0.0, &mut timers);
    let center = drain(&mut timers, 0.0);
    assert_eq!(center.len(), 1);
    assert_eq!(cell_of(&center[0]) as usize, origin);
    match center[0] {
        EffectAction::IgniteAndScatter { intensity, .. } => assert_eq!(intensity, 1.0),
        _ => panic!("click burst schedules scattering ignitions"),
    }
    // Nothing fires after the full delay span has elapsed.
    drain(&mut timers, CLICK_DELAY_SPAN_MS);
    assert!(timers.is_empty());
}
