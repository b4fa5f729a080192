//! Simulation tuning constants.
//!
//! These express intended behavior (time constants, decay rates, clamp
//! limits) and keep magic numbers out of the code.

// Frame normalization: deltas are expressed in 60 fps units.
pub const FRAME_UNIT_MS: f64 = 1000.0 / 60.0;
// Cap on a single frame delta, in frame units (absorbs tab backgrounding).
pub const FRAME_DELTA_CAP: f32 = 2.0;

// Intensity field
pub const MIN_VISIBLE: f32 = 0.02; // below this a cell is exactly zero
pub const DECAY_FACTOR: f32 = 0.92; // per 60 fps frame
pub const AGE_RELEASE_MS: f32 = 400.0; // forced release of lingering embers

// Reveal sweep
pub const REVEAL_DURATION_MS: f32 = 1400.0;
pub const REVEAL_TOLERANCE: f32 = 0.05;

// Scatter particles
pub const SCATTER_MAX: usize = 600; // hard pool cap
pub const SCATTER_SPEED_MIN: f32 = 0.06; // cells per frame unit
pub const SCATTER_SPEED_MAX: f32 = 0.34;
pub const SCATTER_DRAG: f32 = 0.94;
pub const SCATTER_DECAY: f32 = 0.95;
pub const SCATTER_MAX_AGE_MS: f32 = 1800.0;
pub const SCATTER_TRAIL_ATTENUATION: f32 = 0.6;
pub const SCATTER_DRAIN_PER_FRAME: usize = 48; // bounds per-frame spawn work
pub const SCATTER_STAGGER_MS: f64 = 900.0; // sweep duration of scatter-all
pub const RIPPLE_COOLDOWN_MS: f64 = 120.0; // per-cell pointer ripple cooldown

// Curl noise
pub const CURL_SCALE: f32 = 0.13; // grid units -> noise domain
pub const CURL_STRENGTH: f32 = 0.085;
pub const CURL_EPSILON: f32 = 0.35; // finite-difference offset

// Ripple
pub const RIPPLE_STEP_MS: f64 = 36.0; // per graph-depth ignition delay
pub const RIPPLE_MIN_INTENSITY: f32 = 0.08; // branch stops below this

// Click burst (radial explosion-on-click)
pub const CLICK_RADIUS_CELLS: f32 = 7.0;
pub const CLICK_DELAY_SPAN_MS: f64 = 160.0;
pub const CLICK_INTENSITY_FLOOR: f32 = 0.25;

// Full-grid explosion burst
pub const BURST_SPEED_MIN: f32 = 0.18;
pub const BURST_SPEED_MAX: f32 = 0.72;
pub const BURST_JITTER_RAD: f32 = 0.35;
pub const BURST_UP_BIAS: f32 = 0.16; // upward velocity bias, grid y grows down
pub const BURST_GRAVITY: f32 = 0.012; // per frame unit squared
pub const BURST_DRAG: f32 = 0.97;
pub const BURST_DECAY: f32 = 0.96;
pub const BURST_INTENSITY_FLOOR: f32 = 0.03;
pub const BURST_BACKGROUND_INTENSITY: f32 = 0.35;
pub const BURST_MASK_BOOST: f32 = 1.5;
pub const BURST_MASK_BASE: f32 = 0.30;
pub const BURST_BOUNDS_MARGIN: f32 = 0.25; // extra cull margin, fraction of grid
pub const BURST_TIMEOUT_MS: f64 = 2600.0; // hands control back regardless

// Glyph layout
pub const GLYPH_H_MARGIN_CELLS: usize = 2;
pub const GLYPH_V_MARGIN_RATIO: f32 = 0.18; // glyph sits in a vertical band

// Render
pub const CELL_FILL: f32 = 0.86; // cell fill size in grid units (leaves a gap)
