//! The two particle populations: short-lived scatter particles that deposit
//! glow into the intensity field, and the one-shot full-grid explosion burst
//! that temporarily owns the whole field.

use crate::config::Rgb;
use crate::constants::*;
use crate::field::IntensityField;
use crate::glyph::GlyphData;
use crate::noise;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

pub struct ScatterParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub intensity: f32,
    pub age_ms: f32,
    pub color: Rgb,
    last_cell: i32,
}

/// Capped pool of drifting, decaying scatter particles.
pub struct ScatterPool {
    grid_size: usize,
    particles: Vec<ScatterParticle>,
}

impl ScatterPool {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            particles: Vec::with_capacity(SCATTER_MAX),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScatterParticle> {
        self.particles.iter()
    }

    /// Spawn a particle at the center of `cell` with a random direction and
    /// speed, depositing the initial intensity immediately. A full pool
    /// rejects the spawn silently; the effect simply saturates.
    pub fn spawn(
        &mut self,
        cell: usize,
        base_intensity: f32,
        rng: &mut StdRng,
        field: &mut IntensityField,
        glyph: &GlyphData,
    ) -> bool {
        if self.particles.len() >= SCATTER_MAX {
            return false;
        }
        let n = self.grid_size;
        let pos = Vec2::new((cell % n) as f32 + 0.5, (cell / n) as f32 + 0.5);
        let speed = rng.gen_range(SCATTER_SPEED_MIN..SCATTER_SPEED_MAX);
        let vel = Vec2::from_angle(rng.gen::<f32>() * TAU) * speed;
        let color = if glyph.is_glyph(cell) {
            glyph.color(cell)
        } else {
            [255, 255, 255]
        };
        self.particles.push(ScatterParticle {
            pos,
            vel,
            intensity: base_intensity.clamp(0.0, 1.0),
            age_ms: 0.0,
            color,
            last_cell: cell as i32,
        });
        field.deposit(cell, base_intensity, !glyph.is_glyph(cell));
        true
    }

    /// Integrate one frame: drag, curl drift, decay, culling, and deposits
    /// at the current cell plus an attenuated trail at the previous one.
    pub fn advance(
        &mut self,
        delta: f32,
        elapsed_ms: f32,
        noise_time: f32,
        curl_amount: f32,
        field: &mut IntensityField,
        glyph: &GlyphData,
    ) {
        let n = self.grid_size as f32;
        let drag = SCATTER_DRAG.powf(delta);
        let decay = SCATTER_DECAY.powf(delta);
        self.particles.retain_mut(|p| {
            p.vel *= drag;
            if curl_amount > 0.0 {
                let c = noise::curl(p.pos.x * CURL_SCALE, p.pos.y * CURL_SCALE, noise_time);
                p.vel += c * (CURL_STRENGTH * curl_amount * delta);
            }
            p.pos += p.vel * delta;
            p.intensity *= decay;
            p.age_ms += elapsed_ms;
            if p.intensity < MIN_VISIBLE || p.age_ms > SCATTER_MAX_AGE_MS {
                return false;
            }
            if p.pos.x < 0.0 || p.pos.y < 0.0 || p.pos.x >= n || p.pos.y >= n {
                return false;
            }
            let cell = p.pos.y as usize * self.grid_size + p.pos.x as usize;
            field.deposit(cell, p.intensity, !glyph.is_glyph(cell));
            if cell as i32 != p.last_cell {
                let prev = p.last_cell as usize;
                field.deposit(
                    prev,
                    p.intensity * SCATTER_TRAIL_ATTENUATION,
                    !glyph.is_glyph(prev),
                );
                p.last_cell = cell as i32;
            }
            true
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

pub struct BurstParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub intensity: f32,
    pub color: Rgb,
}

/// Full-grid ballistic burst: one particle per cell, triggered once per
/// session lifecycle. While it carries energy the field holds its intensity
/// snapshot and normal glyph/highlight rendering is suppressed.
pub struct ExplosionBurst {
    grid_size: usize,
    particles: Vec<BurstParticle>,
    started_at_ms: f64,
    active: bool,
}

impl ExplosionBurst {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            particles: Vec::new(),
            started_at_ms: 0.0,
            active: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn iter(&self) -> impl Iterator<Item = &BurstParticle> {
        self.particles.iter()
    }

    /// Turn every cell into a particle flying away from `origin_cell`.
    pub fn ignite(
        &mut self,
        origin_cell: usize,
        now_ms: f64,
        glyph: &GlyphData,
        rng: &mut StdRng,
        field: &mut IntensityField,
    ) {
        let n = self.grid_size;
        let origin = Vec2::new((origin_cell % n) as f32 + 0.5, (origin_cell / n) as f32 + 0.5);
        field.clear();
        self.particles.clear();
        self.particles.reserve(n * n);
        for cell in 0..n * n {
            let pos = Vec2::new((cell % n) as f32 + 0.5, (cell / n) as f32 + 0.5);
            let dir = (pos - origin).try_normalize().unwrap_or_else(|| {
                Vec2::from_angle(rng.gen::<f32>() * TAU)
            });
            let jitter = rng.gen_range(-BURST_JITTER_RAD..BURST_JITTER_RAD);
            let speed = rng.gen_range(BURST_SPEED_MIN..BURST_SPEED_MAX);
            let mut vel = Vec2::from_angle(jitter).rotate(dir) * speed;
            vel.y -= BURST_UP_BIAS * speed;
            let mask = glyph.mask[cell];
            let intensity = if mask > 0.0 {
                (mask * BURST_MASK_BOOST + BURST_MASK_BASE).min(1.0)
            } else {
                BURST_BACKGROUND_INTENSITY
            };
            self.particles.push(BurstParticle {
                pos,
                vel,
                intensity,
                color: glyph.color(cell),
            });
        }
        self.started_at_ms = now_ms;
        self.active = true;
        log::info!("[burst] ignited from cell {origin_cell}");
    }

    /// Advance one frame; returns whether the burst still carries energy.
    /// The defensive timeout ends it even if stray particles survive.
    pub fn advance(&mut self, delta: f32, now_ms: f64, field: &mut IntensityField) -> bool {
        if !self.active {
            return false;
        }
        if now_ms - self.started_at_ms >= BURST_TIMEOUT_MS {
            log::info!("[burst] timeout, returning to interactive mode");
            self.end(field);
            return false;
        }
        let n = self.grid_size as f32;
        let margin = n * BURST_BOUNDS_MARGIN;
        let drag = BURST_DRAG.powf(delta);
        let decay = BURST_DECAY.powf(delta);
        self.particles.retain_mut(|p| {
            p.vel.y += BURST_GRAVITY * delta;
            p.vel *= drag;
            p.pos += p.vel * delta;
            p.intensity *= decay;
            p.intensity >= BURST_INTENSITY_FLOOR
                && p.pos.x >= -margin
                && p.pos.y >= -margin
                && p.pos.x < n + margin
                && p.pos.y < n + margin
        });
        // Rebuild the field snapshot from survivors, max per cell.
        field.clear();
        for p in &self.particles {
            if p.pos.x >= 0.0 && p.pos.y >= 0.0 && p.pos.x < n && p.pos.y < n {
                let cell = p.pos.y as usize * self.grid_size + p.pos.x as usize;
                field.deposit(cell, p.intensity, false);
            }
        }
        if self.particles.is_empty() {
            self.end(field);
            return false;
        }
        true
    }

    fn end(&mut self, field: &mut IntensityField) {
        self.particles.clear();
        self.active = false;
        field.clear();
    }

    /// Immediate deactivation for teardown paths.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.active = false;
    }
}
