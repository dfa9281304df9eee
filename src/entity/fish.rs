//! Fish entity: swims sideways on a fixed baseline, grows by eating pills

use crate::core::config::PondConfig;
use crate::core::types::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Number of fish colour variants; colour indices wrap modulo this
pub const FISH_VARIANTS: usize = 8;

/// Growth at which a fish becomes a predator
pub const PREDATOR_GROWTH: f32 = 1.0;

/// Offset of the mouth from the fish centre, in unscaled pixels
pub const MOUTH_OFFSET: Vec2 = Vec2 { x: 30.0, y: 15.0 };

/// Pill eat radius, in unscaled pixels
pub const PILL_EAT_RADIUS: f32 = 25.0;

/// Prey eat radius, in unscaled predator pixels
pub const PREY_EAT_RADIUS: f32 = 35.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Fish {
    /// `x` moves every tick; `y` is the fixed swimming baseline
    pub position: Vec2,
    /// Per-tick horizontal velocity; sign is swim direction
    pub vx: f32,
    pub phase: f32,
    pub freq: f32,
    pub amplitude: f32,
    pub base_size: f32,
    /// 0 = normal size, 1 = double size and predator
    pub growth: f32,
    pub color_idx: usize,
    pub alive: bool,
    /// Vertical offset from the baseline as of the last motion update
    pub bob_offset: f32,
}

impl Fish {
    pub fn new(position: Vec2, vx: f32, base_size: f32, color_idx: usize) -> Self {
        Self {
            position,
            vx,
            phase: 0.0,
            freq: 0.0,
            amplitude: 0.0,
            base_size,
            growth: 0.0,
            color_idx: color_idx % FISH_VARIANTS,
            alive: true,
            bob_offset: 0.0,
        }
    }

    /// A fish with randomised swim parameters
    ///
    /// `position` and `base_size` default to random draws from the pond
    /// config when not given (offspring pass both).
    pub fn spawn(
        rng: &mut impl Rng,
        config: &PondConfig,
        color_idx: usize,
        position: Option<Vec2>,
        base_size: Option<f32>,
    ) -> Self {
        let position = position.unwrap_or_else(|| {
            let (lo, hi) = config.fish_baseline_y;
            Vec2::new(
                rng.gen::<f32>() * config.width,
                lo + rng.gen::<f32>() * (hi - lo),
            )
        });
        let base_size = base_size.unwrap_or_else(|| {
            let (lo, hi) = config.fish_base_size;
            lo + rng.gen::<f32>() * (hi - lo)
        });
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let vx = draw_speed(rng, config) * direction;
        let (freq_lo, freq_hi) = config.fish_bob_freq;
        let (amp_lo, amp_hi) = config.fish_bob_amplitude;

        Self {
            position,
            vx,
            phase: rng.gen::<f32>() * TAU,
            freq: freq_lo + rng.gen::<f32>() * (freq_hi - freq_lo),
            amplitude: amp_lo + rng.gen::<f32>() * (amp_hi - amp_lo),
            base_size,
            growth: 0.0,
            color_idx: color_idx % FISH_VARIANTS,
            alive: true,
            bob_offset: 0.0,
        }
    }

    /// Rendered scale: up to double the base size at full growth
    pub fn scale(&self) -> f32 {
        self.base_size * (1.0 + self.growth)
    }

    pub fn is_predator(&self) -> bool {
        self.growth >= PREDATOR_GROWTH
    }

    /// Centre including the current bob offset
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y + self.bob_offset)
    }

    pub fn mouth(&self) -> Vec2 {
        self.center() + MOUTH_OFFSET * self.scale()
    }

    pub fn facing_right(&self) -> bool {
        self.vx > 0.0
    }
}

/// Fresh speed magnitude from the configured range
pub fn draw_speed(rng: &mut impl Rng, config: &PondConfig) -> f32 {
    let (lo, hi) = config.fish_speed;
    lo + rng.gen::<f32>() * (hi - lo)
}
