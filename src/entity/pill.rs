//! Pill entity: falls from above the surface, then bobs at mid-depth

use crate::core::config::PondConfig;
use crate::core::types::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Number of pill colour variants a renderer is expected to provide
pub const PILL_VARIANTS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Pill {
    pub position: Vec2,
    /// Per-tick fall velocity; only used while falling
    pub velocity: Vec2,
    pub wobble_phase: f32,
    /// Set once on crossing mid-depth, never cleared
    pub bobbing: bool,
    /// Centre of the bob; only increases
    pub bob_anchor: f32,
    pub bob_phase: f32,
    pub color_idx: usize,
    pub alive: bool,
}

impl Pill {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            wobble_phase: 0.0,
            bobbing: false,
            bob_anchor: 0.0,
            bob_phase: 0.0,
            color_idx: 0,
            alive: true,
        }
    }

    /// A fresh pill dropped at a random x above the pond surface
    pub fn spawn(rng: &mut impl Rng, config: &PondConfig) -> Self {
        let span = (config.width - 80.0).max(0.0);
        let (lo, hi) = config.pill_fall_speed;
        Self {
            position: Vec2::new(40.0 + rng.gen::<f32>() * span, config.pill_spawn_y),
            velocity: Vec2::new(
                (rng.gen::<f32>() - 0.5) * config.pill_drift,
                lo + rng.gen::<f32>() * (hi - lo),
            ),
            wobble_phase: rng.gen::<f32>() * TAU,
            bobbing: false,
            bob_anchor: 0.0,
            bob_phase: rng.gen::<f32>() * TAU,
            color_idx: rng.gen_range(0..PILL_VARIANTS),
            alive: true,
        }
    }

    /// The depth that decides expiry: the anchor once bobbing, raw y before
    pub fn depth(&self) -> f32 {
        if self.bobbing {
            self.bob_anchor
        } else {
            self.position.y
        }
    }

    /// Visual tilt in degrees
    pub fn rotation_deg(&self, t: f32) -> f32 {
        (t * 1.5 + self.wobble_phase).sin() * 15.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_within_bounds() {
        let config = PondConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let pill = Pill::spawn(&mut rng, &config);
            assert!(pill.position.x >= 40.0 && pill.position.x <= config.width - 40.0);
            assert_eq!(pill.position.y, config.pill_spawn_y);
            assert!(pill.velocity.y >= 0.3 && pill.velocity.y <= 0.7);
            assert!(pill.velocity.x.abs() <= 0.15);
            assert!(!pill.bobbing);
            assert!(pill.color_idx < PILL_VARIANTS);
        }
    }

    #[test]
    fn test_depth_switches_to_anchor_when_bobbing() {
        let mut pill = Pill::new(Vec2::new(0.0, 50.0), Vec2::default());
        assert_eq!(pill.depth(), 50.0);
        pill.bobbing = true;
        pill.bob_anchor = 101.0;
        pill.position.y = 90.0;
        assert_eq!(pill.depth(), 101.0);
    }
}
