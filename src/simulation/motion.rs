//! Per-entity motion rules
//!
//! Pills fall with a soft deceleration toward mid-depth, then bob around a
//! slowly sinking anchor. Fish move at constant horizontal speed, turn around
//! past either edge, and carry a purely sinusoidal vertical offset.

use crate::core::config::PondConfig;
use crate::entity::fish::{draw_speed, Fish};
use crate::entity::Pill;
use rand::Rng;

/// Slowest a falling pill gets as it nears mid-depth, as a fraction of its speed
const MIN_DECEL: f32 = 0.15;

/// Advance one pill by one tick. Returns true if it sank out of the pond.
pub fn update_pill(pill: &mut Pill, t: f32, config: &PondConfig) -> bool {
    if !pill.bobbing {
        let decel = (1.0 - (pill.position.y / config.mid_depth) * 0.85).max(MIN_DECEL);
        pill.position.y += pill.velocity.y * decel;
        pill.position.x += pill.velocity.x + (t * 2.0 + pill.wobble_phase).sin() * 0.3;

        if pill.position.y >= config.mid_depth {
            pill.bobbing = true;
            pill.bob_anchor = pill.position.y;
        }
    } else {
        pill.position.y =
            pill.bob_anchor + (t * 0.8 + pill.bob_phase).sin() * config.bob_amplitude;
        pill.position.x += (t * 0.5 + pill.wobble_phase).sin() * 0.2;
        pill.bob_anchor += config.bob_drift;
    }

    pill.depth() > config.terminal_depth
}

/// Advance one fish by one tick
pub fn update_fish(fish: &mut Fish, t: f32, config: &PondConfig, rng: &mut impl Rng) {
    fish.position.x += fish.vx;
    fish.bob_offset = (t * fish.freq + fish.phase).sin() * fish.amplitude;

    if fish.position.x > config.width + config.edge_margin {
        fish.vx = -draw_speed(rng, config);
    } else if fish.position.x < -config.edge_margin {
        fish.vx = draw_speed(rng, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn falling_pill(y: f32) -> Pill {
        Pill::new(Vec2::new(100.0, y), Vec2::new(0.0, 0.5))
    }

    #[test]
    fn test_fall_slows_toward_mid_depth() {
        let config = PondConfig::default();
        let mut shallow = falling_pill(0.0);
        let mut deep = falling_pill(90.0);
        update_pill(&mut shallow, 0.0, &config);
        update_pill(&mut deep, 0.0, &config);

        assert!((shallow.position.y - 0.5).abs() < 1e-6);
        // decel at y=90 is max(0.15, 1 - 0.765) = 0.235
        assert!((deep.position.y - (90.0 + 0.5 * 0.235)).abs() < 1e-4);
    }

    #[test]
    fn test_switches_to_bobbing_at_mid_depth() {
        let config = PondConfig::default();
        let mut pill = falling_pill(99.95);
        update_pill(&mut pill, 0.0, &config);
        assert!(pill.bobbing);
        assert_eq!(pill.bob_anchor, pill.position.y);
        assert!(pill.bob_anchor >= config.mid_depth);
    }

    #[test]
    fn test_bob_anchor_drifts_down() {
        let config = PondConfig::default();
        let mut pill = falling_pill(0.0);
        pill.bobbing = true;
        pill.bob_anchor = 120.0;

        update_pill(&mut pill, 1.0, &config);
        assert!((pill.bob_anchor - 120.03).abs() < 1e-4);
        assert!((pill.position.y - 120.0).abs() <= config.bob_amplitude + 1e-4);
    }

    #[test]
    fn test_expires_past_terminal_depth() {
        let config = PondConfig::default();

        let mut sinking = falling_pill(0.0);
        sinking.bobbing = true;
        sinking.bob_anchor = config.terminal_depth - 0.01;
        assert!(update_pill(&mut sinking, 0.0, &config));

        // Deep but never flagged: decel floors out and the anchor lands past the bound
        let mut fast = Pill::new(Vec2::new(0.0, 229.0), Vec2::new(0.0, 100.0));
        assert!(update_pill(&mut fast, 0.0, &config));
        assert!(fast.bobbing);
    }

    #[test]
    fn test_fish_turns_at_right_edge() {
        let config = PondConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fish = Fish::new(Vec2::new(config.width + config.edge_margin, 50.0), 2.0, 1.0, 0);
        update_fish(&mut fish, 0.0, &config, &mut rng);
        assert!(fish.vx < 0.0);
        assert!(fish.vx.abs() >= 1.0 && fish.vx.abs() <= 2.5);
    }

    #[test]
    fn test_fish_turns_at_left_edge() {
        let config = PondConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fish = Fish::new(Vec2::new(-config.edge_margin, 50.0), -1.5, 1.0, 0);
        update_fish(&mut fish, 0.0, &config, &mut rng);
        assert!(fish.vx > 0.0);
    }

    #[test]
    fn test_fish_bob_is_not_integrated() {
        let config = PondConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fish = Fish::new(Vec2::new(100.0, 60.0), 1.0, 1.0, 0);
        fish.freq = 0.5;
        fish.amplitude = 20.0;

        for step in 0..100 {
            update_fish(&mut fish, step as f32 * 0.1, &config, &mut rng);
            assert_eq!(fish.position.y, 60.0);
            assert!(fish.bob_offset.abs() <= 20.0);
        }
    }
}
