//! Integration tests for the pond lifecycle
//!
//! These tests drive whole ticks through the public API:
//! - A falling pill reaching a fish's mouth
//! - Predation, growth halving and delayed offspring
//! - Cue dispatch synchronous with detection
//! - Deterministic replays from a seed

use pondlife::audio::{CueKind, MixBus};
use pondlife::core::config::PondConfig;
use pondlife::core::types::Vec2;
use pondlife::ecs::PondWorld;
use pondlife::entity::{Fish, Pill};
use pondlife::simulation::{run_simulation_tick, PondEvent};
use pondlife::speech::VoiceSet;
use pondlife::{Overlay, OverlayConfig};
use tokio::runtime::Handle;

fn empty_config() -> OverlayConfig {
    let mut config = OverlayConfig::default();
    config.pond.initial_fish = 0;
    config
}

#[tokio::test]
async fn test_falling_pill_is_eaten_once() {
    let mut overlay: Overlay<MixBus> = Overlay::new(
        empty_config(),
        MixBus::new(),
        VoiceSet::none(),
        (),
        Handle::current(),
        11,
    )
    .unwrap();
    overlay.unlock_audio();

    // Parked fish whose mouth sits at (400, 100); reach is 25 * 2 = 50
    let fish = overlay
        .world_mut()
        .add_fish(Fish::new(Vec2::new(340.0, 70.0), 0.0, 2.0, 3));
    let pill = overlay
        .world_mut()
        .add_pill(Pill::new(Vec2::new(400.0, 0.0), Vec2::new(0.0, 1.0)));

    let mut eaten = Vec::new();
    for _ in 0..400 {
        for event in overlay.tick() {
            if let PondEvent::PillEaten { fish: f, pill: p, growth } = event {
                eaten.push((f, p, growth));
            }
        }
    }

    assert_eq!(eaten.len(), 1, "exactly one meal");
    assert_eq!(eaten[0].0, fish);
    assert_eq!(eaten[0].1, pill);
    assert!(!overlay.world().pills.contains(pill), "pill slot freed");
    assert_eq!(overlay.world().fish.get(fish).unwrap().growth, 0.2);
    assert_eq!(overlay.audio().sink().played_count(CueKind::Eat), 1);
}

#[test]
fn test_predator_eats_neighbour_and_offspring_follow() {
    let mut world = PondWorld::new(PondConfig::default(), 5);
    let mut hunter = Fish::new(Vec2::new(400.0, 100.0), 0.0, 1.0, 0);
    hunter.growth = 1.0;
    let hunter = world.add_fish(hunter);
    // 30px away; predator reach is 35 * 2 = 70
    let prey = world.add_fish(Fish::new(Vec2::new(430.0, 100.0), 0.0, 1.0, 5));

    let events = run_simulation_tick(&mut world, &mut ());
    assert!(events
        .iter()
        .any(|e| matches!(e, PondEvent::PreyEaten { prey: p, .. } if *p == prey)));
    assert!(!world.fish.get(prey).unwrap().alive);
    assert_eq!(world.fish.get(hunter).unwrap().growth, 0.5);
    assert!(!world.fish.get(hunter).unwrap().is_predator());

    let mut offspring = Vec::new();
    for _ in 0..60 {
        for event in run_simulation_tick(&mut world, &mut ()) {
            if let PondEvent::OffspringBorn { offspring: babies, color_idx } = event {
                assert_eq!(color_idx, 5);
                offspring.extend(babies);
            }
        }
    }

    assert_eq!(offspring.len(), 2);
    let xs: Vec<f32> = offspring
        .iter()
        .map(|h| world.fish.get(*h).unwrap().position.x)
        .collect();
    // Parked prey at 430: babies start 20px either side, then swim
    assert!(xs.iter().all(|x| (x - 430.0).abs() < 20.0 + 2.5 * 60.0));
    for baby in &offspring {
        let baby = world.fish.get(*baby).unwrap();
        assert_eq!(baby.color_idx, 5);
        assert_eq!(baby.base_size, 0.5);
        assert_eq!(baby.growth, 0.0);
        assert_eq!(baby.position.y, 100.0);
    }
    assert_eq!(world.live_fish_count(), 3);
}

#[test]
fn test_predators_do_not_eat_each_other() {
    let mut world = PondWorld::new(PondConfig::default(), 5);
    for x in [400.0, 410.0] {
        let mut big = Fish::new(Vec2::new(x, 100.0), 0.0, 1.0, 0);
        big.growth = 1.0;
        world.add_fish(big);
    }
    for _ in 0..10 {
        let events = run_simulation_tick(&mut world, &mut ());
        assert!(events.is_empty());
    }
    assert_eq!(world.live_fish_count(), 2);
}

#[test]
fn test_predator_stays_predator_without_prey() {
    let mut world = PondWorld::new(PondConfig::default(), 5);
    let mut big = Fish::new(Vec2::new(100.0, 100.0), 1.0, 1.0, 0);
    big.growth = 1.0;
    let big = world.add_fish(big);
    for _ in 0..600 {
        run_simulation_tick(&mut world, &mut ());
        assert_eq!(world.fish.get(big).unwrap().growth, 1.0);
    }
}

#[test]
fn test_hidden_pond_drops_no_pills() {
    let mut world = PondWorld::new(PondConfig::default(), 9);
    world.populate_initial();
    for _ in 0..600 {
        run_simulation_tick(&mut world, &mut ());
    }
    assert_eq!(world.live_pill_count(), 0);
}

#[test]
fn test_visible_pond_respects_pill_cap() {
    let config = PondConfig {
        pill_spawn_interval: (0.1, 0.1),
        initial_fish: 0,
        ..PondConfig::default()
    };
    let mut world = PondWorld::new(config, 9);
    world.set_visible(true, true);
    for _ in 0..1200 {
        run_simulation_tick(&mut world, &mut ());
        assert!(world.live_pill_count() <= world.config.pill_cap + 1);
    }
    assert!(world.live_pill_count() > 0);
}

#[test]
fn test_same_seed_replays_identically() {
    let run = |seed: u64| {
        let mut world = PondWorld::new(PondConfig::default(), seed);
        world.populate_initial();
        world.set_visible(true, true);
        let mut log = Vec::new();
        for _ in 0..1800 {
            log.extend(run_simulation_tick(&mut world, &mut ()));
        }
        let fish: Vec<Fish> = world.fish.iter().map(|(_, f)| f.clone()).collect();
        (log, fish)
    };
    assert_eq!(run(77), run(77));
}
