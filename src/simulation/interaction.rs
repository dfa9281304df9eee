//! Collision and interaction engine
//!
//! Runs once per tick after motion. Every live fish first eats any pill near
//! its mouth, then, if it is a predator, hunts smaller fish. Both checks run
//! for the same fish in the same tick, so a meal that completes growth lets
//! the fish hunt straight away.

use crate::core::types::Vec2;
use crate::ecs::arena::Handle;
use crate::ecs::world::{PendingBirth, PondWorld};
use crate::entity::fish::{PILL_EAT_RADIUS, PREY_EAT_RADIUS};
use crate::entity::{Fish, Pill};
use crate::simulation::events::{EventLog, PondEvent, PondObserver};
use crate::simulation::growth::{self, GrowthTransition};

/// Pill within the eat radius of the fish's mouth
pub fn pill_in_reach(fish: &Fish, pill: &Pill) -> bool {
    let reach = PILL_EAT_RADIUS * fish.scale();
    fish.mouth().distance_sq(&pill.position) < reach * reach
}

/// Prey centre within the predator's eat radius (both including bob offset)
pub fn prey_in_reach(predator: &Fish, prey: &Fish) -> bool {
    let reach = PREY_EAT_RADIUS * predator.scale();
    predator.center().distance_sq(&prey.center()) < reach * reach
}

pub(crate) fn resolve_interactions<O: PondObserver + ?Sized>(
    world: &mut PondWorld,
    log: &mut EventLog<'_, O>,
) {
    for handle in world.fish.handles() {
        if !world.fish.get(handle).is_some_and(|f| f.alive) {
            continue;
        }
        eat_pills(world, handle, log);
        hunt(world, handle, log);
    }
}

fn eat_pills<O: PondObserver + ?Sized>(
    world: &mut PondWorld,
    fish_handle: Handle,
    log: &mut EventLog<'_, O>,
) {
    // Reach is fixed for the whole pass even if a meal grows the fish
    let Some(fish) = world.fish.get(fish_handle).cloned() else {
        return;
    };
    let step = world.config.growth_per_pill;

    for pill_handle in world.pills.handles() {
        let Some(pill) = world.pills.get_mut(pill_handle) else {
            continue;
        };
        if !pill.alive || !pill_in_reach(&fish, pill) {
            continue;
        }
        pill.alive = false;

        let Some(eater) = world.fish.get_mut(fish_handle) else {
            return;
        };
        let transition = growth::feed(eater, step);
        let growth = eater.growth;
        tracing::debug!(?fish_handle, growth, "Fish ate a pill");

        log.emit(PondEvent::PillEaten {
            fish: fish_handle,
            pill: pill_handle,
            growth,
        });
        if transition == GrowthTransition::BecamePredator {
            tracing::debug!(?fish_handle, "Fish became a predator");
            log.emit(PondEvent::BecamePredator { fish: fish_handle });
        }
    }
}

fn hunt<O: PondObserver + ?Sized>(
    world: &mut PondWorld,
    predator: Handle,
    log: &mut EventLog<'_, O>,
) {
    for prey_handle in world.fish.handles() {
        if prey_handle == predator {
            continue;
        }
        // Re-checked per candidate: a kill halves growth and ends the hunt
        let Some(hunter) = world.fish.get(predator) else {
            return;
        };
        if !hunter.alive || !hunter.is_predator() {
            return;
        }
        let Some(prey) = world.fish.get(prey_handle) else {
            continue;
        };
        if !prey.alive || prey.is_predator() || !prey_in_reach(hunter, prey) {
            continue;
        }

        let prey_color = prey.color_idx;
        let prey_position = prey.position;
        if let Some(prey) = world.fish.get_mut(prey_handle) {
            prey.alive = false;
        }

        let due = log.now + world.config.birth_delay_secs;
        world.births.schedule(
            due,
            PendingBirth {
                color_idx: prey_color,
                position: prey_position,
            },
        );

        if let Some(hunter) = world.fish.get_mut(predator) {
            growth::spend_on_hunt(hunter);
        }
        tracing::debug!(?predator, ?prey_handle, "Predator ate a fish");

        log.emit(PondEvent::PreyEaten {
            predator,
            prey: prey_handle,
            prey_color,
            prey_position,
        });
    }
}

/// Create offspring for every predation whose birth delay has elapsed
pub(crate) fn hatch_due_births<O: PondObserver + ?Sized>(
    world: &mut PondWorld,
    log: &mut EventLog<'_, O>,
) {
    let spread = world.config.offspring_spread;
    let size = world.config.offspring_base_size;

    for birth in world.births.drain_due(log.now) {
        let Vec2 { x, y } = birth.position;
        let left = world.spawn_fish(birth.color_idx, Some(Vec2::new(x - spread, y)), Some(size));
        let right = world.spawn_fish(birth.color_idx, Some(Vec2::new(x + spread, y)), Some(size));
        tracing::debug!(color = birth.color_idx, "Two offspring born");

        log.emit(PondEvent::OffspringBorn {
            color_idx: birth.color_idx,
            offspring: [left, right],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PondConfig;

    fn still_fish(x: f32, y: f32, base_size: f32) -> Fish {
        Fish::new(Vec2::new(x, y), 0.0, base_size, 0)
    }

    #[test]
    fn test_pill_reach_uses_mouth_offset() {
        let fish = still_fish(100.0, 50.0, 1.0);
        // mouth is at (130, 65)
        let near = Pill::new(Vec2::new(130.0, 65.0 + 24.0), Vec2::default());
        let far = Pill::new(Vec2::new(130.0, 65.0 + 25.0), Vec2::default());
        assert!(pill_in_reach(&fish, &near));
        assert!(!pill_in_reach(&fish, &far), "threshold is strict");
    }

    #[test]
    fn test_prey_reach_scales_with_predator() {
        let mut predator = still_fish(0.0, 50.0, 1.0);
        let prey = still_fish(60.0, 50.0, 1.0);
        assert!(!prey_in_reach(&predator, &prey));
        predator.growth = 1.0;
        assert!(prey_in_reach(&predator, &prey));
    }

    #[test]
    fn test_prey_reach_includes_bob_offsets() {
        let predator = still_fish(0.0, 50.0, 1.0);
        let mut prey = still_fish(0.0, 50.0, 1.0);
        prey.bob_offset = 40.0;
        assert!(!prey_in_reach(&predator, &prey));
    }

    #[test]
    fn test_hunt_kills_one_prey_and_halves_growth() {
        let mut world = PondWorld::new(PondConfig::default(), 0);
        let mut hunter = still_fish(100.0, 50.0, 1.0);
        hunter.growth = 1.0;
        let hunter = world.add_fish(hunter);
        let prey_a = world.add_fish(still_fish(110.0, 50.0, 1.0));
        let prey_b = world.add_fish(still_fish(90.0, 50.0, 1.0));

        let mut sink = ();
        let mut log = EventLog::new(1.0, &mut sink);
        hunt(&mut world, hunter, &mut log);

        assert_eq!(world.fish.get(hunter).unwrap().growth, 0.5);
        assert!(!world.fish.get(prey_a).unwrap().alive);
        assert!(world.fish.get(prey_b).unwrap().alive, "halved predator stops hunting");
        assert_eq!(world.births.len(), 1);
        assert_eq!(log.events.len(), 1);
    }

    #[test]
    fn test_predators_do_not_eat_each_other() {
        let mut world = PondWorld::new(PondConfig::default(), 0);
        let mut a = still_fish(100.0, 50.0, 1.0);
        a.growth = 1.0;
        let b = a.clone();
        let a = world.add_fish(a);
        let b = world.add_fish(b);

        let mut sink = ();
        let mut log = EventLog::new(1.0, &mut sink);
        hunt(&mut world, a, &mut log);

        assert!(world.fish.get(b).unwrap().alive);
        assert_eq!(world.fish.get(a).unwrap().growth, 1.0);
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_births_wait_for_their_delay() {
        let mut world = PondWorld::new(PondConfig::default(), 0);
        world.births.schedule(
            1.3,
            PendingBirth {
                color_idx: 5,
                position: Vec2::new(200.0, 80.0),
            },
        );

        let mut sink = ();
        let mut early = EventLog::new(1.2, &mut sink);
        hatch_due_births(&mut world, &mut early);
        assert!(world.fish.is_empty());

        let mut sink = ();
        let mut due = EventLog::new(1.3, &mut sink);
        hatch_due_births(&mut world, &mut due);
        assert_eq!(world.fish.len(), 2);

        let mut xs: Vec<f32> = world.fish.iter().map(|(_, f)| f.position.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(xs, vec![180.0, 220.0]);
        for (_, baby) in world.fish.iter() {
            assert_eq!(baby.color_idx, 5);
            assert_eq!(baby.base_size, 0.5);
            assert_eq!(baby.position.y, 80.0);
        }
    }
}
