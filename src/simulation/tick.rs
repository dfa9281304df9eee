//! Tick system - orchestrates one frame of the pond
//!
//! Order within a tick:
//! compaction -> clock -> due births -> spawning -> motion -> interactions
//!
//! Entities that die during a tick are only flagged; their slots are freed
//! at the start of the next tick so handles observed during a tick stay
//! valid for the whole of it.

use crate::ecs::world::PondWorld;
use crate::simulation::events::{EventLog, PondEvent, PondObserver};
use crate::simulation::interaction::{hatch_due_births, resolve_interactions};
use crate::simulation::motion;

/// Advance the pond by one tick
///
/// Every event is passed to `observer` as it is detected and the full list
/// is returned in detection order.
pub fn run_simulation_tick<O: PondObserver + ?Sized>(
    world: &mut PondWorld,
    observer: &mut O,
) -> Vec<PondEvent> {
    world.sweep_dead();
    let now = world.clock.advance();
    let mut log = EventLog::new(now, observer);

    hatch_due_births(world, &mut log);

    let actions = world.spawner.poll(now);
    for _ in 0..actions.pills {
        if let Some(pill) = world.spawn_pill() {
            tracing::debug!(?pill, "Pill dropped");
            log.emit(PondEvent::PillSpawned { pill });
        }
    }
    for _ in 0..actions.water_cues {
        log.emit(PondEvent::WaterCue);
    }

    let t = now as f32;
    for (handle, pill) in world.pills.iter_mut() {
        if !pill.alive {
            continue;
        }
        if motion::update_pill(pill, t, &world.config) {
            pill.alive = false;
            log.emit(PondEvent::PillExpired { pill: handle });
        }
    }
    for (_, fish) in world.fish.iter_mut() {
        if fish.alive {
            motion::update_fish(fish, t, &world.config, &mut world.rng);
        }
    }

    resolve_interactions(world, &mut log);

    log.events
}
