//! Pond world - owns every pill and fish plus the simulation clock

use crate::core::config::PondConfig;
use crate::core::timebase::{SimClock, SimTime, TimerQueue};
use crate::core::types::Vec2;
use crate::ecs::arena::{Arena, Handle};
use crate::entity::{Fish, Pill};
use crate::simulation::spawner::SpawnGate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Offspring waiting for the birth delay to elapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingBirth {
    pub color_idx: usize,
    /// Prey's last baseline position
    pub position: Vec2,
}

/// The pond simulation state
pub struct PondWorld {
    pub config: PondConfig,
    pub clock: SimClock,
    pub pills: Arena<Pill>,
    pub fish: Arena<Fish>,
    pub births: TimerQueue<PendingBirth>,
    pub spawner: SpawnGate,
    pub(crate) rng: ChaCha8Rng,
}

impl PondWorld {
    /// An empty pond; call `populate_initial` for the starting school
    pub fn new(config: PondConfig, seed: u64) -> Self {
        let clock = SimClock::new(config.tick_secs);
        Self {
            config,
            clock,
            pills: Arena::new(),
            fish: Arena::new(),
            births: TimerQueue::new(),
            spawner: SpawnGate::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create the initial fish, one per colour variant in order
    pub fn populate_initial(&mut self) {
        for i in 0..self.config.initial_fish {
            self.spawn_fish(i, None, None);
        }
        tracing::debug!("Populated pond with {} fish", self.config.initial_fish);
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Viewport visibility signal from the page; starts or stops spawning
    ///
    /// Water cues are only scheduled if `audio_ready` when the pond appears.
    pub fn set_visible(&mut self, visible: bool, audio_ready: bool) -> bool {
        let now = self.clock.now();
        self.spawner
            .set_visible(visible, audio_ready, now, &self.config, &mut self.rng)
    }

    pub fn live_pill_count(&self) -> usize {
        self.pills.iter().filter(|(_, p)| p.alive).count()
    }

    pub fn live_fish_count(&self) -> usize {
        self.fish.iter().filter(|(_, f)| f.alive).count()
    }

    /// Drop a random pill unless the pond is already over the cap
    pub fn spawn_pill(&mut self) -> Option<Handle> {
        if self.live_pill_count() > self.config.pill_cap {
            return None;
        }
        let pill = Pill::spawn(&mut self.rng, &self.config);
        Some(self.pills.insert(pill))
    }

    pub fn add_pill(&mut self, pill: Pill) -> Handle {
        self.pills.insert(pill)
    }

    pub fn spawn_fish(
        &mut self,
        color_idx: usize,
        position: Option<Vec2>,
        base_size: Option<f32>,
    ) -> Handle {
        let fish = Fish::spawn(&mut self.rng, &self.config, color_idx, position, base_size);
        self.fish.insert(fish)
    }

    pub fn add_fish(&mut self, fish: Fish) -> Handle {
        self.fish.insert(fish)
    }

    /// Free the slots of everything marked dead during the previous tick
    pub fn sweep_dead(&mut self) -> (usize, usize) {
        let pills = self.pills.retain(|p| p.alive);
        let fish = self.fish.retain(|f| f.alive);
        (pills, fish)
    }
}
