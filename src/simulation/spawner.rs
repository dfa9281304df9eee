//! Visibility gate for pill spawning and ambient water cues
//!
//! While the pond region is on screen, pills drop on a fixed interval (drawn
//! once per visible stretch) and a water cue fires on its own interval.
//! Scrolling the pond into view also drops a small burst of pills at once.
//! Scrolling it out stops both timers.
//!
//! The water timer only starts if audio was already unlocked when the pond
//! came into view; unlocking later leaves it off until the next reveal.

use crate::core::config::PondConfig;
use crate::core::timebase::SimTime;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: f64,
    next_due: SimTime,
}

impl Interval {
    fn start(now: SimTime, period: f64) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Number of periods elapsed by `now`, advancing the schedule
    fn fire_count(&mut self, now: SimTime) -> usize {
        let mut fired = 0;
        while self.next_due <= now {
            fired += 1;
            self.next_due += self.period;
        }
        fired
    }
}

/// What the spawner wants done this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnActions {
    pub pills: usize,
    pub water_cues: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnGate {
    visible: bool,
    pills: Option<Interval>,
    water: Option<Interval>,
    burst: usize,
}

impl SpawnGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visibility change. Returns false if nothing changed.
    pub fn set_visible(
        &mut self,
        visible: bool,
        audio_ready: bool,
        now: SimTime,
        config: &PondConfig,
        rng: &mut impl Rng,
    ) -> bool {
        if visible == self.visible {
            return false;
        }
        self.visible = visible;

        if visible {
            let (lo, hi) = config.pill_spawn_interval;
            self.pills = Some(Interval::start(now, rng.gen_range(lo..=hi)));
            if audio_ready {
                let (lo, hi) = config.water_cue_interval;
                self.water = Some(Interval::start(now, rng.gen_range(lo..=hi)));
            }
            self.burst = config.pill_initial_burst;
            tracing::info!(audio_ready, "Pond visible, spawning started");
        } else {
            self.pills = None;
            self.water = None;
            self.burst = 0;
            tracing::info!("Pond hidden, spawning stopped");
        }
        true
    }

    pub fn poll(&mut self, now: SimTime) -> SpawnActions {
        if !self.visible {
            return SpawnActions::default();
        }
        let burst = std::mem::take(&mut self.burst);
        SpawnActions {
            pills: burst + self.pills.as_mut().map_or(0, |i| i.fire_count(now)),
            water_cues: self.water.as_mut().map_or(0, |i| i.fire_count(now)),
        }
    }
}
