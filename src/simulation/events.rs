//! Events raised by the pond during a tick
//!
//! Each event is handed to the tick's `PondObserver` the moment it is
//! detected, then returned in the tick's event list for UI collaborators.

use crate::core::timebase::SimTime;
use crate::core::types::Vec2;
use crate::ecs::arena::Handle;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PondEvent {
    /// A pill was dropped by the spawner
    PillSpawned { pill: Handle },
    /// A pill sank past the terminal depth
    PillExpired { pill: Handle },
    /// A fish swallowed a pill
    PillEaten {
        fish: Handle,
        pill: Handle,
        /// Growth after the meal
        growth: f32,
    },
    /// A fish reached full growth
    BecamePredator { fish: Handle },
    /// A predator swallowed a smaller fish
    PreyEaten {
        predator: Handle,
        prey: Handle,
        prey_color: usize,
        prey_position: Vec2,
    },
    /// Two offspring appeared where a prey fish was eaten
    OffspringBorn { color_idx: usize, offspring: [Handle; 2] },
    /// The ambient water interval elapsed while the pond is on screen
    WaterCue,
}

impl PondEvent {
    /// Short stable name for logs and summaries
    pub fn name(&self) -> &'static str {
        match self {
            PondEvent::PillSpawned { .. } => "pill_spawned",
            PondEvent::PillExpired { .. } => "pill_expired",
            PondEvent::PillEaten { .. } => "pill_eaten",
            PondEvent::BecamePredator { .. } => "became_predator",
            PondEvent::PreyEaten { .. } => "prey_eaten",
            PondEvent::OffspringBorn { .. } => "offspring_born",
            PondEvent::WaterCue => "water_cue",
        }
    }
}

/// Reacts to pond events synchronously with their detection
pub trait PondObserver {
    fn on_event(&mut self, now: SimTime, event: &PondEvent);
}

/// Discards every event
impl PondObserver for () {
    fn on_event(&mut self, _now: SimTime, _event: &PondEvent) {}
}

/// Collects events, in detection order
impl PondObserver for Vec<PondEvent> {
    fn on_event(&mut self, _now: SimTime, event: &PondEvent) {
        self.push(event.clone());
    }
}

/// Event sink used inside a tick: notifies the observer and records the event
pub(crate) struct EventLog<'a, O: PondObserver + ?Sized> {
    pub now: SimTime,
    pub observer: &'a mut O,
    pub events: Vec<PondEvent>,
}

impl<'a, O: PondObserver + ?Sized> EventLog<'a, O> {
    pub fn new(now: SimTime, observer: &'a mut O) -> Self {
        Self {
            now,
            observer,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: PondEvent) {
        self.observer.on_event(self.now, &event);
        self.events.push(event);
    }
}
