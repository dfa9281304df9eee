//! Simulation clock and delayed-timer queue
//!
//! The pond runs on one fixed-step clock advanced once per animation tick.
//! Everything that happens "later" (offspring appearing after a predation)
//! is parked in a `TimerQueue` keyed by simulated seconds and drained at the
//! start of the tick that reaches its due time.

use crate::core::types::Tick;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Simulated seconds
pub type SimTime = f64;

/// Fixed-step monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    tick: Tick,
    dt: f64,
}

impl SimClock {
    pub fn new(dt: f64) -> Self {
        Self { tick: 0, dt }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Seconds since the clock started
    pub fn now(&self) -> SimTime {
        self.tick as f64 * self.dt
    }

    pub fn advance(&mut self) -> SimTime {
        self.tick += 1;
        self.now()
    }

    /// Number of whole ticks covering `secs`, rounded up
    pub fn ticks_for(&self, secs: f64) -> u64 {
        if secs <= 0.0 {
            return 0;
        }
        (secs / self.dt).ceil() as u64
    }
}

struct Timer<T> {
    due: SimTime,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    // Reversed so the max-heap pops the earliest timer; seq keeps equal
    // due times in insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of payloads waiting for a simulated time
pub struct TimerQueue<T> {
    heap: BinaryHeap<Timer<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: SimTime, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer { due, seq, payload });
    }

    /// Remove and return every payload due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: SimTime) -> Vec<T> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|t| t.due <= now) {
            if let Some(timer) = self.heap.pop() {
                due.push(timer.payload);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
