//! Cooldown gate for the pill-eating narration
//!
//! Fish eat often; the narrator should not. A trigger only produces a line
//! when the cooldown has elapsed since the last line and nothing else is
//! being said. Lines rotate in order.

use crate::core::config::NarrationConfig;
use crate::core::timebase::SimTime;

#[derive(Debug, Clone)]
pub struct NarrationGate {
    cooldown: f64,
    lines: Vec<String>,
    next_line: usize,
    last_fired: Option<SimTime>,
}

impl NarrationGate {
    pub fn new(config: &NarrationConfig) -> Self {
        Self {
            cooldown: config.cooldown_secs,
            lines: config.lines.clone(),
            next_line: 0,
            last_fired: None,
        }
    }

    /// Offer a trigger at `now`. Returns the line to speak, if any.
    ///
    /// The cooldown only restarts when a line is actually handed out.
    pub fn trigger(&mut self, now: SimTime, voice_busy: bool) -> Option<String> {
        if voice_busy || self.lines.is_empty() {
            return None;
        }
        if let Some(last) = self.last_fired {
            if now - last < self.cooldown {
                return None;
            }
        }

        let line_idx = self.next_line;
        self.next_line = (line_idx + 1) % self.lines.len();
        self.last_fired = Some(now);
        tracing::debug!(line_idx, "Narration fired");
        let line = self.lines[line_idx].clone();
        Some(line)
    }

    pub fn last_fired(&self) -> Option<SimTime> {
        self.last_fired
    }
}
