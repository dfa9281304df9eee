//! Shared audio output
//!
//! Every cue and voice goes to one sink. Overlapping sounds are summed with
//! no priority scheme; the bus only clamps the final mix.

use crate::audio::cues::{CueBuffer, CueKind};
use std::collections::BTreeMap;

/// Anything that can take a rendered cue and play it right away
pub trait AudioSink {
    fn play(&mut self, cue: CueBuffer);
}

/// Discards everything
impl AudioSink for () {
    fn play(&mut self, _cue: CueBuffer) {}
}

struct ActiveVoice {
    samples: Vec<f32>,
    cursor: usize,
}

/// Additive mixer pulled by the output device one block at a time
#[derive(Default)]
pub struct MixBus {
    voices: Vec<ActiveVoice>,
    played: BTreeMap<CueKind, u64>,
}

impl MixBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds still ringing
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// How many times each cue has been started
    pub fn played(&self) -> &BTreeMap<CueKind, u64> {
        &self.played
    }

    pub fn played_count(&self, kind: CueKind) -> u64 {
        self.played.get(&kind).copied().unwrap_or(0)
    }

    /// Fill `out` with the sum of every active voice; finished voices are dropped
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for voice in &mut self.voices {
            let remaining = &voice.samples[voice.cursor..];
            for (o, s) in out.iter_mut().zip(remaining) {
                *o += *s;
            }
            voice.cursor = (voice.cursor + out.len()).min(voice.samples.len());
        }
        self.voices.retain(|v| v.cursor < v.samples.len());
        for o in out.iter_mut() {
            *o = o.clamp(-1.0, 1.0);
        }
    }
}

impl AudioSink for MixBus {
    fn play(&mut self, cue: CueBuffer) {
        *self.played.entry(cue.kind).or_insert(0) += 1;
        if !cue.samples.is_empty() {
            self.voices.push(ActiveVoice {
                samples: cue.samples,
                cursor: 0,
            });
        }
    }
}
