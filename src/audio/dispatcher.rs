//! Unlock-gated cue playback
//!
//! Browsers and most audio hosts refuse output until a user gesture. The
//! dispatcher stays silent until `unlock` is called, then synthesizes each
//! requested cue fresh and hands it to the sink.

use crate::audio::cues::{synthesize, CueKind};
use crate::audio::sink::AudioSink;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct AudioCueDispatcher<S: AudioSink> {
    sink: S,
    sample_rate: u32,
    unlocked: bool,
    rng: ChaCha8Rng,
}

impl<S: AudioSink> AudioCueDispatcher<S> {
    pub fn new(sink: S, sample_rate: u32, seed: u64) -> Self {
        Self {
            sink,
            sample_rate,
            unlocked: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Enable output. Returns true only on the call that actually unlocked.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        tracing::info!(sample_rate = self.sample_rate, "Audio unlocked");
        true
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Play a cue. Silently ignored while locked.
    pub fn fire(&mut self, kind: CueKind) -> bool {
        if !self.unlocked {
            tracing::trace!(?kind, "Cue dropped, audio locked");
            return false;
        }
        let cue = synthesize(kind, self.sample_rate, &mut self.rng);
        self.sink.play(cue);
        true
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::MixBus;

    #[test]
    fn test_locked_dispatcher_is_silent() {
        let mut audio = AudioCueDispatcher::new(MixBus::new(), 8000, 0);
        assert!(!audio.fire(CueKind::Eat));
        assert_eq!(audio.sink().played_count(CueKind::Eat), 0);
        assert_eq!(audio.sink().active_voices(), 0);
    }

    #[test]
    fn test_unlock_once() {
        let mut audio = AudioCueDispatcher::new(MixBus::new(), 8000, 0);
        assert!(audio.unlock());
        assert!(!audio.unlock());
        assert!(audio.is_unlocked());
    }

    #[test]
    fn test_unlocked_cues_reach_sink() {
        let mut audio = AudioCueDispatcher::new(MixBus::new(), 8000, 0);
        audio.unlock();
        assert!(audio.fire(CueKind::Eat));
        assert!(audio.fire(CueKind::Eat));
        assert!(audio.fire(CueKind::Birth));
        assert_eq!(audio.sink().played_count(CueKind::Eat), 2);
        assert_eq!(audio.sink().played_count(CueKind::Birth), 1);
        assert_eq!(audio.sink().active_voices(), 3);
    }
}
