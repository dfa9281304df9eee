//! Dual-voice speech pipeline
//!
//! Two channels share one set of flags:
//!
//! - **Ambient**: word-by-word narration. Each word goes to the singing and
//!   plain renderers at once and the next word waits for both. Starting a new
//!   ambient utterance cancels the previous one. Mute and the priority channel
//!   stop it at the next word boundary.
//! - **Priority**: a whole text handed to the announcer voice. Ambient speech
//!   cannot start while it runs and mute cannot cut it off. A newer
//!   announcement replaces it.
//!
//! Both channels have a hard safety timeout so a renderer that never reports
//! back cannot wedge the channel.

use crate::core::config::SpeechConfig;
use crate::speech::pitch::{freq_to_synth_pitch, playback_rate, PitchTarget};
use crate::speech::renderer::{finished, Completion, SungWord, VoiceSet};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How an utterance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeechOutcome {
    /// Every word was rendered
    Completed,
    /// Stopped early by mute, priority speech, or a newer utterance
    Aborted,
    /// Never started (muted, or the priority channel was busy)
    Suppressed,
    /// The safety timeout cut it off
    TimedOut,
}

#[derive(Debug)]
struct ChannelState {
    muted: AtomicBool,
    /// Bumped by every ambient start or cancellation
    ambient_generation: AtomicU64,
    /// Generation of the utterance holding the ambient channel, 0 when idle
    ambient_owner: AtomicU64,
    /// Bumped by every announcement; a waiting announcement watches it
    priority_generation: watch::Sender<u64>,
    /// Generation of the announcement holding the priority channel, 0 when idle
    priority_owner: AtomicU64,
    pitch: PitchTarget,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            muted: AtomicBool::new(false),
            ambient_generation: AtomicU64::new(0),
            ambient_owner: AtomicU64::new(0),
            priority_generation: watch::channel(0).0,
            priority_owner: AtomicU64::new(0),
            pitch: PitchTarget::default(),
        }
    }
}

/// Resolves once an announcement newer than `generation` has started
async fn replaced(rx: &mut watch::Receiver<u64>, generation: u64) {
    let _ = rx.wait_for(|current| *current != generation).await;
}

/// Release `owner` unless a newer holder already took it
fn release(owner: &AtomicU64, generation: u64) {
    let _ = owner.compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst);
}

/// The ambient channel, held for one utterance
///
/// Taken synchronously by [`SpeechPipeline::claim_ambient`], so the channel
/// reads as busy before the utterance task has been polled. Dropping it
/// releases the channel.
#[derive(Debug)]
pub struct AmbientClaim {
    state: Arc<ChannelState>,
    generation: u64,
}

impl Drop for AmbientClaim {
    fn drop(&mut self) {
        release(&self.state.ambient_owner, self.generation);
    }
}

/// Holds the priority channel for one announcement
struct PriorityGuard<'a> {
    state: &'a ChannelState,
    generation: u64,
}

impl Drop for PriorityGuard<'_> {
    fn drop(&mut self) {
        release(&self.state.priority_owner, self.generation);
    }
}

/// Cheap to clone; every clone drives the same channels
#[derive(Clone, Debug)]
pub struct SpeechPipeline {
    state: Arc<ChannelState>,
    voices: VoiceSet,
    config: Arc<SpeechConfig>,
}

impl SpeechPipeline {
    pub fn new(config: SpeechConfig, voices: VoiceSet) -> Self {
        tracing::debug!(?voices, "Speech pipeline ready");
        Self {
            state: Arc::new(ChannelState::default()),
            voices,
            config: Arc::new(config),
        }
    }

    /// Muting releases the ambient channel at once; the priority channel is untouched
    pub fn set_muted(&self, muted: bool) {
        self.state.muted.store(muted, Ordering::SeqCst);
        if muted {
            self.cancel_ambient();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.state.muted.load(Ordering::SeqCst)
    }

    /// Note reported by the music collaborator
    pub fn pitch(&self) -> &PitchTarget {
        &self.state.pitch
    }

    /// An ambient utterance holds the channel and has not been cancelled
    pub fn is_ambient_speaking(&self) -> bool {
        let owner = self.state.ambient_owner.load(Ordering::SeqCst);
        owner != 0 && owner == self.state.ambient_generation.load(Ordering::SeqCst)
    }

    pub fn is_priority_active(&self) -> bool {
        self.state.priority_owner.load(Ordering::SeqCst) != 0
    }

    /// Either channel is producing speech
    pub fn is_busy(&self) -> bool {
        self.is_ambient_speaking() || self.is_priority_active()
    }

    /// Stop any ambient utterance at its next word boundary
    pub fn cancel_ambient(&self) {
        self.state.ambient_generation.fetch_add(1, Ordering::SeqCst);
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.config.timeout_secs)
    }

    /// Take the ambient channel now, cancelling any utterance holding it
    ///
    /// `None` while muted or while the priority channel is active.
    pub fn claim_ambient(&self) -> Option<AmbientClaim> {
        if self.is_muted() || self.is_priority_active() {
            return None;
        }
        let generation = self.state.ambient_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.ambient_owner.store(generation, Ordering::SeqCst);
        Some(AmbientClaim {
            state: Arc::clone(&self.state),
            generation,
        })
    }

    /// Speak `text` on the ambient channel, word by word
    pub async fn speak(&self, text: &str) -> SpeechOutcome {
        match self.claim_ambient() {
            Some(claim) => self.speak_claimed(claim, text).await,
            None => SpeechOutcome::Suppressed,
        }
    }

    /// Speak `text` under a claim taken earlier with [`Self::claim_ambient`]
    ///
    /// If the claim was cancelled in the meantime nothing is rendered.
    pub async fn speak_claimed(&self, claim: AmbientClaim, text: &str) -> SpeechOutcome {
        debug_assert!(Arc::ptr_eq(&claim.state, &self.state));
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return SpeechOutcome::Completed;
        }

        let generation = claim.generation;
        match tokio::time::timeout(self.timeout(), self.speak_words(generation, &words)).await {
            Ok(outcome) => {
                tracing::debug!(?outcome, words = words.len(), "Ambient utterance ended");
                outcome
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.timeout_secs,
                    "Ambient speech timed out"
                );
                SpeechOutcome::TimedOut
            }
        }
    }

    fn ambient_interrupted(&self, generation: u64) -> bool {
        self.is_muted()
            || self.is_priority_active()
            || self.state.ambient_generation.load(Ordering::SeqCst) != generation
    }

    async fn speak_words(&self, generation: u64, words: &[&str]) -> SpeechOutcome {
        for word in words {
            if self.ambient_interrupted(generation) {
                return SpeechOutcome::Aborted;
            }
            self.render_word(word).await;
        }
        SpeechOutcome::Completed
    }

    /// Render one word on every available ambient voice and wait for all of them
    async fn render_word(&self, word: &str) {
        let freq = self.state.pitch.or(self.config.default_note_hz);
        let sung = SungWord {
            pitch: freq_to_synth_pitch(freq),
            playback_rate: playback_rate(freq),
            voice: self.config.singing,
        };

        match (&self.voices.singing, &self.voices.plain) {
            (Some(singing), Some(plain)) => {
                let (sing_done, sing_rx) = Completion::channel();
                let (speak_done, speak_rx) = Completion::channel();
                singing.sing(word, sung, sing_done);
                plain.speak(word, self.config.plain, speak_done);
                tokio::join!(finished(sing_rx), finished(speak_rx));
            }
            (Some(singing), None) => {
                let (done, rx) = Completion::channel();
                singing.sing(word, sung, done);
                finished(rx).await;
            }
            (None, Some(plain)) => {
                let (done, rx) = Completion::channel();
                plain.speak(word, self.config.plain, done);
                finished(rx).await;
            }
            (None, None) => {}
        }
    }

    /// Take the priority channel, superseding any announcement holding it
    fn claim_priority(&self) -> PriorityGuard<'_> {
        let mut generation = 0;
        self.state.priority_generation.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        let previous = self.state.priority_owner.swap(generation, Ordering::SeqCst);
        if previous != 0 {
            tracing::debug!(previous, generation, "Priority speech superseded");
            if let Some(announcer) = &self.voices.priority {
                announcer.cancel();
            }
        }
        PriorityGuard {
            state: &self.state,
            generation,
        }
    }

    /// Speak `text` on the priority channel
    ///
    /// While muted this returns immediately without speaking. Once started it
    /// cancels ambient speech and runs to completion regardless of mute. A
    /// newer announcement replaces it, and it then ends as `Aborted`.
    pub async fn announce(&self, text: &str) -> SpeechOutcome {
        if self.is_muted() {
            return SpeechOutcome::Suppressed;
        }
        self.cancel_ambient();
        let mut superseded = self.state.priority_generation.subscribe();
        let channel = self.claim_priority();

        let Some(announcer) = &self.voices.priority else {
            return SpeechOutcome::Completed;
        };
        let (done, rx) = Completion::channel();
        announcer.announce(text, self.config.priority, done);

        let spoken = async {
            // A replaced announcer may drop its completion, so check replacement first
            tokio::select! {
                biased;
                _ = replaced(&mut superseded, channel.generation) => SpeechOutcome::Aborted,
                _ = finished(rx) => SpeechOutcome::Completed,
            }
        };
        match tokio::time::timeout(self.timeout(), spoken).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.timeout_secs,
                    "Priority speech timed out"
                );
                SpeechOutcome::TimedOut
            }
        }
    }
}
