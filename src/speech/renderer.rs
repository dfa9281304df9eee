//! Voice renderer capabilities
//!
//! Renderers are external synthesizers. Each call receives a `Completion`
//! that the renderer fires when the audio has finished playing. A renderer
//! that fails or drops its completion is treated as having finished with no
//! audio.

use crate::core::config::{PlainVoiceParams, SingingVoiceParams};
use std::sync::Arc;
use tokio::sync::oneshot;

/// One-shot "finished playing" signal handed to a renderer
#[derive(Debug)]
pub struct Completion(oneshot::Sender<()>);

impl Completion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn complete(self) {
        // The pipeline may have timed out and stopped listening
        let _ = self.0.send(());
    }
}

/// Wait for a renderer to finish. A dropped completion counts as finished.
pub(crate) async fn finished(rx: oneshot::Receiver<()>) {
    if rx.await.is_err() {
        tracing::warn!("Voice renderer dropped its completion");
    }
}

/// Pitch-shaped request for the singing voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SungWord {
    /// Synthesizer pitch parameter, 40..=255
    pub pitch: u8,
    /// Playback-rate multiplier, 0.5..=2.0
    pub playback_rate: f32,
    pub voice: SingingVoiceParams,
}

/// Pitch-matched synthetic singing voice
pub trait SingingRenderer: Send + Sync {
    fn sing(&self, word: &str, request: SungWord, done: Completion);
}

/// Plain text-to-speech voice layered under the singing voice
pub trait PlainRenderer: Send + Sync {
    fn speak(&self, word: &str, voice: PlainVoiceParams, done: Completion);
}

/// Announcer voice for the priority channel; speaks a whole text at once
pub trait PriorityRenderer: Send + Sync {
    fn announce(&self, text: &str, voice: PlainVoiceParams, done: Completion);

    /// A newer announcement replaced the one in flight; stop speaking it
    fn cancel(&self) {}
}

/// The renderers actually available, fixed when the pipeline is built
#[derive(Clone, Default)]
pub struct VoiceSet {
    pub singing: Option<Arc<dyn SingingRenderer>>,
    pub plain: Option<Arc<dyn PlainRenderer>>,
    pub priority: Option<Arc<dyn PriorityRenderer>>,
}

impl VoiceSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_singing(mut self, renderer: Arc<dyn SingingRenderer>) -> Self {
        self.singing = Some(renderer);
        self
    }

    pub fn with_plain(mut self, renderer: Arc<dyn PlainRenderer>) -> Self {
        self.plain = Some(renderer);
        self
    }

    pub fn with_priority(mut self, renderer: Arc<dyn PriorityRenderer>) -> Self {
        self.priority = Some(renderer);
        self
    }
}

impl std::fmt::Debug for VoiceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSet")
            .field("singing", &self.singing.is_some())
            .field("plain", &self.plain.is_some())
            .field("priority", &self.priority.is_some())
            .finish()
    }
}

/// Headless renderer that logs each request and finishes immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceVoice;

impl SingingRenderer for TraceVoice {
    fn sing(&self, word: &str, request: SungWord, done: Completion) {
        tracing::info!(word, pitch = request.pitch, rate = request.playback_rate, "sing");
        done.complete();
    }
}

impl PlainRenderer for TraceVoice {
    fn speak(&self, word: &str, _voice: PlainVoiceParams, done: Completion) {
        tracing::info!(word, "speak");
        done.complete();
    }
}

impl PriorityRenderer for TraceVoice {
    fn announce(&self, text: &str, _voice: PlainVoiceParams, done: Completion) {
        tracing::info!(text, "announce");
        done.complete();
    }
}
