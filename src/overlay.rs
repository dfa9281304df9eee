//! The overlay context: one pond, its sounds and its narrator
//!
//! `Overlay` owns every piece of state the page collaborators talk to. The
//! tick borrows the world and the reactor separately, so cue dispatch and
//! narration happen synchronously with event detection.

use crate::audio::{AudioCueDispatcher, AudioSink, CueKind};
use crate::core::config::OverlayConfig;
use crate::core::error::Result;
use crate::core::timebase::SimTime;
use crate::ecs::arena::Handle;
use crate::ecs::world::PondWorld;
use crate::render::{collect_render_transforms, RenderTransform};
use crate::simulation::{run_simulation_tick, PondEvent, PondObserver};
use crate::speech::{NarrationGate, SpeechOutcome, SpeechPipeline, VoiceSet};
use tokio::runtime::Handle as RuntimeHandle;
use tokio::task::JoinHandle;

/// Callouts to the page
pub trait OverlayHooks {
    /// A narration line was handed to the speech pipeline
    fn on_narration(&mut self, _line: &str) {}

    /// Every pond event, after its cue has fired
    fn on_event(&mut self, _now: SimTime, _event: &PondEvent) {}
}

impl OverlayHooks for () {}

/// Everything that reacts to pond events
struct Reactor<S: AudioSink, H: OverlayHooks> {
    audio: AudioCueDispatcher<S>,
    narration: NarrationGate,
    speech: SpeechPipeline,
    runtime: RuntimeHandle,
    speech_tasks: Vec<JoinHandle<SpeechOutcome>>,
    hooks: H,
}

impl<S: AudioSink, H: OverlayHooks> Reactor<S, H> {
    fn offer_narration(&mut self, now: SimTime) {
        let Some(line) = self.narration.trigger(now, self.speech.is_busy()) else {
            return;
        };
        self.hooks.on_narration(&line);
        self.spawn_ambient(line);
    }

    /// The channel is claimed here, so the gate sees it busy within the same frame
    fn spawn_ambient(&mut self, text: String) {
        let speech = self.speech.clone();
        let claim = speech.claim_ambient();
        self.speech_tasks.retain(|task| !task.is_finished());
        let task = self.runtime.spawn(async move {
            match claim {
                Some(claim) => speech.speak_claimed(claim, &text).await,
                None => SpeechOutcome::Suppressed,
            }
        });
        self.speech_tasks.push(task);
    }
}

impl<S: AudioSink, H: OverlayHooks> PondObserver for Reactor<S, H> {
    fn on_event(&mut self, now: SimTime, event: &PondEvent) {
        match event {
            PondEvent::PillEaten { .. } => {
                self.audio.fire(CueKind::Eat);
                self.offer_narration(now);
            }
            PondEvent::PreyEaten { .. } => {
                self.audio.fire(CueKind::BigEat);
            }
            PondEvent::OffspringBorn { .. } => {
                self.audio.fire(CueKind::Birth);
            }
            PondEvent::WaterCue => {
                self.audio.fire(CueKind::Water);
            }
            PondEvent::PillSpawned { .. }
            | PondEvent::PillExpired { .. }
            | PondEvent::BecamePredator { .. } => {}
        }
        self.hooks.on_event(now, event);
    }
}

pub struct Overlay<S: AudioSink, H: OverlayHooks = ()> {
    world: PondWorld,
    reactor: Reactor<S, H>,
    transforms: Vec<RenderTransform>,
}

impl<S: AudioSink, H: OverlayHooks> Overlay<S, H> {
    /// Build the overlay and its initial school of fish
    ///
    /// Speech runs on `runtime`; the pond itself never touches it.
    pub fn new(
        config: OverlayConfig,
        sink: S,
        voices: VoiceSet,
        hooks: H,
        runtime: RuntimeHandle,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let OverlayConfig {
            pond,
            speech,
            audio,
            narration,
        } = config;

        let reactor = Reactor {
            // Separate stream so cue noise never shifts the pond's randomness
            audio: AudioCueDispatcher::new(sink, audio.sample_rate, seed ^ 0xa0d1_0c0e),
            narration: NarrationGate::new(&narration),
            speech: SpeechPipeline::new(speech, voices),
            runtime,
            speech_tasks: Vec::new(),
            hooks,
        };
        let mut world = PondWorld::new(pond, seed);
        world.populate_initial();
        tracing::info!(seed, fish = world.live_fish_count(), "Overlay ready");

        Ok(Self {
            world,
            reactor,
            transforms: Vec::new(),
        })
    }

    pub fn world(&self) -> &PondWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PondWorld {
        &mut self.world
    }

    pub fn now(&self) -> SimTime {
        self.world.now()
    }

    pub fn speech(&self) -> &SpeechPipeline {
        &self.reactor.speech
    }

    pub fn audio(&self) -> &AudioCueDispatcher<S> {
        &self.reactor.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioCueDispatcher<S> {
        &mut self.reactor.audio
    }

    pub fn hooks(&self) -> &H {
        &self.reactor.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.reactor.hooks
    }

    /// Advance one frame; cues and narration fire as events are detected
    pub fn tick(&mut self) -> Vec<PondEvent> {
        run_simulation_tick(&mut self.world, &mut self.reactor)
    }

    /// Transforms for every live entity at the current time
    pub fn render(&mut self) -> &[RenderTransform] {
        collect_render_transforms(&self.world, &mut self.transforms);
        &self.transforms
    }

    /// Pond scrolled into or out of view
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let audio_ready = self.reactor.audio.is_unlocked();
        self.world.set_visible(visible, audio_ready)
    }

    /// Mute stops ambient speech only; cues keep playing
    pub fn set_muted(&self, muted: bool) {
        self.reactor.speech.set_muted(muted);
        tracing::info!(muted, "Mute toggled");
    }

    /// Current music note in Hz, from the music collaborator
    pub fn set_pitch(&self, freq: f32) {
        self.reactor.speech.pitch().set(freq);
    }

    pub fn note_on(&self, midi_note: u8) {
        self.reactor.speech.pitch().set_midi_note(midi_note);
    }

    /// First user gesture. Plays the start-up chime the first time.
    pub fn unlock_audio(&mut self) -> bool {
        let unlocked = self.reactor.audio.unlock();
        if unlocked {
            self.reactor.audio.fire(CueKind::Startup);
        }
        unlocked
    }

    /// Fire any cue on behalf of a page collaborator
    pub fn play_cue(&mut self, kind: CueKind) -> bool {
        self.reactor.audio.fire(kind)
    }

    /// Pointer over a fish: splash if it is still swimming
    pub fn hover_fish(&mut self, fish: Handle) -> bool {
        let swimming = self.world.fish.get(fish).is_some_and(|f| f.alive);
        swimming && self.reactor.audio.fire(CueKind::Splash)
    }

    /// Queue `text` on the ambient channel
    pub fn request_narration(&mut self, text: impl Into<String>) {
        self.reactor.spawn_ambient(text.into());
    }

    /// Queue `text` on the priority channel; `on_done` runs when it ends
    pub fn request_priority<F>(&self, text: impl Into<String>, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(SpeechOutcome) + Send + 'static,
    {
        let speech = self.reactor.speech.clone();
        let text = text.into();
        self.reactor.runtime.spawn(async move {
            let outcome = speech.announce(&text).await;
            on_done(outcome);
        })
    }

    /// Wait for every queued ambient utterance to finish
    pub async fn settle_speech(&mut self) -> Vec<SpeechOutcome> {
        let mut outcomes = Vec::new();
        for task in self.reactor.speech_tasks.drain(..) {
            match task.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::warn!("Speech task failed: {}", e),
            }
        }
        outcomes
    }
}
