//! Narration: cooldown gate, pitch mapping and the dual-voice pipeline

pub mod narration;
pub mod pipeline;
pub mod pitch;
pub mod renderer;

pub use narration::NarrationGate;
pub use pipeline::{AmbientClaim, SpeechOutcome, SpeechPipeline};
pub use pitch::{freq_to_synth_pitch, midi_to_freq, playback_rate, PitchTarget};
pub use renderer::{
    Completion, PlainRenderer, PriorityRenderer, SingingRenderer, SungWord, TraceVoice, VoiceSet,
};
