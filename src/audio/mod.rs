//! Procedural sound cues
//!
//! Every cue is synthesized on demand from a short recipe of oscillators,
//! noise, filters and envelopes. Nothing is loaded from disk.

pub mod cues;
pub mod dispatcher;
pub mod sink;

pub use cues::{synthesize, CueBuffer, CueKind};
pub use dispatcher::AudioCueDispatcher;
pub use sink::{AudioSink, MixBus};
