//! Pitch mapping from musical notes to the singing synthesizer
//!
//! The singing voice is pushed an octave above the reported note before
//! mapping. Coarse tracking comes from the synthesizer's own pitch parameter,
//! fine tracking from the playback rate of the rendered word.

use std::sync::atomic::{AtomicU32, Ordering};

/// Synth pitch used when no note is known
pub const DEFAULT_SYNTH_PITCH: u8 = 160;

/// Reference for playback-rate bending (middle C)
pub const REFERENCE_HZ: f32 = 261.63;

const MIN_SYNTH_PITCH: f32 = 40.0;
const MAX_SYNTH_PITCH: f32 = 255.0;
const MIN_PLAYBACK_RATE: f32 = 0.5;
const MAX_PLAYBACK_RATE: f32 = 2.0;

/// Map a note frequency to the synthesizer's 0-255 pitch parameter
///
/// Affine in the octave-up frequency and clamped to [40, 255].
pub fn freq_to_synth_pitch(freq: f32) -> u8 {
    if !(freq > 0.0) {
        return DEFAULT_SYNTH_PITCH;
    }
    let f2 = freq * 2.0;
    let p = (80.0 + (f2 / 600.0) * 160.0).round();
    p.clamp(MIN_SYNTH_PITCH, MAX_SYNTH_PITCH) as u8
}

/// Playback-rate multiplier bending the rendered word toward `freq`
///
/// One third of the semitone distance from middle C, clamped to [0.5, 2.0].
pub fn playback_rate(freq: f32) -> f32 {
    if !(freq > 0.0) {
        return 1.0;
    }
    let semitones = 12.0 * (freq * 2.0 / REFERENCE_HZ).log2();
    2f32.powf(semitones / 36.0)
        .clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

/// Equal-tempered frequency of a MIDI note number
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Most recent note reported by the music collaborator
///
/// Stored as raw f32 bits so the music side can update it while an
/// utterance is in flight. Zero means no note yet.
#[derive(Debug, Default)]
pub struct PitchTarget(AtomicU32);

impl PitchTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, freq: f32) {
        let freq = if freq.is_finite() && freq > 0.0 { freq } else { 0.0 };
        self.0.store(freq.to_bits(), Ordering::Relaxed);
    }

    pub fn set_midi_note(&self, note: u8) {
        self.set(midi_to_freq(note));
    }

    pub fn clear(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    pub fn get(&self) -> Option<f32> {
        let freq = f32::from_bits(self.0.load(Ordering::Relaxed));
        (freq > 0.0).then_some(freq)
    }

    /// Current note, or `fallback` when none has been reported
    pub fn or(&self, fallback: f32) -> f32 {
        self.get().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synth_pitch_mapping() {
        assert_eq!(freq_to_synth_pitch(0.0), DEFAULT_SYNTH_PITCH);
        assert_eq!(freq_to_synth_pitch(-10.0), DEFAULT_SYNTH_PITCH);
        // 261.63 * 2 / 600 * 160 + 80 = 219.5 -> 220
        assert_eq!(freq_to_synth_pitch(261.63), 220);
        assert_eq!(freq_to_synth_pitch(10.0), 85);
        assert_eq!(freq_to_synth_pitch(2000.0), 255);
        assert_eq!(freq_to_synth_pitch(1.0), 81);
    }

    #[test]
    fn test_synth_pitch_is_monotonic() {
        let mut last = 0;
        for f in (1..2000).map(|i| i as f32) {
            let p = freq_to_synth_pitch(f);
            assert!(p >= last);
            assert!(p >= 40);
            last = p;
        }
    }

    #[test]
    fn test_playback_rate() {
        assert_eq!(playback_rate(0.0), 1.0);
        // Middle C is reported an octave up: 12 semitones / 36
        let expected = 2f32.powf(1.0 / 3.0);
        assert!((playback_rate(REFERENCE_HZ) - expected).abs() < 1e-4);
        assert!((playback_rate(REFERENCE_HZ / 2.0) - 1.0).abs() < 1e-4);
        assert_eq!(playback_rate(20_000.0), 2.0);
        assert_eq!(playback_rate(0.5), 0.5);
    }

    #[test]
    fn test_midi_to_freq() {
        assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(60) - 261.63).abs() < 0.01);
        assert!((midi_to_freq(81) - 880.0).abs() < 1e-2);
    }

    #[test]
    fn test_pitch_target() {
        let target = PitchTarget::new();
        assert_eq!(target.get(), None);
        assert_eq!(target.or(261.63), 261.63);

        target.set(330.0);
        assert_eq!(target.get(), Some(330.0));

        target.set(f32::NAN);
        assert_eq!(target.get(), None);

        target.set_midi_note(69);
        assert!((target.or(0.0) - 440.0).abs() < 1e-3);
        target.clear();
        assert_eq!(target.get(), None);
    }
}
