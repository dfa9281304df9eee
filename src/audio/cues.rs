//! Procedural sound-effect synthesis
//!
//! Every cue is a handful of layers (oscillator sweeps, chord stacks or
//! filtered noise bursts), each with its own start offset and gain envelope,
//! rendered additively into one mono buffer.

use rand::Rng;
use serde::Serialize;
use std::f32::consts::{PI, TAU};

/// Gain an exponential release decays to; the layer stops there
const RELEASE_FLOOR: f32 = 0.001;

/// Filter coefficients are refreshed this often while the cutoff sweeps
const FILTER_BLOCK: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CueKind {
    Eat,
    BigEat,
    Birth,
    Click,
    Scroll,
    Water,
    Hover,
    Startup,
    Goodbye,
    Whoosh,
    Splash,
}

impl CueKind {
    pub const ALL: [CueKind; 11] = [
        CueKind::Eat,
        CueKind::BigEat,
        CueKind::Birth,
        CueKind::Click,
        CueKind::Scroll,
        CueKind::Water,
        CueKind::Hover,
        CueKind::Startup,
        CueKind::Goodbye,
        CueKind::Whoosh,
        CueKind::Splash,
    ];
}

/// A rendered cue ready for the output sink
#[derive(Debug, Clone)]
pub struct CueBuffer {
    pub kind: CueKind,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl CueBuffer {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Wave {
    Sine,
    Triangle,
    Saw,
}

impl Wave {
    /// `phase` in cycles, [0, 1)
    fn sample(self, phase: f32) -> f32 {
        match self {
            Wave::Sine => (phase * TAU).sin(),
            Wave::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Wave::Saw => 2.0 * phase - 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Source {
    /// Exponential pitch sweep from `from` to `to` over `sweep` seconds, then held
    Tone { wave: Wave, from: f32, to: f32, sweep: f32 },
    /// Uniform white noise at the given amplitude
    Noise { amp: f32 },
}

#[derive(Debug, Clone, Copy)]
enum FilterKind {
    Lowpass,
    Bandpass,
}

#[derive(Debug, Clone, Copy)]
struct FilterSpec {
    kind: FilterKind,
    q: f32,
    /// Cutoff breakpoints `(seconds, hz)`, exponential between them
    path: [(f32, f32); 3],
    points: usize,
}

impl FilterSpec {
    fn fixed(kind: FilterKind, hz: f32, q: f32) -> Self {
        Self { kind, q, path: [(0.0, hz); 3], points: 1 }
    }

    fn cutoff_at(&self, t: f32) -> f32 {
        let path = &self.path[..self.points];
        if t <= path[0].0 {
            return path[0].1;
        }
        for pair in path.windows(2) {
            let ((t0, f0), (t1, f1)) = (pair[0], pair[1]);
            if t <= t1 {
                let frac = (t - t0) / (t1 - t0).max(1e-6);
                return exp_ramp(f0, f1, frac);
            }
        }
        path[self.points - 1].1
    }
}

/// Linear rise from `start` to `peak` over `attack`, then exponential decay
/// to the release floor at `end`
#[derive(Debug, Clone, Copy)]
struct Envelope {
    start: f32,
    peak: f32,
    attack: f32,
    end: f32,
}

impl Envelope {
    fn decay(peak: f32, end: f32) -> Self {
        Self { start: peak, peak, attack: 0.0, end }
    }

    fn swell(start: f32, peak: f32, attack: f32, end: f32) -> Self {
        Self { start, peak, attack, end }
    }

    fn gain_at(&self, t: f32) -> f32 {
        if t < self.attack {
            return self.start + (self.peak - self.start) * (t / self.attack);
        }
        let span = (self.end - self.attack).max(1e-6);
        exp_ramp(self.peak, RELEASE_FLOOR, (t - self.attack) / span)
    }
}

#[derive(Debug, Clone, Copy)]
struct Layer {
    offset: f32,
    source: Source,
    envelope: Envelope,
    filter: Option<FilterSpec>,
}

fn exp_ramp(from: f32, to: f32, frac: f32) -> f32 {
    let frac = frac.clamp(0.0, 1.0);
    if from <= 0.0 || to <= 0.0 {
        return from + (to - from) * frac;
    }
    from * (to / from).powf(frac)
}

/// Second-order section, RBJ cookbook coefficients
#[derive(Debug, Default, Clone, Copy)]
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn set(&mut self, kind: FilterKind, cutoff: f32, q: f32, sample_rate: f32) {
        let cutoff = cutoff.clamp(10.0, sample_rate * 0.45);
        let w0 = 2.0 * PI * cutoff / sample_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * q.max(1e-3));
        let a0 = 1.0 + alpha;

        let (b0, b1, b2) = match kind {
            FilterKind::Lowpass => ((1.0 - cos) / 2.0, 1.0 - cos, (1.0 - cos) / 2.0),
            FilterKind::Bandpass => (alpha, 0.0, -alpha),
        };
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

fn render_layers(layers: &[Layer], sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let sr = sample_rate as f32;
    let total = layers
        .iter()
        .map(|l| l.offset + l.envelope.end)
        .fold(0.0f32, f32::max);
    let mut out = vec![0.0f32; (total * sr).round() as usize];

    for layer in layers {
        let first = (layer.offset * sr) as usize;
        let len = (layer.envelope.end * sr) as usize;
        let mut phase = 0.0f32;
        let mut filter = Biquad::default();

        for i in 0..len {
            let Some(slot) = out.get_mut(first + i) else {
                break;
            };
            let t = i as f32 / sr;

            let raw = match layer.source {
                Source::Tone { wave, from, to, sweep } => {
                    let freq = exp_ramp(from, to, t / sweep.max(1e-6));
                    let s = wave.sample(phase);
                    phase = (phase + freq / sr).fract();
                    s
                }
                Source::Noise { amp } => (rng.gen::<f32>() * 2.0 - 1.0) * amp,
            };

            let shaped = match &layer.filter {
                Some(spec) => {
                    if i % FILTER_BLOCK == 0 {
                        filter.set(spec.kind, spec.cutoff_at(t), spec.q, sr);
                    }
                    filter.process(raw)
                }
                None => raw,
            };

            *slot += shaped * layer.envelope.gain_at(t);
        }
    }
    out
}

fn tone(offset: f32, wave: Wave, hz: f32, envelope: Envelope) -> Layer {
    Layer {
        offset,
        source: Source::Tone { wave, from: hz, to: hz, sweep: 1.0 },
        envelope,
        filter: None,
    }
}

fn arpeggio(notes: &[f32], step: f32, peak: f32, attack: f32, length: f32) -> Vec<Layer> {
    notes
        .iter()
        .enumerate()
        .map(|(i, &hz)| {
            tone(
                i as f32 * step,
                Wave::Sine,
                hz,
                Envelope::swell(0.0, peak, attack, length),
            )
        })
        .collect()
}

fn noise_burst(offset: f32, amp: f32, envelope: Envelope, filter: FilterSpec) -> Layer {
    Layer {
        offset,
        source: Source::Noise { amp },
        envelope,
        filter: Some(filter),
    }
}

fn recipe(kind: CueKind, rng: &mut impl Rng) -> Vec<Layer> {
    match kind {
        CueKind::Eat => vec![Layer {
            offset: 0.0,
            source: Source::Tone { wave: Wave::Sine, from: 500.0, to: 200.0, sweep: 0.15 },
            envelope: Envelope::decay(0.1, 0.15),
            filter: None,
        }],
        CueKind::BigEat => [(Wave::Saw, 300.0), (Wave::Sine, 150.0), (Wave::Sine, 80.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (wave, hz))| Layer {
                filter: Some(FilterSpec::fixed(FilterKind::Lowpass, 400.0, 0.707)),
                ..tone(i as f32 * 0.05, wave, hz, Envelope::decay(0.08, 0.12))
            })
            .collect(),
        CueKind::Birth => arpeggio(&[600.0, 800.0, 1000.0, 1200.0], 0.06, 0.06, 0.02, 0.3),
        CueKind::Click => vec![Layer {
            offset: 0.0,
            source: Source::Tone { wave: Wave::Sine, from: 800.0, to: 400.0, sweep: 0.08 },
            envelope: Envelope::decay(0.12, 0.1),
            filter: None,
        }],
        CueKind::Scroll => {
            let hz = 200.0 + rng.gen::<f32>() * 100.0;
            vec![Layer {
                filter: Some(FilterSpec::fixed(FilterKind::Lowpass, 600.0, 0.707)),
                ..tone(0.0, Wave::Triangle, hz, Envelope::decay(0.04, 0.15))
            }]
        }
        CueKind::Water => {
            let hz = 1000.0 + rng.gen::<f32>() * 2000.0;
            vec![noise_burst(
                0.0,
                0.02,
                Envelope::decay(0.06, 0.06),
                FilterSpec::fixed(FilterKind::Bandpass, hz, 8.0),
            )]
        }
        CueKind::Hover => {
            let hz = 2000.0 + rng.gen::<f32>() * 1500.0;
            vec![noise_burst(
                0.0,
                1.0,
                Envelope::swell(0.025, 0.04, 0.03, 0.15),
                FilterSpec::fixed(FilterKind::Bandpass, hz, 1.5),
            )]
        }
        CueKind::Startup => arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.12, 0.08, 0.05, 0.8),
        CueKind::Goodbye => arpeggio(&[784.0, 659.0, 523.0, 392.0], 0.15, 0.06, 0.04, 0.6),
        CueKind::Whoosh => vec![noise_burst(
            0.0,
            0.08,
            Envelope::swell(0.0, 0.15, 0.1, 0.5),
            FilterSpec {
                kind: FilterKind::Bandpass,
                q: 2.0,
                path: [(0.0, 200.0), (0.3, 4000.0), (0.5, 200.0)],
                points: 3,
            },
        )],
        CueKind::Splash => (0..3)
            .map(|i| {
                let hz = 800.0 + i as f32 * 1500.0 + rng.gen::<f32>() * 500.0;
                noise_burst(
                    i as f32 * 0.04,
                    0.05,
                    Envelope::decay(0.08, 0.12),
                    FilterSpec::fixed(FilterKind::Bandpass, hz, 3.0),
                )
            })
            .collect(),
    }
}

/// Render one cue at the given sample rate
pub fn synthesize(kind: CueKind, sample_rate: u32, rng: &mut impl Rng) -> CueBuffer {
    let layers = recipe(kind, rng);
    CueBuffer {
        kind,
        sample_rate,
        samples: render_layers(&layers, sample_rate, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_every_cue_renders_finite_audio() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for kind in CueKind::ALL {
            let cue = synthesize(kind, 22_050, &mut rng);
            assert!(!cue.samples.is_empty(), "{kind:?} rendered nothing");
            assert!(cue.samples.iter().all(|s| s.is_finite()), "{kind:?} has NaN");
            assert!(cue.peak() > 0.0, "{kind:?} is silent");
            assert!(cue.peak() < 1.0, "{kind:?} clips: {}", cue.peak());
        }
    }

    #[test]
    fn test_cue_lengths_match_recipes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let eat = synthesize(CueKind::Eat, 10_000, &mut rng);
        assert_eq!(eat.samples.len(), 1500);

        // Last startup note starts at 0.36s and rings for 0.8s
        let startup = synthesize(CueKind::Startup, 10_000, &mut rng);
        assert!((startup.duration_secs() - 1.16).abs() < 1e-3);

        let big_eat = synthesize(CueKind::BigEat, 10_000, &mut rng);
        assert!((big_eat.duration_secs() - 0.22).abs() < 1e-3);
    }

    #[test]
    fn test_envelope_decays_to_floor() {
        let env = Envelope::decay(0.1, 0.15);
        assert!((env.gain_at(0.0) - 0.1).abs() < 1e-6);
        assert!((env.gain_at(0.15) - RELEASE_FLOOR).abs() < 1e-6);
        assert!(env.gain_at(0.075) < 0.1 && env.gain_at(0.075) > RELEASE_FLOOR);
    }

    #[test]
    fn test_swell_rises_linearly() {
        let env = Envelope::swell(0.0, 0.08, 0.05, 0.8);
        assert!((env.gain_at(0.025) - 0.04).abs() < 1e-6);
        assert!((env.gain_at(0.05) - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_filter_path_sweeps_up_then_down() {
        let spec = FilterSpec {
            kind: FilterKind::Bandpass,
            q: 2.0,
            path: [(0.0, 200.0), (0.3, 4000.0), (0.5, 200.0)],
            points: 3,
        };
        assert_eq!(spec.cutoff_at(0.0), 200.0);
        assert!((spec.cutoff_at(0.3) - 4000.0).abs() < 0.5);
        assert!(spec.cutoff_at(0.15) > 200.0 && spec.cutoff_at(0.15) < 4000.0);
        assert!((spec.cutoff_at(0.6) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_waveforms_stay_in_range() {
        for i in 0..100 {
            let phase = i as f32 / 100.0;
            for wave in [Wave::Sine, Wave::Triangle, Wave::Saw] {
                let s = wave.sample(phase);
                assert!((-1.0..=1.0).contains(&s));
            }
        }
    }
}
