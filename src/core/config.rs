//! Overlay configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section deserializes from
//! TOML with per-field defaults, so a config file only needs the values it
//! overrides.

use crate::core::error::{PondError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration handed to `Overlay::new`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub pond: PondConfig,
    pub speech: SpeechConfig,
    pub audio: AudioConfig,
    pub narration: NarrationConfig,
}

impl OverlayConfig {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: OverlayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.pond.validate()?;
        self.speech.validate()?;

        if self.audio.sample_rate == 0 {
            return Err(PondError::InvalidConfig("audio.sample_rate must be positive".into()));
        }
        if self.narration.cooldown_secs < 0.0 {
            return Err(PondError::InvalidConfig(
                "narration.cooldown_secs must not be negative".into(),
            ));
        }
        if self.narration.lines.is_empty() {
            return Err(PondError::InvalidConfig("narration.lines must not be empty".into()));
        }
        Ok(())
    }
}

/// Configuration for the pond simulation
///
/// Distances are pond pixels, per-tick quantities assume the default
/// 60 Hz tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PondConfig {
    // === TIMEBASE ===
    /// Length of one simulation tick in seconds
    pub tick_secs: f64,

    // === GEOMETRY ===
    /// Pond width; fish turn around `edge_margin` beyond either side
    pub width: f32,

    /// Depth at which a falling pill switches to bobbing
    pub mid_depth: f32,

    /// A pill whose bob anchor (or raw y while falling) exceeds this is gone
    pub terminal_depth: f32,

    /// Fish turn around once this far past the left or right edge
    pub edge_margin: f32,

    // === PILLS ===
    /// Spawn height, above the visible surface
    pub pill_spawn_y: f32,

    /// Spawning is refused while more than this many pills are live
    pub pill_cap: usize,

    /// Initial fall speed range (pixels per tick)
    pub pill_fall_speed: (f32, f32),

    /// Horizontal drift magnitude; drift is drawn from `±pill_drift / 2`
    pub pill_drift: f32,

    /// Vertical swing of a bobbing pill around its anchor
    pub bob_amplitude: f32,

    /// Per-tick downward drift of the bob anchor
    ///
    /// Small enough to be imperceptible; a pill anchored at mid-depth
    /// takes roughly a minute to reach the terminal depth.
    pub bob_drift: f32,

    /// Seconds between pill spawns while the pond is visible
    pub pill_spawn_interval: (f64, f64),

    /// Pills dropped immediately when the pond scrolls into view
    pub pill_initial_burst: usize,

    /// Seconds between ambient water cues while the pond is visible
    pub water_cue_interval: (f64, f64),

    // === FISH ===
    /// Fish created at simulation start
    pub initial_fish: usize,

    /// Baseline y range for new fish
    pub fish_baseline_y: (f32, f32),

    /// Horizontal speed range; also redrawn on every edge turnaround
    pub fish_speed: (f32, f32),

    /// Vertical bob frequency range (radians per second)
    pub fish_bob_freq: (f32, f32),

    /// Vertical bob amplitude range
    pub fish_bob_amplitude: (f32, f32),

    /// Base visual scale range for initial fish
    pub fish_base_size: (f32, f32),

    // === GROWTH & PREDATION ===
    /// Growth gained per pill eaten; five pills make a predator
    pub growth_per_pill: f32,

    /// Base size given to offspring
    pub offspring_base_size: f32,

    /// Offspring appear this far left and right of the prey's last position
    pub offspring_spread: f32,

    /// Delay between a predation and the offspring appearing
    pub birth_delay_secs: f64,
}

impl Default for PondConfig {
    fn default() -> Self {
        Self {
            tick_secs: 1.0 / 60.0,

            width: 800.0,
            mid_depth: 100.0,
            terminal_depth: 230.0,
            edge_margin: 80.0,

            pill_spawn_y: -30.0,
            pill_cap: 15,
            pill_fall_speed: (0.3, 0.7),
            pill_drift: 0.3,
            bob_amplitude: 12.0,
            bob_drift: 0.03,
            pill_spawn_interval: (2.0, 5.0),
            pill_initial_burst: 2,
            water_cue_interval: (1.5, 3.5),

            initial_fish: 8,
            fish_baseline_y: (30.0, 170.0),
            fish_speed: (1.0, 2.5),
            fish_bob_freq: (0.3, 0.7),
            fish_bob_amplitude: (15.0, 40.0),
            fish_base_size: (0.7, 1.3),

            growth_per_pill: 0.2,
            offspring_base_size: 0.5,
            offspring_spread: 20.0,
            birth_delay_secs: 0.3,
        }
    }
}

impl PondConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_secs > 0.0) {
            return Err(PondError::InvalidConfig("pond.tick_secs must be positive".into()));
        }
        if self.mid_depth >= self.terminal_depth {
            return Err(PondError::InvalidConfig(format!(
                "pond.mid_depth ({}) should be < pond.terminal_depth ({})",
                self.mid_depth, self.terminal_depth
            )));
        }
        if self.mid_depth <= 0.0 {
            return Err(PondError::InvalidConfig("pond.mid_depth must be positive".into()));
        }

        let ranges = [
            ("pond.pill_fall_speed", self.pill_fall_speed),
            ("pond.fish_baseline_y", self.fish_baseline_y),
            ("pond.fish_speed", self.fish_speed),
            ("pond.fish_bob_freq", self.fish_bob_freq),
            ("pond.fish_bob_amplitude", self.fish_bob_amplitude),
            ("pond.fish_base_size", self.fish_base_size),
        ];
        for (name, (lo, hi)) in ranges {
            if lo > hi {
                return Err(PondError::InvalidConfig(format!("{name}: {lo} > {hi}")));
            }
        }
        for (name, (lo, hi)) in [
            ("pond.pill_spawn_interval", self.pill_spawn_interval),
            ("pond.water_cue_interval", self.water_cue_interval),
        ] {
            if lo <= 0.0 || lo > hi {
                return Err(PondError::InvalidConfig(format!("{name}: bad interval {lo}..{hi}")));
            }
        }

        if self.fish_speed.0 <= 0.0 {
            // A zero redraw would leave a fish parked past the edge
            return Err(PondError::InvalidConfig("pond.fish_speed must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.growth_per_pill) || self.growth_per_pill == 0.0 {
            return Err(PondError::InvalidConfig(
                "pond.growth_per_pill must be in (0, 1]".into(),
            ));
        }
        if self.birth_delay_secs < 0.0 {
            return Err(PondError::InvalidConfig("pond.birth_delay_secs must not be negative".into()));
        }
        Ok(())
    }
}

/// Configuration for the speech synthesis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Hard cutoff for a whole utterance, on either channel
    ///
    /// Measured on the tokio clock, not the pond clock: speech runs as async
    /// tasks beside the tick and keeps going while the pond is paused.
    pub timeout_secs: f64,

    /// Note used for pitch-matching before the music reports one (middle C)
    pub default_note_hz: f32,

    pub singing: SingingVoiceParams,
    pub plain: PlainVoiceParams,
    pub priority: PlainVoiceParams,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30.0,
            default_note_hz: 261.63,
            singing: SingingVoiceParams::default(),
            plain: PlainVoiceParams { rate: 0.85, pitch: 1.0, volume: 0.4 },
            priority: PlainVoiceParams { rate: 0.9, pitch: 0.8, volume: 0.56 },
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.timeout_secs > 0.0) {
            return Err(PondError::InvalidConfig("speech.timeout_secs must be positive".into()));
        }
        if !(self.default_note_hz > 0.0) {
            return Err(PondError::InvalidConfig("speech.default_note_hz must be positive".into()));
        }
        Ok(())
    }
}

/// Voice-shaping parameters for the singing synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingingVoiceParams {
    pub speed: u8,
    pub mouth: u8,
    pub throat: u8,
}

impl Default for SingingVoiceParams {
    fn default() -> Self {
        // slow, open, breathy
        Self { speed: 55, mouth: 190, throat: 140 }
    }
}

/// Parameters for a plain text-to-speech voice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlainVoiceParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Configuration for procedural audio cues
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { sample_rate: 44_100 }
    }
}

/// Configuration for the pill-eating narration gate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Minimum simulated seconds between two narrations
    pub cooldown_secs: f64,

    /// Lines handed out round-robin
    pub lines: Vec<String>,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 6.0,
            lines: DEFAULT_NARRATION_LINES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const DEFAULT_NARRATION_LINES: &[&str] = &[
    "These compounds are completely non-toxic and fully biodegradable.",
    "We are deeply committed to protecting our waterways and aquatic ecosystems.",
    "There is no scientific evidence for concern regarding trace pharmaceutical levels.",
    "Our environmental stewardship program exceeds all regulatory requirements.",
    "Independent studies confirm zero adverse ecological impact from our products.",
    "Water quality monitoring shows levels well below any threshold of concern.",
    "Our commitment to clean water is reflected in every product we make.",
    "Pharmaceutical residues at these concentrations pose absolutely no risk.",
    "We invest billions annually in sustainable manufacturing practices.",
    "All products undergo rigorous environmental impact assessments before release.",
    "Our fish-safe certification program is the gold standard in the industry.",
    "Trace amounts detected are millions of times below any biologically active dose.",
    "We partner with leading marine biologists to ensure ecosystem health.",
    "Advanced filtration technology removes ninety-nine point nine percent of all residues.",
    "Consumer safety and environmental responsibility are our top priorities.",
    "Our products are designed to break down naturally in aquatic environments.",
    "Regulatory agencies worldwide have confirmed the safety of these levels.",
    "We are proud to maintain the highest environmental compliance rating.",
    "These results reflect our ongoing dedication to ecological responsibility.",
    "There is nothing to worry about. Everything is functioning as intended.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = OverlayConfig::from_toml_str(
            r#"
            [pond]
            width = 1024.0
            pill_cap = 4

            [narration]
            cooldown_secs = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.pond.width, 1024.0);
        assert_eq!(config.pond.pill_cap, 4);
        assert_eq!(config.pond.mid_depth, 100.0);
        assert_eq!(config.narration.cooldown_secs, 2.5);
        assert_eq!(config.narration.lines.len(), 20);
        assert_eq!(config.speech.timeout_secs, 30.0);
    }

    #[test]
    fn test_rejects_mid_depth_below_terminal() {
        let mut config = OverlayConfig::default();
        config.pond.mid_depth = 300.0;
        assert!(matches!(config.validate(), Err(PondError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = OverlayConfig::from_toml_str(
            r#"
            [pond]
            fish_speed = [3.0, 1.0]
            "#,
        );
        assert!(matches!(result, Err(PondError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = OverlayConfig::from_toml_str("[pond\nwidth = ");
        assert!(matches!(result, Err(PondError::ConfigParse(_))));
    }
}
