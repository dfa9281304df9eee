//! Pondlife - headless runner
//!
//! Runs the pond for a fixed number of ticks with logging voices and a
//! silent mix bus, then prints a summary of what happened.

use clap::Parser;
use pondlife::audio::MixBus;
use pondlife::core::error::Result;
use pondlife::core::timebase::SimTime;
use pondlife::simulation::PondEvent;
use pondlife::speech::{SpeechOutcome, TraceVoice, VoiceSet};
use pondlife::{Overlay, OverlayConfig, OverlayHooks};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Headless pond runner
#[derive(Parser, Debug)]
#[command(name = "pondlife")]
#[command(about = "Run the pond simulation headless and summarize the events")]
struct Args {
    /// Number of ticks to simulate (60 per simulated second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the pond off screen (no pills, no water cues)
    #[arg(long)]
    hidden: bool,

    /// Start muted
    #[arg(long)]
    muted: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// Counts what the page would have shown
#[derive(Default)]
struct RunLog {
    events: BTreeMap<&'static str, u64>,
    narrations: u64,
}

impl OverlayHooks for RunLog {
    fn on_narration(&mut self, line: &str) {
        self.narrations += 1;
        tracing::info!(line, "Narration");
    }

    fn on_event(&mut self, _now: SimTime, event: &PondEvent) {
        *self.events.entry(event.name()).or_insert(0) += 1;
    }
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    sim_secs: f64,
    live_fish: usize,
    predators: usize,
    live_pills: usize,
    events: BTreeMap<&'static str, u64>,
    cues: BTreeMap<String, u64>,
    narrations: u64,
    speech: Vec<SpeechOutcome>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pondlife=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => OverlayConfig::load(path)?,
        None => OverlayConfig::default(),
    };

    // Speech tasks run on the runtime while the pond ticks on this thread
    let rt = Runtime::new()?;
    let voices = VoiceSet::none()
        .with_singing(Arc::new(TraceVoice))
        .with_plain(Arc::new(TraceVoice))
        .with_priority(Arc::new(TraceVoice));
    let mut overlay = Overlay::new(
        config,
        MixBus::new(),
        voices,
        RunLog::default(),
        rt.handle().clone(),
        seed,
    )?;

    overlay.unlock_audio();
    overlay.set_muted(args.muted);
    overlay.set_visible(!args.hidden);

    tracing::info!(seed, ticks = args.ticks, "Pondlife starting...");
    let mut scratch = vec![0.0f32; 735];
    for _ in 0..args.ticks {
        overlay.tick();
        overlay.render();
        // Drain one frame of audio at 44.1 kHz / 60 Hz
        overlay.audio_mut().sink_mut().render(&mut scratch);
    }
    let speech = rt.block_on(overlay.settle_speech());

    let world = overlay.world();
    let summary = RunSummary {
        seed,
        ticks: args.ticks,
        sim_secs: world.now(),
        live_fish: world.live_fish_count(),
        predators: world
            .fish
            .iter()
            .filter(|(_, f)| f.alive && f.is_predator())
            .count(),
        live_pills: world.live_pill_count(),
        events: overlay.hooks().events.clone(),
        cues: overlay
            .audio()
            .sink()
            .played()
            .iter()
            .map(|(kind, n)| (format!("{:?}", kind), *n))
            .collect(),
        narrations: overlay.hooks().narrations,
        speech,
    };

    match args.format.as_str() {
        "text" => print_text(&summary),
        _ => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

fn print_text(summary: &RunSummary) {
    println!("=== POND after {:.1}s (seed {}) ===", summary.sim_secs, summary.seed);
    println!(
        "Fish: {} ({} predators)  Pills: {}",
        summary.live_fish, summary.predators, summary.live_pills
    );
    println!("Events:");
    for (name, count) in &summary.events {
        println!("  {:<16} {}", name, count);
    }
    println!("Cues:");
    for (name, count) in &summary.cues {
        println!("  {:<16} {}", name, count);
    }
    println!("Narrations: {}", summary.narrations);
}
