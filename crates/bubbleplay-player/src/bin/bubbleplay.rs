//! Headless bubble chart player.
//!
//! Plays a yearly country dataset on a simulated clock and writes SVG frames.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin bubbleplay -- --config bubbleplay.toml --out ./frames
//! cargo run --bin bubbleplay -- --data data/sample.json --continent asia --scrub 1801 --paused
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use bubbleplay_player::{PlayOptions, PlayerConfig, Session, init_logging};

/// Animated income / life expectancy bubble chart, rendered to SVG.
#[derive(Parser, Debug)]
#[command(name = "bubbleplay")]
#[command(about = "Play a yearly country dataset and write SVG frames")]
struct Args {
    /// Config file (.ron, .toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset JSON file; overrides the config's data_path
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Simulated time to play, in milliseconds
    #[arg(long, default_value = "2000")]
    duration_ms: u64,

    /// Clock step per host frame, in milliseconds
    #[arg(long, default_value = "16")]
    step_ms: u64,

    /// Capture a frame every N milliseconds
    #[arg(long, default_value = "100")]
    frame_every_ms: u64,

    /// Continent selector value ("all", "europe", ...)
    #[arg(long)]
    continent: Option<String>,

    /// Jump to this year before playing
    #[arg(long)]
    scrub: Option<i32>,

    /// Start paused (transitions still settle)
    #[arg(long)]
    paused: bool,

    /// Write frames to this directory; without it, print the final bubble
    /// state as JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlayerConfig::default(),
    };
    if let Some(data) = args.data {
        config.data_path = Some(data);
    }
    if config.data_path.is_none() {
        bail!("no dataset given: pass --data or set data_path in the config");
    }

    let mut session = Session::from_config(&config).context("starting session")?;
    if let Some(continent) = &args.continent {
        session.set_continent(continent);
    }
    if let Some(year) = args.scrub {
        session
            .scrub(year)
            .with_context(|| format!("scrubbing to {year}"))?;
    }
    if args.paused {
        session.pause()?;
    }

    let options = PlayOptions {
        duration_ms: args.duration_ms,
        step_ms: args.step_ms,
        frame_every_ms: args.frame_every_ms,
    };

    let summary = match &args.out {
        Some(dir) => session
            .write_frames(options, dir)
            .with_context(|| format!("writing frames to {}", dir.display()))?,
        None => {
            let summary = session.play(options, |_| Ok(()))?;
            let state = serde_json::to_string_pretty(&session.visual_state())?;
            println!("{state}");
            summary
        }
    };

    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        final_year = ?summary.final_year,
        status = %session.controller().status(),
        "done"
    );
    Ok(())
}
