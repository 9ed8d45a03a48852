//! Headless playback session.
//!
//! A [`Session`] owns one [`PlaybackController`] and drives it with a
//! simulated clock, rendering SVG frames at a fixed cadence. It is the host
//! side of the chart when there is no browser: the CLI and the examples use
//! it to play a dataset to disk.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use bubbleplay_core::continent::ContinentFilter;
use bubbleplay_core::dataset::Dataset;
use bubbleplay_core::playback::PlaybackController;
use bubbleplay_core::scene::VisualState;
use tracing::{debug, info};

use crate::config::PlayerConfig;
use crate::error::PlayerError;

/// Load a dataset JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, PlayerError> {
    let file = File::open(path)?;
    let dataset = Dataset::from_reader(BufReader::new(file)).map_err(|source| {
        PlayerError::Dataset {
            file: path.to_path_buf(),
            source,
        }
    })?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Play options
// ---------------------------------------------------------------------------

/// How long to play and how often to capture a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOptions {
    /// Simulated wall time to play, in milliseconds.
    pub duration_ms: u64,
    /// Clock step fed to the controller, like a host animation frame.
    pub step_ms: u64,
    /// Capture a frame every this many milliseconds. The first frame is
    /// captured at time 0.
    pub frame_every_ms: u64,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            duration_ms: 2_000,
            step_ms: 16,
            frame_every_ms: 100,
        }
    }
}

/// One captured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub number: usize,
    pub elapsed_ms: u64,
    pub year: Option<i32>,
    pub svg: String,
}

/// What a call to [`Session::play`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub frames: usize,
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub final_year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A chart being played without a browser.
pub struct Session {
    controller: PlaybackController,
    elapsed_ms: u64,
}

impl Session {
    /// Start a session over `dataset`. Snapshot 0 is rendered immediately.
    pub fn new(dataset: Dataset, config: &PlayerConfig) -> Self {
        Self {
            controller: PlaybackController::new(dataset, &config.chart, &config.playback),
            elapsed_ms: 0,
        }
    }

    /// Start a session from a config, loading the dataset it names.
    pub fn from_config(config: &PlayerConfig) -> Result<Self, PlayerError> {
        let path = config
            .data_path
            .as_deref()
            .ok_or(PlayerError::MissingDataPath)?;
        Ok(Self::new(load_dataset(path)?, config))
    }

    /// Load a config file and start a session from it.
    pub fn open(config_path: &Path) -> Result<Self, PlayerError> {
        Self::from_config(&PlayerConfig::load(config_path)?)
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    pub fn set_continent(&mut self, value: &str) {
        self.controller.set_filter(ContinentFilter::parse(value));
    }

    pub fn scrub(&mut self, year: i32) -> Result<(), PlayerError> {
        self.controller.scrub(year)?;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlayerError> {
        self.controller.pause()?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PlayerError> {
        self.controller.resume()?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    // -----------------------------------------------------------------------
    // Playing
    // -----------------------------------------------------------------------

    /// Render the chart as it looks right now.
    pub fn render(&self) -> Result<String, PlayerError> {
        Ok(bubbleplay_svg::render_frame(self.controller.engine())?)
    }

    /// Play for `options.duration_ms`, handing every captured frame to
    /// `on_frame`.
    pub fn play<F>(
        &mut self,
        options: PlayOptions,
        mut on_frame: F,
    ) -> Result<PlaySummary, PlayerError>
    where
        F: FnMut(&Frame) -> Result<(), PlayerError>,
    {
        let step = options.step_ms.max(1);
        let every = options.frame_every_ms.max(1);
        let mut summary = PlaySummary::default();
        let mut elapsed = 0;
        let mut next_frame = 0;

        loop {
            if elapsed >= next_frame {
                let frame = Frame {
                    number: summary.frames,
                    elapsed_ms: elapsed,
                    year: self.controller.displayed_year(),
                    svg: self.render()?,
                };
                on_frame(&frame)?;
                summary.frames += 1;
                next_frame += every;
            }
            if elapsed >= options.duration_ms {
                break;
            }
            let dt = step.min(options.duration_ms - elapsed);
            summary.ticks += self.controller.advance(dt).ticks_run;
            elapsed += dt;
        }

        self.elapsed_ms += elapsed;
        summary.elapsed_ms = elapsed;
        summary.final_year = self.controller.displayed_year();
        debug!(
            frames = summary.frames,
            ticks = summary.ticks,
            final_year = ?summary.final_year,
            "play finished"
        );
        Ok(summary)
    }

    /// Play and write each frame to `out_dir/frame_NNNNN.svg`.
    pub fn write_frames(
        &mut self,
        options: PlayOptions,
        out_dir: &Path,
    ) -> Result<PlaySummary, PlayerError> {
        fs::create_dir_all(out_dir)?;
        let summary = self.play(options, |frame| {
            fs::write(frame_path(out_dir, frame.number), &frame.svg)?;
            Ok(())
        })?;
        info!(dir = %out_dir.display(), frames = summary.frames, "frames written");
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Total simulated time played so far.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Current attributes of every rendered bubble, in paint order.
    pub fn visual_state(&self) -> Vec<VisualState> {
        self.controller.engine().scene().visual_state()
    }
}

/// File name of frame `number` inside `dir`.
pub fn frame_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("frame_{number:05}.svg"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
