//! Chart geometry and playback parameters.
//!
//! Every field has a default matching the reference chart, so a config
//! file only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::continent::{Continent, ContinentFilter};
use crate::transition::Easing;

/// Space between the canvas edge and the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            left: 100.0,
            top: 10.0,
            right: 10.0,
            bottom: 100.0,
        }
    }
}

/// Canvas size, margins, and scale domains/ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub margin: Margin,
    /// Income domain for the logarithmic x scale.
    pub income_domain: [f64; 2],
    /// Life expectancy domain for the linear y scale.
    pub life_exp_domain: [f64; 2],
    /// Population domain for the bubble size scale.
    pub population_domain: [f64; 2],
    pub min_radius: f64,
    pub max_radius: f64,
    /// Legend rows and the first palette slots, in order.
    pub continents: Vec<Continent>,
    /// Explicit x axis tick values.
    pub x_ticks: Vec<f64>,
    /// Requested y axis tick count (the actual count is "nice").
    pub y_tick_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 500.0,
            margin: Margin::default(),
            income_domain: [142.0, 150_000.0],
            life_exp_domain: [0.0, 90.0],
            population_domain: [2000.0, 1_400_000_000.0],
            min_radius: 5.0,
            max_radius: 50.0,
            continents: Continent::KNOWN.to_vec(),
            x_ticks: vec![400.0, 4000.0, 40_000.0],
            y_tick_count: 10,
        }
    }
}

impl ChartConfig {
    /// Width of the plotting area inside the margins.
    pub fn chart_width(&self) -> f64 {
        self.canvas_width - self.margin.left - self.margin.right
    }

    /// Height of the plotting area inside the margins.
    pub fn chart_height(&self) -> f64 {
        self.canvas_height - self.margin.top - self.margin.bottom
    }
}

/// Timer, transition, and control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Milliseconds between ticks while playing.
    pub interval_ms: u64,
    /// Duration of each attribute transition.
    pub transition_ms: u64,
    pub easing: Easing,
    /// First year on the scrubber (maps to index 0).
    pub scrubber_min: i32,
    /// Last year on the scrubber, inclusive.
    pub scrubber_max: i32,
    pub scrubber_step: i32,
    pub initial_filter: ContinentFilter,
    /// Capacity of the event log ring buffer.
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            transition_ms: 100,
            easing: Easing::default(),
            scrubber_min: 1800,
            scrubber_max: 2014,
            scrubber_step: 1,
            initial_filter: ContinentFilter::All,
            event_capacity: 1024,
        }
    }
}
