//! Bubbleplay Core -- the engine behind an animated income / life
//! expectancy / population bubble chart.
//!
//! A fixed dataset of yearly country snapshots is played back on a timer.
//! Each tick reconciles the rendered bubbles against the next snapshot,
//! keyed by country, and animates them to their new positions.
//!
//! # Components
//!
//! - [`dataset::Dataset`] -- immutable yearly snapshots loaded from JSON.
//! - [`scale::ScaleSet`] -- log x (income), linear y (life expectancy),
//!   size-based radius (population), ordinal color (continent).
//! - [`surface::RenderSurface`] -- axes, titles, and legend laid out once.
//! - [`update::UpdateEngine`] -- keyed enter/update/exit reconciliation and
//!   transitions over a [`scene::Scene`].
//! - [`playback::PlaybackController`] -- play/pause/reset/scrub/filter over
//!   an explicit millisecond clock.
//!
//! # Driving the chart
//!
//! ```rust,ignore
//! let dataset = Dataset::from_json_str(&json)?;
//! let mut controller = PlaybackController::with_defaults(dataset);
//! controller.advance(16); // host frame
//! for state in controller.engine().scene().visual_state() {
//!     draw_circle(state.cx, state.cy, state.r, state.color);
//! }
//! ```

pub mod config;
pub mod continent;
pub mod dataset;
pub mod event;
pub mod id;
pub mod playback;
pub mod scale;
pub mod scene;
pub mod surface;
pub mod tooltip;
pub mod transition;
pub mod update;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ChartConfig, Margin, PlaybackConfig};
pub use continent::{Continent, ContinentFilter};
pub use dataset::{CountryRecord, Dataset, DatasetError, YearSnapshot};
pub use playback::{PlaybackController, PlaybackError, PlaybackStatus};
pub use update::{UpdateEngine, UpdateResult};
