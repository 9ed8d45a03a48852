//! Host-side player for the bubble chart.
//!
//! Loads a [`PlayerConfig`] and a dataset file, drives the chart on a
//! simulated clock through a [`Session`], and writes SVG frames. The
//! `bubbleplay` binary is a thin CLI over this crate.

pub mod config;
pub mod error;
pub mod session;

pub use config::PlayerConfig;
pub use error::PlayerError;
pub use session::{Frame, PlayOptions, PlaySummary, Session};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default `info` filter.
///
/// Use the `RUST_LOG` environment variable to override it.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}
