use std::path::PathBuf;

use bubbleplay_core::dataset::DatasetError;
use bubbleplay_core::playback::PlaybackError;
use bubbleplay_svg::SvgError;

/// Errors that can occur while loading and playing a chart.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The config file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Failed to parse a config file.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// Failed to load the dataset.
    #[error("dataset error in {file}: {source}")]
    Dataset {
        file: PathBuf,
        source: DatasetError,
    },

    /// Neither the config nor the caller named a dataset file.
    #[error("no dataset path given")]
    MissingDataPath,

    /// A playback control was rejected.
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Failed to render an SVG frame.
    #[error(transparent)]
    Svg(#[from] SvgError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
