//! Player configuration files.
//!
//! A config file holds the chart geometry, the playback parameters, and the
//! dataset location. The format (RON/TOML/JSON) is detected from the file
//! extension; every section is optional.

use std::path::{Path, PathBuf};

use bubbleplay_core::config::{ChartConfig, PlaybackConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, PlayerError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(PlayerError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Parse `content` in `format`. `path` is only used for error messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
) -> Result<T, PlayerError> {
    let parse_error = |detail: String| PlayerError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from
/// extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, PlayerError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// PlayerConfig
// ===========================================================================

/// Everything needed to start a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub chart: ChartConfig,
    pub playback: PlaybackConfig,
    /// Dataset JSON file. Relative paths resolve against the config file's
    /// directory.
    pub data_path: Option<PathBuf>,
}

impl PlayerConfig {
    /// Load a config file, resolving `data_path` against its directory.
    pub fn load(path: &Path) -> Result<Self, PlayerError> {
        let mut config: PlayerConfig = deserialize_file(path)?;
        if let Some(data) = config.data_path.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.data_path = Some(if data.is_absolute() {
                data
            } else {
                base.join(data)
            });
        }
        Ok(config)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bubbleplay_core::continent::{Continent, ContinentFilter};
    use bubbleplay_core::transition::Easing;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bubbleplay_config_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("a.yaml")),
            Err(PlayerError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: PlayerConfig =
            deserialize_str("", Format::Toml, Path::new("empty.toml")).unwrap();
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn toml_overrides_are_partial() {
        let toml = r#"
data_path = "gapminder.json"

[chart.margin]
left = 80.0

[playback]
interval_ms = 250
easing = "linear"
initial_filter = "africa"
"#;
        let config: PlayerConfig =
            deserialize_str(toml, Format::Toml, Path::new("c.toml")).unwrap();
        assert_eq!(config.chart.margin.left, 80.0);
        assert_eq!(config.chart.margin.top, 10.0);
        assert_eq!(config.chart.canvas_width, 800.0);
        assert_eq!(config.playback.interval_ms, 250);
        assert_eq!(config.playback.transition_ms, 100);
        assert_eq!(config.playback.easing, Easing::Linear);
        assert_eq!(
            config.playback.initial_filter,
            ContinentFilter::Only(Continent::Africa)
        );
        assert_eq!(config.data_path, Some(PathBuf::from("gapminder.json")));
    }

    #[test]
    fn ron_and_json_parse() {
        let ron = r#"(playback: (scrubber_max: 2020), data_path: Some("d.json"))"#;
        let config: PlayerConfig = deserialize_str(ron, Format::Ron, Path::new("c.ron")).unwrap();
        assert_eq!(config.playback.scrubber_max, 2020);

        let json = r#"{"chart": {"canvas_height": 600}}"#;
        let config: PlayerConfig =
            deserialize_str(json, Format::Json, Path::new("c.json")).unwrap();
        assert_eq!(config.chart.canvas_height, 600.0);
        assert_eq!(config.chart.chart_height(), 490.0);
    }

    #[test]
    fn parse_error_names_file() {
        let err = deserialize_str::<PlayerConfig>("[[[", Format::Toml, Path::new("bad.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn load_resolves_data_path_against_config_dir() {
        let dir = make_test_dir("resolve");
        let path = dir.join("chart.toml");
        fs::write(&path, "data_path = \"data/years.json\"\n").unwrap();

        let config = PlayerConfig::load(&path).unwrap();
        assert_eq!(config.data_path, Some(dir.join("data/years.json")));
        cleanup(&dir);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = make_test_dir("missing");
        let err = PlayerConfig::load(&dir.join("nope.toml")).unwrap_err();
        assert!(matches!(err, PlayerError::Io(_)));
        cleanup(&dir);
    }
}
