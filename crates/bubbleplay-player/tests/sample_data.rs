//! Plays the shipped sample config and dataset.

use std::path::{Path, PathBuf};

use bubbleplay_player::{PlayOptions, PlayerConfig, Session};

fn sample_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("bubbleplay.toml")
}

#[test]
fn sample_config_points_at_sample_data() {
    let config = PlayerConfig::load(&sample_config()).unwrap();
    let data = config.data_path.unwrap();
    assert!(data.ends_with("data/sample.json"));
    assert!(data.exists());
    assert_eq!(config.playback.interval_ms, 100);
}

#[test]
fn sample_dataset_drops_incomplete_record() {
    let session = Session::open(&sample_config()).unwrap();
    let dataset = session.controller().dataset();
    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset[0].countries.len(), 9);
    // Egypt has no income in 1802.
    assert_eq!(dataset[2].countries.len(), 8);
    assert!(dataset[2].country("Egypt").is_none());
}

#[test]
fn egypt_exits_and_reenters() {
    let mut session = Session::open(&sample_config()).unwrap();
    let mut counts = Vec::new();
    session
        .play(
            PlayOptions {
                duration_ms: 300,
                step_ms: 10,
                frame_every_ms: 100,
            },
            |frame| {
                counts.push((frame.year, frame.svg.matches("<circle").count()));
                Ok(())
            },
        )
        .unwrap();
    assert_eq!(
        counts,
        vec![
            (Some(1800), 9),
            (Some(1801), 9),
            (Some(1802), 8),
            (Some(1803), 9),
        ]
    );
}

#[test]
fn continent_filter_from_config() {
    let mut config = PlayerConfig::load(&sample_config()).unwrap();
    config.playback.initial_filter = "americas".into();
    let session = Session::from_config(&config).unwrap();
    let mut countries: Vec<String> = session
        .visual_state()
        .into_iter()
        .map(|b| b.country)
        .collect();
    countries.sort();
    assert_eq!(countries, vec!["Brazil", "United States"]);
}
