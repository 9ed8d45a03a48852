//! Chart lifecycle WASM exports.

use bubbleplay_core::config::{ChartConfig, PlaybackConfig};
use bubbleplay_core::dataset::Dataset;
use bubbleplay_core::playback::PlaybackController;
use serde::Deserialize;

use crate::{
    ChartSlot, RESULT_INVALID_HANDLE, RESULT_OK, RESULT_PARSE_ERROR, insert_slot, read_str,
    with_chart_mut, with_table,
};

/// Optional host configuration passed as JSON: `{ "chart": {...},
/// "playback": {...} }`. Missing fields take their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HostConfig {
    chart: ChartConfig,
    playback: PlaybackConfig,
}

fn create(dataset_json: &[u8], config: HostConfig) -> i32 {
    match Dataset::from_json_slice(dataset_json) {
        Ok(dataset) => {
            let controller = PlaybackController::new(dataset, &config.chart, &config.playback);
            insert_slot(ChartSlot::new(controller))
        }
        Err(_) => -RESULT_PARSE_ERROR,
    }
}

/// Create a chart from dataset JSON at `data_ptr` (length `data_len` bytes)
/// with default configuration. Snapshot 0 is rendered immediately.
///
/// Returns a handle (>= 0) on success, or a negative error code:
/// - `-RESULT_PARSE_ERROR` if the JSON is invalid or the dataset is empty
/// - `-RESULT_TABLE_FULL` if no handle slot is available
///
/// # Safety
///
/// `data_ptr` must point to at least `data_len` valid bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_create(data_ptr: *const u8, data_len: i32) -> i32 {
    if data_ptr.is_null() || data_len <= 0 {
        return -RESULT_PARSE_ERROR;
    }
    let data = unsafe { std::slice::from_raw_parts(data_ptr, data_len as usize) };
    create(data, HostConfig::default())
}

/// Like [`bubbleplay_create`], with a JSON configuration at `config_ptr`
/// (length `config_len` bytes).
///
/// # Safety
///
/// `data_ptr` must point to at least `data_len` valid bytes and
/// `config_ptr` to at least `config_len` valid bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_create_with_config(
    data_ptr: *const u8,
    data_len: i32,
    config_ptr: *const u8,
    config_len: i32,
) -> i32 {
    if data_ptr.is_null() || data_len <= 0 {
        return -RESULT_PARSE_ERROR;
    }
    let Some(config_json) = (unsafe { read_str(config_ptr, config_len) }) else {
        return -RESULT_PARSE_ERROR;
    };
    let Ok(config) = serde_json::from_str::<HostConfig>(config_json) else {
        return -RESULT_PARSE_ERROR;
    };
    let data = unsafe { std::slice::from_raw_parts(data_ptr, data_len as usize) };
    create(data, config)
}

/// Destroy the chart at `handle` and free its slot.
///
/// Returns [`RESULT_OK`] on success, or [`RESULT_INVALID_HANDLE`] if the
/// handle is out of range or already destroyed.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_destroy(handle: i32) -> i32 {
    with_table(|table| {
        if handle < 0 {
            return RESULT_INVALID_HANDLE;
        }
        match table.get_mut(handle as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                RESULT_OK
            }
            _ => RESULT_INVALID_HANDLE,
        }
    })
}

/// Let `dt_ms` milliseconds pass: run due ticks, then advance transitions.
///
/// Returns [`RESULT_OK`] on success, or [`RESULT_INVALID_HANDLE`].
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_advance(handle: i32, dt_ms: u64) -> i32 {
    with_chart_mut(handle, |controller| {
        controller.advance(dt_ms);
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
