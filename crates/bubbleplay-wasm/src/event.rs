//! Event polling WASM exports.

use bubbleplay_core::event::ChartEvent;

use crate::{FlatEvent, RESULT_INTERNAL_ERROR, RESULT_OK, convert_event, with_chart, write_bytes};

/// Poll the unacknowledged events of the chart at `handle`. Copies
/// [`FlatEvent`] structs into the caller-provided buffer at `out_ptr`
/// (capacity `out_len` bytes).
///
/// The number of events written is stored in `*out_count_ptr`. Polling does
/// not consume events; call [`bubbleplay_clear_events`] once they are handled.
///
/// # Safety
///
/// `out_ptr` must point to a valid, `FlatEvent`-aligned buffer of at least
/// `out_len` bytes. `out_count_ptr` must be a valid, aligned pointer to a
/// `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_poll_events(
    handle: i32,
    out_ptr: *mut FlatEvent,
    out_len: i32,
    out_count_ptr: *mut u32,
) -> i32 {
    if out_ptr.is_null() || out_count_ptr.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        let max_events = out_len.max(0) as usize / std::mem::size_of::<FlatEvent>();
        let count = slot.event_cache.len().min(max_events);
        for (i, event) in slot.event_cache.iter().take(count).enumerate() {
            unsafe { out_ptr.add(i).write(convert_event(event)) };
        }
        unsafe { *out_count_ptr = count as u32 };
        RESULT_OK
    })
}

/// Acknowledge every polled event of the chart at `handle`.
///
/// Returns [`RESULT_OK`] on success, or `RESULT_INVALID_HANDLE`.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_clear_events(handle: i32) -> i32 {
    with_chart(handle, |slot| {
        slot.event_cache.clear();
        RESULT_OK
    })
}

/// Write the text payload of cached event `event_index`: the country name
/// for BubbleEntered/BubbleExited, the selector value for FilterChanged, and
/// nothing for other kinds.
///
/// Returns `RESULT_INTERNAL_ERROR` if `event_index` is past the cache.
///
/// # Safety
///
/// See the crate-level notes on string output.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_event_text(
    handle: i32,
    event_index: u32,
    out_ptr: *mut u8,
    out_len: i32,
    out_written: *mut i32,
) -> i32 {
    with_chart(handle, |slot| {
        let Some(event) = slot.event_cache.get(event_index as usize) else {
            return RESULT_INTERNAL_ERROR;
        };
        let text = match event {
            ChartEvent::BubbleEntered { country } | ChartEvent::BubbleExited { country } => {
                country.as_str()
            }
            ChartEvent::FilterChanged { filter } => filter.as_str(),
            _ => "",
        };
        unsafe { write_bytes(text.as_bytes(), out_ptr, out_len, out_written) }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
