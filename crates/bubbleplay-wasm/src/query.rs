//! Query WASM exports.

use crate::playback::status_code;
use crate::{
    FlatBubble, RESULT_INTERNAL_ERROR, RESULT_OK, bubble_id_to_ffi, hex_color, with_chart,
    write_bytes,
};

/// Write the year shown by the year label to `*out_year`.
///
/// # Safety
///
/// `out_year` must be a valid, aligned pointer to an `i32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_year(handle: i32, out_year: *mut i32) -> i32 {
    if out_year.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        let year = slot
            .controller
            .displayed_year()
            .unwrap_or(slot.controller.current_snapshot().year);
        unsafe { *out_year = year };
        RESULT_OK
    })
}

/// Write the playback status to `*out_status` (0 = Playing, 1 = Paused).
///
/// # Safety
///
/// `out_status` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_status(handle: i32, out_status: *mut u32) -> i32 {
    if out_status.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        unsafe { *out_status = status_code(slot.controller.status()) };
        RESULT_OK
    })
}

/// Write the current dataset index to `*out_index`.
///
/// # Safety
///
/// `out_index` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_data_index(handle: i32, out_index: *mut u32) -> i32 {
    if out_index.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        unsafe { *out_index = slot.controller.data_index() as u32 };
        RESULT_OK
    })
}

/// Write the slider handle position (a year) to `*out_value`.
///
/// # Safety
///
/// `out_value` must be a valid, aligned pointer to an `i32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_slider_value(handle: i32, out_value: *mut i32) -> i32 {
    if out_value.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        unsafe { *out_value = slot.controller.engine().scrubber().value() };
        RESULT_OK
    })
}

/// Write the number of rendered bubbles to `*out_count`.
///
/// # Safety
///
/// `out_count` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_bubble_count(handle: i32, out_count: *mut u32) -> i32 {
    if out_count.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        unsafe { *out_count = slot.controller.engine().scene().len() as u32 };
        RESULT_OK
    })
}

/// Copy the current attributes of rendered bubbles, in paint order, into the
/// caller buffer at `out_ptr` (capacity `out_len` bytes) as [`FlatBubble`]
/// structs. The number written is stored in `*out_count`.
///
/// # Safety
///
/// `out_ptr` must point to a valid, `FlatBubble`-aligned buffer of at least
/// `out_len` bytes. `out_count` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_read_bubbles(
    handle: i32,
    out_ptr: *mut FlatBubble,
    out_len: i32,
    out_count: *mut u32,
) -> i32 {
    if out_ptr.is_null() || out_count.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        let max = out_len.max(0) as usize / std::mem::size_of::<FlatBubble>();
        let mut count = 0;
        for (id, bubble) in slot.controller.engine().scene().iter().take(max) {
            let a = bubble.attrs();
            let flat = FlatBubble {
                id: bubble_id_to_ffi(id),
                cx: a.cx,
                cy: a.cy,
                r: a.r,
                color: hex_color(bubble.fill),
                animating: u32::from(bubble.is_animating()),
            };
            unsafe { out_ptr.add(count).write(flat) };
            count += 1;
        }
        unsafe { *out_count = count as u32 };
        RESULT_OK
    })
}

/// Write the tooltip text (lines joined by `\n`) into the caller buffer.
/// Writes 0 bytes when the tooltip is hidden.
///
/// # Safety
///
/// See the crate-level notes on string output.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_tooltip_text(
    handle: i32,
    out_ptr: *mut u8,
    out_len: i32,
    out_written: *mut i32,
) -> i32 {
    with_chart(handle, |slot| {
        let text = slot
            .controller
            .engine()
            .tooltip_lines()
            .map(|lines| lines.join("\n"))
            .unwrap_or_default();
        unsafe { write_bytes(text.as_bytes(), out_ptr, out_len, out_written) }
    })
}

/// Write the play/pause button label ("Pause" or "Play").
///
/// # Safety
///
/// See the crate-level notes on string output.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_button_label(
    handle: i32,
    out_ptr: *mut u8,
    out_len: i32,
    out_written: *mut i32,
) -> i32 {
    with_chart(handle, |slot| {
        let label = slot.controller.status().button_label();
        unsafe { write_bytes(label.as_bytes(), out_ptr, out_len, out_written) }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
