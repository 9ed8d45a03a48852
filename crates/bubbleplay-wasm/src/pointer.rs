//! Pointer interaction WASM exports driving the tooltip.

use crate::{RESULT_INTERNAL_ERROR, RESULT_OK, bubble_id_to_ffi, with_chart};

/// Route a pointer position to the chart. `canvas_x`/`canvas_y` are relative
/// to the SVG element and are hit-tested against the drawn bubbles;
/// `page_x`/`page_y` position the tooltip.
///
/// Writes the hovered bubble id to `*out_bubble`, or 0 when the pointer is
/// over no bubble.
///
/// # Safety
///
/// `out_bubble` must be a valid, aligned pointer to a `u64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_pointer_at(
    handle: i32,
    canvas_x: f64,
    canvas_y: f64,
    page_x: f64,
    page_y: f64,
    out_bubble: *mut u64,
) -> i32 {
    if out_bubble.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart(handle, |slot| {
        let hit = slot
            .controller
            .engine_mut()
            .pointer_at(canvas_x, canvas_y, page_x, page_y);
        unsafe { *out_bubble = hit.map_or(0, bubble_id_to_ffi) };
        RESULT_OK
    })
}

/// The pointer left the chart: hide the tooltip.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_pointer_leave(handle: i32) -> i32 {
    with_chart(handle, |slot| {
        slot.controller.engine_mut().pointer_out();
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
