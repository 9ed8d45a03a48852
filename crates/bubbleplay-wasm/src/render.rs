//! SVG frame WASM export.

use crate::{RESULT_INTERNAL_ERROR, with_chart, write_bytes};

/// Render the current frame as a standalone SVG document into the caller
/// buffer. Call with `out_len = 0` to learn the required size.
///
/// # Safety
///
/// See the crate-level notes on string output.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_render_svg(
    handle: i32,
    out_ptr: *mut u8,
    out_len: i32,
    out_written: *mut i32,
) -> i32 {
    with_chart(handle, |slot| {
        match bubbleplay_svg::render_frame(slot.controller.engine()) {
            Ok(svg) => unsafe { write_bytes(svg.as_bytes(), out_ptr, out_len, out_written) },
            Err(_) => RESULT_INTERNAL_ERROR,
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
