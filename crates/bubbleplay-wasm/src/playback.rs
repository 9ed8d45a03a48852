//! Playback control WASM exports: the play/pause button, reset, the year
//! slider, and the continent selector.

use bubbleplay_core::continent::ContinentFilter;
use bubbleplay_core::playback::PlaybackStatus;

use crate::{
    RESULT_INTERNAL_ERROR, RESULT_OK, RESULT_PARSE_ERROR, playback_error_code, read_str,
    with_chart_mut,
};

/// Status discriminant: 0 = Playing, 1 = Paused.
pub(crate) fn status_code(status: PlaybackStatus) -> u32 {
    match status {
        PlaybackStatus::Playing => 0,
        PlaybackStatus::Paused => 1,
    }
}

/// Run one timer tick immediately: advance to the next snapshot (wrapping)
/// and render it.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_tick(handle: i32) -> i32 {
    with_chart_mut(handle, |controller| {
        controller.tick();
        RESULT_OK
    })
}

/// Pause playback. Returns `RESULT_INVALID_STATE` if already paused.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_pause(handle: i32) -> i32 {
    with_chart_mut(handle, |controller| match controller.pause() {
        Ok(()) => RESULT_OK,
        Err(e) => playback_error_code(&e),
    })
}

/// Resume playback. Returns `RESULT_INVALID_STATE` if already playing.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_resume(handle: i32) -> i32 {
    with_chart_mut(handle, |controller| match controller.resume() {
        Ok(()) => RESULT_OK,
        Err(e) => playback_error_code(&e),
    })
}

/// The play/pause button. Writes the new status to `*out_status`
/// (0 = Playing, 1 = Paused).
///
/// # Safety
///
/// `out_status` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_toggle(handle: i32, out_status: *mut u32) -> i32 {
    if out_status.is_null() {
        return RESULT_INTERNAL_ERROR;
    }
    with_chart_mut(handle, |controller| {
        let status = controller.toggle();
        unsafe { *out_status = status_code(status) };
        RESULT_OK
    })
}

/// The reset button: rewind to the first snapshot. Renders now when paused,
/// on the next tick when playing.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_reset(handle: i32) -> i32 {
    with_chart_mut(handle, |controller| {
        controller.reset();
        RESULT_OK
    })
}

/// The year slider: jump to `year` and render it.
///
/// Returns `RESULT_YEAR_OUT_OF_RANGE` or `RESULT_YEAR_NOT_IN_DATASET` when
/// the year cannot be shown; the chart is left unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn bubbleplay_scrub(handle: i32, year: i32) -> i32 {
    with_chart_mut(handle, |controller| match controller.scrub(year) {
        Ok(_) => RESULT_OK,
        Err(e) => playback_error_code(&e),
    })
}

/// The continent selector: re-render the current year with the filter named
/// by the UTF-8 string at `value_ptr` (`"all"` or a continent name).
///
/// # Safety
///
/// `value_ptr` must point to at least `value_len` valid bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_set_continent(
    handle: i32,
    value_ptr: *const u8,
    value_len: i32,
) -> i32 {
    let Some(value) = (unsafe { read_str(value_ptr, value_len) }) else {
        return RESULT_PARSE_ERROR;
    };
    let filter = ContinentFilter::parse(value);
    with_chart_mut(handle, |controller| {
        controller.set_filter(filter);
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cleanup, create_three_year};
    use crate::{
        RESULT_INVALID_HANDLE, RESULT_INVALID_STATE, RESULT_YEAR_NOT_IN_DATASET,
        RESULT_YEAR_OUT_OF_RANGE, with_chart,
    };

    fn data_index(h: i32) -> usize {
        let mut index = 0;
        with_chart(h, |slot| {
            index = slot.controller.data_index();
            RESULT_OK
        });
        index
    }

    #[test]
    fn tick_advances_and_wraps() {
        cleanup();
        let h = create_three_year();
        assert_eq!(bubbleplay_tick(h), RESULT_OK);
        assert_eq!(data_index(h), 1);
        bubbleplay_tick(h);
        bubbleplay_tick(h);
        assert_eq!(data_index(h), 0);
        cleanup();
    }

    #[test]
    fn pause_twice_is_invalid_state() {
        cleanup();
        let h = create_three_year();
        assert_eq!(bubbleplay_pause(h), RESULT_OK);
        assert_eq!(bubbleplay_pause(h), RESULT_INVALID_STATE);
        assert_eq!(bubbleplay_resume(h), RESULT_OK);
        assert_eq!(bubbleplay_resume(h), RESULT_INVALID_STATE);
        cleanup();
    }

    #[test]
    fn toggle_reports_status() {
        cleanup();
        let h = create_three_year();
        let mut status = 99;
        assert_eq!(unsafe { bubbleplay_toggle(h, &mut status) }, RESULT_OK);
        assert_eq!(status, 1);
        assert_eq!(unsafe { bubbleplay_toggle(h, &mut status) }, RESULT_OK);
        assert_eq!(status, 0);
        assert_eq!(
            unsafe { bubbleplay_toggle(h, std::ptr::null_mut()) },
            RESULT_INTERNAL_ERROR
        );
        cleanup();
    }

    #[test]
    fn reset_while_paused_renders_first_year() {
        cleanup();
        let h = create_three_year();
        bubbleplay_tick(h);
        bubbleplay_pause(h);
        assert_eq!(bubbleplay_reset(h), RESULT_OK);
        assert_eq!(data_index(h), 0);
        cleanup();
    }

    #[test]
    fn scrub_maps_errors_to_codes() {
        cleanup();
        let h = create_three_year();
        assert_eq!(bubbleplay_scrub(h, 1802), RESULT_OK);
        assert_eq!(data_index(h), 2);
        assert_eq!(bubbleplay_scrub(h, 1700), RESULT_YEAR_OUT_OF_RANGE);
        assert_eq!(bubbleplay_scrub(h, 1950), RESULT_YEAR_NOT_IN_DATASET);
        assert_eq!(data_index(h), 2);
        assert_eq!(bubbleplay_scrub(99, 1800), RESULT_INVALID_HANDLE);
        cleanup();
    }

    #[test]
    fn set_continent_filters_scene() {
        cleanup();
        let h = create_three_year();
        let value = "asia";
        assert_eq!(
            unsafe { bubbleplay_set_continent(h, value.as_ptr(), value.len() as i32) },
            RESULT_OK
        );
        with_chart(h, |slot| {
            let scene = slot.controller.engine().scene();
            assert_eq!(scene.len(), 1);
            assert!(scene.id_of("China").is_some());
            RESULT_OK
        });
        cleanup();
    }
}
