//! WASM bindings for the bubble chart.
//!
//! This crate exposes a C-compatible, integer-handle-based API so a browser
//! host can drive a [`PlaybackController`]: hand over the dataset JSON, feed
//! elapsed time from `requestAnimationFrame`, forward button, selector,
//! slider, and pointer input, then read back bubble attributes or a whole SVG
//! frame. The same API also works as a plain `cdylib` on native targets.
//!
//! # Handle Table
//!
//! Charts are referenced by integer handles (indices into a fixed-size
//! handle table). Up to [`MAX_CHARTS`] charts may exist simultaneously.
//!
//! # Pull-based Events
//!
//! Every call that changes a chart appends the controller's new events to
//! the slot's event cache. The host reads the cache with
//! `bubbleplay_poll_events` and `bubbleplay_event_text`, then acknowledges
//! it with `bubbleplay_clear_events`. Events from input handlers therefore
//! survive the next frame's `bubbleplay_advance`. The cache keeps at most
//! the event log capacity, dropping the oldest first.
//!
//! # Strings
//!
//! Functions returning text write UTF-8 bytes into a caller buffer and always
//! report the full length in `*out_written`. If the buffer is too small they
//! return [`RESULT_BUFFER_TOO_SMALL`] without writing, so a host can size the
//! buffer by calling once with `out_len = 0`.

pub mod chart;
pub mod event;
pub mod playback;
pub mod pointer;
pub mod query;
pub mod render;

use std::cell::RefCell;

use bubbleplay_core::event::{ChartEvent, EventKind};
use bubbleplay_core::id::BubbleId;
use bubbleplay_core::playback::{PlaybackController, PlaybackError};

use slotmap::{Key, KeyData};

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Success.
pub const RESULT_OK: i32 = 0;
/// The chart handle is invalid.
pub const RESULT_INVALID_HANDLE: i32 = 1;
/// The dataset or config JSON could not be parsed.
pub const RESULT_PARSE_ERROR: i32 = 2;
/// The action is not valid in the current playback state.
pub const RESULT_INVALID_STATE: i32 = 3;
/// The scrubbed year is outside the slider range.
pub const RESULT_YEAR_OUT_OF_RANGE: i32 = 4;
/// The scrubbed year maps past the end of the dataset.
pub const RESULT_YEAR_NOT_IN_DATASET: i32 = 5;
/// The caller buffer is too small for the output.
pub const RESULT_BUFFER_TOO_SMALL: i32 = 6;
/// A null pointer or other internal error.
pub const RESULT_INTERNAL_ERROR: i32 = 7;
/// No free slot in the handle table.
pub const RESULT_TABLE_FULL: i32 = 8;

// ---------------------------------------------------------------------------
// Handle table
// ---------------------------------------------------------------------------

/// Maximum number of simultaneous chart instances.
pub const MAX_CHARTS: usize = 16;

/// Per-chart state held in the handle table.
pub struct ChartSlot {
    pub controller: PlaybackController,
    /// Events not yet acknowledged by the host, oldest first.
    pub event_cache: Vec<ChartEvent>,
}

impl ChartSlot {
    fn new(controller: PlaybackController) -> Self {
        let mut slot = Self {
            controller,
            event_cache: Vec::new(),
        };
        slot.refresh_events();
        slot
    }

    /// Append whatever the controller logged since last time.
    fn refresh_events(&mut self) {
        self.event_cache.extend(self.controller.drain_events());
        let capacity = self.controller.events().capacity();
        if self.event_cache.len() > capacity {
            let excess = self.event_cache.len() - capacity;
            self.event_cache.drain(..excess);
        }
    }
}

/// Flat, `repr(C)` event representation for WASM consumers.
///
/// `kind` codes: 0 = YearRendered, 1 = BubbleEntered, 2 = BubbleExited,
/// 3 = Paused, 4 = Resumed, 5 = Reset, 6 = Scrubbed, 7 = FilterChanged.
/// For Reset, `flag` is 1 when the chart was paused. Country and filter text
/// are fetched with `bubbleplay_event_text`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatEvent {
    pub kind: u32,
    pub year: i32,
    pub index: u32,
    pub flag: u32,
}

/// Flat, `repr(C)` bubble attributes for WASM consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatBubble {
    pub id: u64,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    /// Fill as `0xRRGGBB`.
    pub color: u32,
    /// 1 while a transition is in flight.
    pub animating: u32,
}

thread_local! {
    static HANDLE_TABLE: RefCell<Vec<Option<ChartSlot>>> = RefCell::new({
        let mut v = Vec::with_capacity(MAX_CHARTS);
        v.resize_with(MAX_CHARTS, || None);
        v
    });
}

/// Run a closure with mutable access to the handle table.
fn with_table<F, R>(f: F) -> R
where
    F: FnOnce(&mut Vec<Option<ChartSlot>>) -> R,
{
    HANDLE_TABLE.with(|table| f(&mut table.borrow_mut()))
}

/// Run a closure with mutable access to the [`ChartSlot`] at `handle`.
/// Returns [`RESULT_INVALID_HANDLE`] if the handle is out of range or empty.
fn with_chart<F>(handle: i32, f: F) -> i32
where
    F: FnOnce(&mut ChartSlot) -> i32,
{
    with_table(|table| {
        if handle < 0 {
            return RESULT_INVALID_HANDLE;
        }
        match table.get_mut(handle as usize).and_then(Option::as_mut) {
            Some(slot) => f(slot),
            None => RESULT_INVALID_HANDLE,
        }
    })
}

/// Like [`with_chart`], for calls that change the chart: the event cache is
/// refreshed afterwards.
fn with_chart_mut<F>(handle: i32, f: F) -> i32
where
    F: FnOnce(&mut PlaybackController) -> i32,
{
    with_chart(handle, |slot| {
        let rc = f(&mut slot.controller);
        slot.refresh_events();
        rc
    })
}

/// Store `slot` in the first free entry. Returns the handle, or
/// `-RESULT_TABLE_FULL`.
fn insert_slot(slot: ChartSlot) -> i32 {
    with_table(|table| match table.iter().position(Option::is_none) {
        Some(i) => {
            table[i] = Some(slot);
            i as i32
        }
        None => -RESULT_TABLE_FULL,
    })
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn bubble_id_to_ffi(id: BubbleId) -> u64 {
    id.data().as_ffi()
}

fn ffi_to_bubble_id(ffi: u64) -> BubbleId {
    KeyData::from_ffi(ffi).into()
}

fn playback_error_code(error: &PlaybackError) -> i32 {
    match error {
        PlaybackError::InvalidTransition { .. } => RESULT_INVALID_STATE,
        PlaybackError::YearOutOfRange { .. } => RESULT_YEAR_OUT_OF_RANGE,
        PlaybackError::YearNotInDataset { .. } => RESULT_YEAR_NOT_IN_DATASET,
    }
}

/// Parse `#rrggbb` into `0xRRGGBB`. Anything else is black.
fn hex_color(color: &str) -> u32 {
    color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .unwrap_or(0)
}

fn event_kind_code(kind: EventKind) -> u32 {
    match kind {
        EventKind::YearRendered => 0,
        EventKind::BubbleEntered => 1,
        EventKind::BubbleExited => 2,
        EventKind::Paused => 3,
        EventKind::Resumed => 4,
        EventKind::Reset => 5,
        EventKind::Scrubbed => 6,
        EventKind::FilterChanged => 7,
    }
}

fn convert_event(event: &ChartEvent) -> FlatEvent {
    let kind = event_kind_code(event.kind());
    match event {
        ChartEvent::YearRendered { index, year } | ChartEvent::Scrubbed { year, index } => {
            FlatEvent {
                kind,
                year: *year,
                index: *index as u32,
                ..Default::default()
            }
        }
        ChartEvent::Paused { index } | ChartEvent::Resumed { index } => FlatEvent {
            kind,
            index: *index as u32,
            ..Default::default()
        },
        ChartEvent::Reset { was_paused } => FlatEvent {
            kind,
            flag: u32::from(*was_paused),
            ..Default::default()
        },
        ChartEvent::BubbleEntered { .. }
        | ChartEvent::BubbleExited { .. }
        | ChartEvent::FilterChanged { .. } => FlatEvent {
            kind,
            ..Default::default()
        },
    }
}

/// Borrow `len` bytes at `ptr` as UTF-8.
///
/// # Safety
///
/// `ptr` must point to at least `len` valid bytes.
unsafe fn read_str<'a>(ptr: *const u8, len: i32) -> Option<&'a str> {
    if ptr.is_null() || len < 0 {
        return None;
    }
    let bytes = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    std::str::from_utf8(bytes).ok()
}

/// Copy `bytes` into the caller buffer, reporting the full length.
///
/// # Safety
///
/// `out_ptr` must point to at least `out_len` writable bytes (it may be null
/// when `out_len` is 0). `out_written` must be a valid, aligned pointer.
unsafe fn write_bytes(bytes: &[u8], out_ptr: *mut u8, out_len: i32, out_written: *mut i32) -> i32 {
    if out_written.is_null() || (out_ptr.is_null() && out_len > 0) {
        return RESULT_INTERNAL_ERROR;
    }
    unsafe { *out_written = bytes.len() as i32 };
    if bytes.len() > out_len.max(0) as usize {
        return RESULT_BUFFER_TOO_SMALL;
    }
    if !bytes.is_empty() {
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), out_ptr, bytes.len()) };
    }
    RESULT_OK
}

// ---------------------------------------------------------------------------
// Linear-memory allocator exports
// ---------------------------------------------------------------------------

/// Allocate `size` bytes aligned to `align` in the WASM linear memory.
/// Returns a pointer to the allocated region, or null on failure.
///
/// # Safety
///
/// The caller must ensure `size` and `align` are valid (align must be a
/// power of two and non-zero).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_alloc(size: usize, align: usize) -> *mut u8 {
    if size == 0 || align == 0 || !align.is_power_of_two() {
        return std::ptr::null_mut();
    }
    match std::alloc::Layout::from_size_align(size, align) {
        // SAFETY: the layout has non-zero size.
        Ok(layout) => unsafe { std::alloc::alloc(layout) },
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a region previously allocated by [`bubbleplay_alloc`].
///
/// # Safety
///
/// `ptr` must have been returned by `bubbleplay_alloc` with the same `size`
/// and `align` values.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bubbleplay_free(ptr: *mut u8, size: usize, align: usize) {
    if ptr.is_null() || size == 0 || align == 0 || !align.is_power_of_two() {
        return;
    }
    // SAFETY: caller guarantees ptr/size/align match a previous alloc call.
    if let Ok(layout) = std::alloc::Layout::from_size_align(size, align) {
        unsafe { std::alloc::dealloc(ptr, layout) };
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------
