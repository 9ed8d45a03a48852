//! Chart events recorded into a bounded ring buffer.
//!
//! The playback controller records what each operation did. Hosts poll the
//! log (the wasm bindings drain it after every call) to drive UI that lives
//! outside the chart, such as the play/pause button label.

use crate::continent::ContinentFilter;

/// Something that happened to the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartEvent {
    /// A snapshot was rendered.
    YearRendered { index: usize, year: i32 },
    BubbleEntered { country: String },
    BubbleExited { country: String },
    Paused { index: usize },
    Resumed { index: usize },
    Reset { was_paused: bool },
    Scrubbed { year: i32, index: usize },
    FilterChanged { filter: ContinentFilter },
}

/// Discriminant tag for event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    YearRendered,
    BubbleEntered,
    BubbleExited,
    Paused,
    Resumed,
    Reset,
    Scrubbed,
    FilterChanged,
}

impl ChartEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChartEvent::YearRendered { .. } => EventKind::YearRendered,
            ChartEvent::BubbleEntered { .. } => EventKind::BubbleEntered,
            ChartEvent::BubbleExited { .. } => EventKind::BubbleExited,
            ChartEvent::Paused { .. } => EventKind::Paused,
            ChartEvent::Resumed { .. } => EventKind::Resumed,
            ChartEvent::Reset { .. } => EventKind::Reset,
            ChartEvent::Scrubbed { .. } => EventKind::Scrubbed,
            ChartEvent::FilterChanged { .. } => EventKind::FilterChanged,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog: pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// Fixed-capacity event log. When full, the oldest events are dropped.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<Option<ChartEvent>>,
    /// Write position (wraps around).
    head: usize,
    len: usize,
    /// Total events ever written, including dropped ones.
    total_written: u64,
}

impl EventLog {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
        }
    }

    pub fn push(&mut self, event: ChartEvent) {
        let capacity = self.capacity();
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Events lost to overflow since the last drain.
    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.len as u64)
    }

    /// Events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ChartEvent> + '_ {
        let capacity = self.capacity();
        let start = if self.len < capacity { 0 } else { self.head };
        (0..self.len).filter_map(move |i| self.events[(start + i) % capacity].as_ref())
    }

    /// Take every buffered event, oldest first, and reset the log.
    pub fn drain(&mut self) -> Vec<ChartEvent> {
        let capacity = self.capacity();
        let start = if self.len < capacity { 0 } else { self.head };
        let drained = (0..self.len)
            .filter_map(|i| self.events[(start + i) % capacity].take())
            .collect();
        self.head = 0;
        self.len = 0;
        self.total_written = 0;
        drained
    }
}
