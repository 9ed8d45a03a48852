//! Playback controller: the timer-driven loop over the dataset.
//!
//! # States
//!
//! `Playing` and `Paused`; the controller starts `Playing` with snapshot 0
//! already rendered.
//!
//! - **Tick** -- advance `data_index` (wrapping at the end) and render it.
//! - **Pause** / **Resume** -- stop or restart the interval timer.
//! - **Reset** -- rewind to index 0. Paused: render now. Playing: the next
//!   tick renders index 0 in place.
//! - **Scrub** -- jump to a year's index and render, leaving the timer alone.
//! - **Filter** -- re-render the current index with a new continent filter.
//!
//! # Clock
//!
//! Time only moves when the host calls [`PlaybackController::advance`] with
//! elapsed milliseconds. Elapsed time accumulates and one tick runs per full
//! interval, carrying the remainder. Transitions advance up to each tick, so
//! a transition started by a tick only sees the time elapsed after it.
//! While paused, transitions still advance by the full `dt`.

use tracing::{debug, info};

use crate::config::{ChartConfig, PlaybackConfig};
use crate::continent::ContinentFilter;
use crate::dataset::{Dataset, YearSnapshot};
use crate::event::{ChartEvent, EventLog};
use crate::update::{UpdateEngine, UpdateResult};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("cannot {action} while {status}")]
    InvalidTransition {
        action: &'static str,
        status: PlaybackStatus,
    },
    #[error("year {year} is outside the scrubber range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("year {year} maps to index {index}, past the end of the dataset ({len} snapshots)")]
    YearNotInDataset { year: i32, index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    Playing,
    Paused,
}

impl PlaybackStatus {
    /// Label of the play/pause toggle button in this state.
    pub fn button_label(self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "Pause",
            PlaybackStatus::Paused => "Play",
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Playing => f.write_str("playing"),
            PlaybackStatus::Paused => f.write_str("paused"),
        }
    }
}

/// Mutable playback position and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    /// Index of the snapshot currently shown (or about to be, after a reset
    /// while playing).
    pub data_index: usize,
    pub status: PlaybackStatus,
    pub filter: ContinentFilter,
    /// Set by reset while playing: the next tick renders `data_index`
    /// without advancing.
    restart_pending: bool,
}

impl PlaybackState {
    pub fn new(filter: ContinentFilter) -> Self {
        Self {
            data_index: 0,
            status: PlaybackStatus::Playing,
            filter,
            restart_pending: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}

// ---------------------------------------------------------------------------
// Interval timer
// ---------------------------------------------------------------------------

/// Fixed-period timer fed with elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period_ms: u64,
    accumulator: u64,
    running: bool,
}

impl IntervalTimer {
    /// A running timer. A zero period is clamped to 1 ms.
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulator: 0,
            running: true,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop and discard partial progress.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0;
    }

    /// Start a fresh interval.
    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0;
    }

    /// Time left in the current period, or `None` when stopped.
    pub fn until_next(&self) -> Option<u64> {
        self.running.then(|| self.period_ms - self.accumulator)
    }

    /// Partial progress into the current period.
    pub fn accumulator(&self) -> u64 {
        self.accumulator
    }

    /// Feed elapsed time; returns the number of periods that completed.
    pub fn advance(&mut self, dt_ms: u64) -> u64 {
        if !self.running {
            return 0;
        }
        self.accumulator = self.accumulator.saturating_add(dt_ms);
        let fired = self.accumulator / self.period_ms;
        self.accumulator %= self.period_ms;
        fired
    }
}

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceResult {
    /// Ticks run during this call.
    pub ticks_run: u64,
    /// Transitions still in flight afterwards.
    pub animating: usize,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives the update engine through the dataset.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    dataset: Dataset,
    engine: UpdateEngine,
    state: PlaybackState,
    timer: IntervalTimer,
    events: EventLog,
}

impl PlaybackController {
    /// Build the controller and render snapshot 0.
    pub fn new(dataset: Dataset, chart: &ChartConfig, playback: &PlaybackConfig) -> Self {
        let mut controller = Self {
            dataset,
            engine: UpdateEngine::new(chart, playback),
            state: PlaybackState::new(playback.initial_filter.clone()),
            timer: IntervalTimer::new(playback.interval_ms),
            events: EventLog::new(playback.event_capacity),
        };
        controller.render();
        controller
    }

    /// Build with default chart and playback configuration.
    pub fn with_defaults(dataset: Dataset) -> Self {
        Self::new(dataset, &ChartConfig::default(), &PlaybackConfig::default())
    }

    // -----------------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------------

    /// Let `dt_ms` of wall time pass. Each due tick runs at its own point in
    /// time: transitions advance up to the tick, the tick renders, and only
    /// the time after it reaches the transitions it started.
    pub fn advance(&mut self, dt_ms: u64) -> AdvanceResult {
        let mut remaining = dt_ms;
        let mut ticks_run = 0;
        while let Some(until) = self.timer.until_next().filter(|&u| u <= remaining) {
            self.engine.advance_transitions(until);
            self.timer.advance(until);
            remaining -= until;
            self.tick();
            ticks_run += 1;
        }
        self.timer.advance(remaining);
        AdvanceResult {
            ticks_run,
            animating: self.engine.advance_transitions(remaining),
        }
    }

    /// One timer tick: step to the next snapshot (wrapping) and render it.
    pub fn tick(&mut self) -> UpdateResult {
        if self.state.restart_pending {
            self.state.restart_pending = false;
        } else {
            self.state.data_index = (self.state.data_index + 1) % self.dataset.len();
        }
        self.render()
    }

    // -----------------------------------------------------------------------
    // User actions
    // -----------------------------------------------------------------------

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state.status != PlaybackStatus::Playing {
            return Err(PlaybackError::InvalidTransition {
                action: "pause",
                status: self.state.status,
            });
        }
        self.timer.stop();
        self.state.status = PlaybackStatus::Paused;
        self.events.push(ChartEvent::Paused {
            index: self.state.data_index,
        });
        info!(index = self.state.data_index, "playback paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state.status != PlaybackStatus::Paused {
            return Err(PlaybackError::InvalidTransition {
                action: "resume",
                status: self.state.status,
            });
        }
        self.timer.start();
        self.state.status = PlaybackStatus::Playing;
        self.events.push(ChartEvent::Resumed {
            index: self.state.data_index,
        });
        info!(index = self.state.data_index, "playback resumed");
        Ok(())
    }

    /// The play/pause button: pause when playing, resume when paused.
    /// Returns the new status.
    pub fn toggle(&mut self) -> PlaybackStatus {
        let result = match self.state.status {
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Paused => self.resume(),
        };
        if let Err(err) = result {
            debug!(%err, "toggle rejected");
        }
        self.state.status
    }

    /// Rewind to index 0. Renders immediately only when paused.
    pub fn reset(&mut self) -> Option<UpdateResult> {
        let was_paused = !self.state.is_playing();
        self.state.data_index = 0;
        self.events.push(ChartEvent::Reset { was_paused });
        info!(was_paused, "playback reset");
        if was_paused {
            self.state.restart_pending = false;
            Some(self.render())
        } else {
            self.state.restart_pending = true;
            None
        }
    }

    /// Jump to `year` via the scrubber's year table and render it now.
    pub fn scrub(&mut self, year: i32) -> Result<UpdateResult, PlaybackError> {
        let scrubber = self.engine.scrubber();
        let index = scrubber
            .index_of(year)
            .ok_or(PlaybackError::YearOutOfRange {
                year,
                min: scrubber.min(),
                max: scrubber.max(),
            })?;
        if index >= self.dataset.len() {
            return Err(PlaybackError::YearNotInDataset {
                year,
                index,
                len: self.dataset.len(),
            });
        }
        self.state.data_index = index;
        self.state.restart_pending = false;
        self.events.push(ChartEvent::Scrubbed { year, index });
        Ok(self.render())
    }

    /// Re-render the current snapshot with a new continent filter.
    pub fn set_filter(&mut self, filter: ContinentFilter) -> UpdateResult {
        self.state.filter = filter.clone();
        self.events.push(ChartEvent::FilterChanged { filter });
        self.render()
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&mut self) -> UpdateResult {
        let index = self.state.data_index;
        let snapshot = &self.dataset[index];
        let result = self.engine.update(snapshot, &self.state.filter);
        for country in &result.exited {
            self.events.push(ChartEvent::BubbleExited {
                country: country.clone(),
            });
        }
        for country in &result.entered {
            self.events.push(ChartEvent::BubbleEntered {
                country: country.clone(),
            });
        }
        self.events.push(ChartEvent::YearRendered {
            index,
            year: result.year,
        });
        result
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    pub fn data_index(&self) -> usize {
        self.state.data_index
    }

    pub fn filter(&self) -> &ContinentFilter {
        &self.state.filter
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Snapshot at the current index.
    pub fn current_snapshot(&self) -> &YearSnapshot {
        &self.dataset[self.state.data_index]
    }

    /// Year shown by the year label.
    pub fn displayed_year(&self) -> Option<i32> {
        self.engine.year_label()?.parse().ok()
    }

    pub fn engine(&self) -> &UpdateEngine {
        &self.engine
    }

    /// Mutable engine access, for pointer interaction.
    pub fn engine_mut(&mut self) -> &mut UpdateEngine {
        &mut self.engine
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take all buffered events, oldest first.
    pub fn drain_events(&mut self) -> Vec<ChartEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn starts_playing_with_first_snapshot_rendered() {
        let c = PlaybackController::with_defaults(three_year_dataset());
        assert_eq!(c.status(), PlaybackStatus::Playing);
        assert_eq!(c.data_index(), 0);
        assert_eq!(c.displayed_year(), Some(1800));
        assert_eq!(c.engine().scene().len(), 2);
    }

    #[test]
    fn tick_wraps_around() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        assert_eq!(c.tick().year, 1801);
        assert_eq!(c.tick().year, 1802);
        assert_eq!(c.tick().year, 1800);
        assert_eq!(c.data_index(), 0);
    }

    #[test]
    fn advance_runs_one_tick_per_interval() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        assert_eq!(c.advance(60).ticks_run, 0);
        assert_eq!(c.advance(60).ticks_run, 1);
        assert_eq!(c.displayed_year(), Some(1801));
        assert_eq!(c.advance(200).ticks_run, 2);
        assert_eq!(c.displayed_year(), Some(1800));
    }

    #[test]
    fn tick_transitions_start_at_the_tick() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.engine_mut().finish_transitions();

        // A host stepping at the full interval still sees the move animate.
        let result = c.advance(100);
        assert_eq!(result.ticks_run, 1);
        assert_eq!(result.animating, 2);

        let id = c.engine().scene().id_of("Norway").unwrap();
        let bubble = c.engine().scene().get(id).unwrap();
        assert!(bubble.is_animating());
        let started = bubble.attrs();

        // 50 ms later the move is under way but not done.
        assert_eq!(c.advance(50).animating, 2);
        let halfway = c.engine().scene().get(id).unwrap().attrs();
        assert_ne!(halfway, started);

        assert_eq!(c.advance(50).ticks_run, 1);
        assert_eq!(c.displayed_year(), Some(1802));
    }

    #[test]
    fn half_interval_steps_start_transitions_fresh() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.engine_mut().finish_transitions();
        let id = c.engine().scene().id_of("Norway").unwrap();
        let before = c.engine().scene().get(id).unwrap().attrs();

        c.advance(50);
        let result = c.advance(50);
        assert_eq!(result.ticks_run, 1);
        assert_eq!(c.displayed_year(), Some(1801));
        // Zero time has passed since the tick, so the bubble has not moved.
        assert_eq!(c.engine().scene().get(id).unwrap().attrs(), before);
        assert_eq!(c.timer().accumulator(), 0);
    }

    #[test]
    fn long_step_carries_the_remainder() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        let result = c.advance(230);
        assert_eq!(result.ticks_run, 2);
        assert_eq!(c.timer().accumulator(), 30);
        assert_eq!(result.animating, 2);
        assert_eq!(c.advance(70).ticks_run, 1);
        assert_eq!(c.displayed_year(), Some(1800));
    }

    #[test]
    fn toggle_restarts_the_interval() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        assert_eq!(c.toggle(), PlaybackStatus::Paused);
        assert!(!c.timer().is_running());
        assert_eq!(c.timer().until_next(), None);
        assert_eq!(c.toggle(), PlaybackStatus::Playing);
        assert_eq!(c.timer().until_next(), Some(100));
    }

    #[test]
    fn paused_advance_runs_no_ticks_but_animates() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.pause().unwrap();
        let result = c.advance(1000);
        assert_eq!(result.ticks_run, 0);
        assert_eq!(result.animating, 0);
        assert!(!c.engine().scene().is_animating());
        assert_eq!(c.displayed_year(), Some(1800));
    }

    #[test]
    fn pause_and_resume_validate_state() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        assert!(matches!(
            c.resume(),
            Err(PlaybackError::InvalidTransition { action: "resume", .. })
        ));
        c.pause().unwrap();
        assert_eq!(
            c.pause(),
            Err(PlaybackError::InvalidTransition {
                action: "pause",
                status: PlaybackStatus::Paused
            })
        );
        c.resume().unwrap();
        assert!(c.timer().is_running());
    }

    #[test]
    fn toggle_flips_button_label() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        assert_eq!(c.status().button_label(), "Pause");
        assert_eq!(c.toggle(), PlaybackStatus::Paused);
        assert_eq!(c.status().button_label(), "Play");
        assert_eq!(c.toggle(), PlaybackStatus::Playing);
    }

    #[test]
    fn resume_starts_a_fresh_interval() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.advance(90);
        c.pause().unwrap();
        c.resume().unwrap();
        assert_eq!(c.advance(90).ticks_run, 0);
        assert_eq!(c.advance(10).ticks_run, 1);
    }

    #[test]
    fn reset_while_paused_renders_immediately() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.tick();
        c.pause().unwrap();
        let result = c.reset().expect("paused reset renders");
        assert_eq!(result.year, 1800);
        assert_eq!(c.displayed_year(), Some(1800));
        assert_eq!(c.data_index(), 0);
    }

    #[test]
    fn reset_while_playing_waits_for_next_tick() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.tick();
        c.tick();
        assert!(c.reset().is_none());
        assert_eq!(c.data_index(), 0);
        assert_eq!(c.displayed_year(), Some(1802));
        assert_eq!(c.tick().year, 1800);
        assert_eq!(c.tick().year, 1801);
    }

    #[test]
    fn scrub_jumps_and_keeps_timer() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.pause().unwrap();
        let result = c.scrub(1802).unwrap();
        assert_eq!(result.year, 1802);
        assert_eq!(c.data_index(), 2);
        assert_eq!(c.status(), PlaybackStatus::Paused);
        assert_eq!(c.engine().scrubber().value(), 1802);
    }

    #[test]
    fn scrub_rejects_out_of_range_years() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        assert_eq!(
            c.scrub(1799),
            Err(PlaybackError::YearOutOfRange {
                year: 1799,
                min: 1800,
                max: 2014
            })
        );
        assert_eq!(
            c.scrub(1900),
            Err(PlaybackError::YearNotInDataset {
                year: 1900,
                index: 100,
                len: 3
            })
        );
        assert_eq!(c.data_index(), 0);
    }

    #[test]
    fn filter_change_rerenders_without_advancing() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        c.tick();
        let result = c.set_filter(ContinentFilter::parse("asia"));
        assert_eq!(result.year, 1801);
        assert_eq!(c.data_index(), 1);
        assert_eq!(c.engine().scene().len(), 1);
        assert_eq!(c.filter(), &ContinentFilter::parse("asia"));
    }

    #[test]
    fn events_record_operations() {
        let mut c = PlaybackController::with_defaults(three_year_dataset());
        let initial = c.drain_events();
        assert_eq!(
            initial.last(),
            Some(&ChartEvent::YearRendered {
                index: 0,
                year: 1800
            })
        );
        assert_eq!(
            initial
                .iter()
                .filter(|e| matches!(e, ChartEvent::BubbleEntered { .. }))
                .count(),
            2
        );

        c.pause().unwrap();
        c.reset();
        let events = c.drain_events();
        assert_eq!(events[0], ChartEvent::Paused { index: 0 });
        assert_eq!(events[1], ChartEvent::Reset { was_paused: true });
        assert_eq!(
            events[2],
            ChartEvent::YearRendered {
                index: 0,
                year: 1800
            }
        );
    }
}
