//! End-to-end playback scenarios for the bubble chart.
//!
//! Each test drives a [`PlaybackController`] the way a host would: feeding
//! elapsed time, pressing buttons, moving the slider. Expected bubble
//! attributes are computed here from the chart constants rather than through
//! the scale types, so a scale regression shows up as a mismatch.

use std::f64::consts::PI;

use bubbleplay_core::continent::{Continent, ContinentFilter};
use bubbleplay_core::event::{ChartEvent, EventKind};
use bubbleplay_core::playback::{PlaybackController, PlaybackError, PlaybackStatus};
use bubbleplay_core::scale::CATEGORY10;
use bubbleplay_core::scene::VisualState;
use bubbleplay_core::test_utils::*;

// ============================================================================
// Expected geometry
// ============================================================================

const CHART_WIDTH: f64 = 800.0 - 100.0 - 10.0;
const CHART_HEIGHT: f64 = 500.0 - 10.0 - 100.0;

fn expected_cx(income: f64) -> f64 {
    let (lo, hi) = (142f64.log10(), 150_000f64.log10());
    CHART_WIDTH * (income.log10() - lo) / (hi - lo)
}

fn expected_cy(life_exp: f64) -> f64 {
    CHART_HEIGHT * (1.0 - life_exp / 90.0)
}

fn expected_r(population: f64) -> f64 {
    let p = population.clamp(2000.0, 1.4e9);
    let (min_size, max_size) = (2.0 * PI * 5.0, 2.0 * PI * 50.0);
    let size = min_size + (max_size - min_size) * (p - 2000.0) / (1.4e9 - 2000.0);
    size / (2.0 * PI)
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{what}: expected {expected}, got {actual}"
    );
}

fn state_of<'a>(states: &'a [VisualState], country: &str) -> &'a VisualState {
    states
        .iter()
        .find(|s| s.country == country)
        .unwrap_or_else(|| panic!("{country} is not rendered"))
}

/// Let transitions finish without ticking.
fn settle(controller: &mut PlaybackController) {
    controller.engine_mut().finish_transitions();
}

// ============================================================================
// The three-year scenario
// ============================================================================

#[test]
fn pause_after_first_tick_then_reset() {
    let mut c = PlaybackController::with_defaults(three_year_dataset());
    assert_eq!(c.displayed_year(), Some(1800));

    // First tick lands on 1801.
    let result = c.advance(100);
    assert_eq!(result.ticks_run, 1);
    assert_eq!(c.displayed_year(), Some(1801));

    c.pause().unwrap();
    assert_eq!(c.status().button_label(), "Play");

    // The year stays put however long we wait.
    for _ in 0..100 {
        let result = c.advance(100);
        assert_eq!(result.ticks_run, 0);
    }
    assert_eq!(c.displayed_year(), Some(1801));
    assert_eq!(c.data_index(), 1);

    // Reset while paused renders 1800 immediately.
    let rendered = c.reset().expect("reset while paused renders");
    assert_eq!(rendered.year, 1800);
    assert_eq!(c.displayed_year(), Some(1800));

    // Transitions still run while paused.
    let result = c.advance(1_000);
    assert_eq!(result.animating, 0);

    let states = c.engine().scene().visual_state();
    assert_eq!(states.len(), 2);

    let norway = state_of(&states, "Norway");
    assert_close(norway.cx, expected_cx(1520.0), "Norway cx");
    assert_close(norway.cy, expected_cy(32.0), "Norway cy");
    assert_close(norway.r, expected_r(868_570.0), "Norway r");
    assert_eq!(norway.color, "#1f77b4");

    let china = state_of(&states, "China");
    assert_close(china.cx, expected_cx(985.0), "China cx");
    assert_close(china.cy, expected_cy(32.0), "China cy");
    assert_close(china.r, expected_r(321_675_013.0), "China r");
    assert_eq!(china.color, "#ff7f0e");
}

#[test]
fn reset_while_playing_waits_for_next_tick() {
    let mut c = PlaybackController::with_defaults(three_year_dataset());
    c.advance(200);
    assert_eq!(c.displayed_year(), Some(1802));

    assert!(c.reset().is_none());
    assert_eq!(c.displayed_year(), Some(1802));
    assert_eq!(c.data_index(), 0);

    // Partial interval: nothing yet.
    c.advance(99);
    assert_eq!(c.displayed_year(), Some(1802));

    c.advance(1);
    assert_eq!(c.displayed_year(), Some(1800));
    assert_eq!(c.data_index(), 0);

    c.advance(100);
    assert_eq!(c.displayed_year(), Some(1801));
}

#[test]
fn playback_loops_forever() {
    let mut c = PlaybackController::with_defaults(three_year_dataset());
    let mut years = Vec::new();
    for _ in 0..7 {
        c.advance(100);
        years.push(c.displayed_year().unwrap());
    }
    assert_eq!(years, vec![1801, 1802, 1800, 1801, 1802, 1800, 1801]);
}

#[test]
fn toggle_flips_status_and_label() {
    let mut c = PlaybackController::with_defaults(three_year_dataset());
    assert_eq!(c.status().button_label(), "Pause");
    assert_eq!(c.toggle(), PlaybackStatus::Paused);
    assert_eq!(c.toggle(), PlaybackStatus::Playing);
    assert!(matches!(
        c.resume(),
        Err(PlaybackError::InvalidTransition { .. })
    ));

    let kinds: Vec<EventKind> = c.drain_events().iter().map(ChartEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::BubbleEntered,
            EventKind::BubbleEntered,
            EventKind::YearRendered,
            EventKind::Paused,
            EventKind::Resumed,
        ]
    );
}

// ============================================================================
// Scrubbing
// ============================================================================

#[test]
fn scrub_to_1950_on_full_range() {
    let mut c = PlaybackController::with_defaults(synthetic_dataset(215, 12));
    assert_eq!(c.dataset().snapshots().last().map(|s| s.year), Some(2014));

    let result = c.scrub(1950).unwrap();
    assert_eq!(result.year, 1950);
    assert_eq!(c.data_index(), 150);
    assert_eq!(c.current_snapshot().year, 1950);
    assert_eq!(c.engine().year_label(), Some("1950"));
    assert_eq!(c.engine().scrubber().value(), 1950);
    assert_eq!(c.engine().scrubber().label(), "1950");

    // Scrubbing leaves the timer alone: playback continues from 1950.
    assert_eq!(c.status(), PlaybackStatus::Playing);
    c.advance(100);
    assert_eq!(c.displayed_year(), Some(1951));
}

#[test]
fn scrub_while_paused_stays_paused() {
    let mut c = PlaybackController::with_defaults(synthetic_dataset(215, 4));
    c.pause().unwrap();
    c.scrub(2014).unwrap();
    c.advance(10_000);
    assert_eq!(c.displayed_year(), Some(2014));
    assert_eq!(c.status(), PlaybackStatus::Paused);
}

#[test]
fn scrub_errors_leave_chart_unchanged() {
    let mut c = PlaybackController::with_defaults(three_year_dataset());
    c.advance(100);
    assert_eq!(
        c.scrub(2015),
        Err(PlaybackError::YearOutOfRange {
            year: 2015,
            min: 1800,
            max: 2014,
        })
    );
    assert_eq!(
        c.scrub(1803),
        Err(PlaybackError::YearNotInDataset {
            year: 1803,
            index: 3,
            len: 3,
        })
    );
    assert_eq!(c.displayed_year(), Some(1801));
}

#[test]
fn scrub_mid_transition_starts_from_current_position() {
    let mut c = PlaybackController::with_defaults(synthetic_dataset(215, 3));
    c.engine_mut().finish_transitions();
    c.scrub(2000).unwrap();
    c.advance(40);

    let id = c.engine().scene().id_of("country-1").unwrap();
    let mid_flight = c.engine().scene().get(id).unwrap().attrs();

    c.scrub(1900).unwrap();
    let bubble = c.engine().scene().get(id).unwrap();
    assert_eq!(bubble.attrs(), mid_flight);
    assert!(bubble.is_animating());

    c.engine_mut().finish_transitions();
    let record = c.current_snapshot().country("country-1").unwrap().clone();
    let settled = c.engine().scene().get(id).unwrap().attrs();
    assert_close(settled.cx, expected_cx(record.income), "cx");
    assert_close(settled.cy, expected_cy(record.life_exp), "cy");
}

// ============================================================================
// Continent filter
// ============================================================================

#[test]
fn filter_change_rerenders_without_advancing() {
    let mut c = PlaybackController::with_defaults(synthetic_dataset(5, 8));
    c.advance(100);
    let europe = c.set_filter(ContinentFilter::parse("europe"));
    assert_eq!(c.data_index(), 1);
    assert_eq!(europe.exited.len(), 6);
    assert_eq!(c.engine().scene().len(), 2);
    assert!(
        c.engine()
            .scene()
            .visual_state()
            .iter()
            .all(|s| s.color == "#1f77b4")
    );

    // The filter sticks across ticks.
    c.advance(100);
    assert_eq!(c.engine().scene().len(), 2);

    let all = c.set_filter(ContinentFilter::All);
    assert_eq!(all.entered.len(), 6);
    assert_eq!(all.updated, 2);
}

#[test]
fn kept_bubbles_keep_identity_across_ticks() {
    let mut c = PlaybackController::with_defaults(synthetic_dataset(4, 6));
    let before: Vec<_> = c.engine().scene().iter().map(|(id, _)| id).collect();
    c.advance(300);
    let after: Vec<_> = c.engine().scene().iter().map(|(id, _)| id).collect();
    assert_eq!(before, after);
}

#[test]
fn unknown_continents_take_next_palette_slot() {
    let data = dataset(vec![snapshot(
        1800,
        vec![
            country("Fiji", Continent::parse("oceania"), 900.0, 30.0, 150_000),
            country("Norway", Continent::Europe, 1520.0, 32.0, 868_570),
            country("Atlantis", Continent::parse("atlantic"), 5000.0, 60.0, 10_000),
        ],
    )]);
    let c = PlaybackController::with_defaults(data);
    let states = c.engine().scene().visual_state();
    assert_eq!(state_of(&states, "Norway").color, CATEGORY10[0]);
    assert_eq!(state_of(&states, "Fiji").color, CATEGORY10[4]);
    assert_eq!(state_of(&states, "Atlantis").color, CATEGORY10[5]);
}

#[test]
fn hovered_bubble_exit_hides_tooltip() {
    let mut c = PlaybackController::with_defaults(three_year_dataset());
    settle(&mut c);
    let id = c.engine().scene().id_of("China").unwrap();
    c.engine_mut().pointer_over(id, 10.0, 10.0);
    assert!(c.engine().tooltip().is_visible());

    c.set_filter(ContinentFilter::Only(Continent::Europe));
    assert!(!c.engine().tooltip().is_visible());
    assert!(c.engine().tooltip_lines().is_none());
}
