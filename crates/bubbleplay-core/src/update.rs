//! The update engine: reconciles rendered bubbles against one snapshot.
//!
//! # Update Phases
//!
//! Each call to [`UpdateEngine::update`] runs, in order:
//!
//! 1. **Filter** -- keep records matching the continent filter.
//! 2. **Join** -- diff rendered bubbles against the filtered records by
//!    country name.
//! 3. **Exit** -- remove bubbles whose country is gone, immediately.
//! 4. **Enter** -- create bubbles for new countries at the origin, colored
//!    by continent.
//! 5. **Merge** -- start a transition on every entered and kept bubble
//!    towards its scaled position.
//! 6. **Labels** -- set the year label and sync the scrubber.
//!
//! All attribute assignment finishes before `update` returns. A transition
//! still in flight from an earlier call is replaced, starting from wherever
//! the bubble currently is.

use tracing::debug;

use crate::config::{ChartConfig, PlaybackConfig};
use crate::continent::ContinentFilter;
use crate::dataset::{CountryRecord, YearSnapshot};
use crate::id::BubbleId;
use crate::scale::ScaleSet;
use crate::scene::{Bubble, Scene, plan_join};
use crate::surface::RenderSurface;
use crate::tooltip::{Tooltip, tooltip_lines};
use crate::transition::Easing;

// ---------------------------------------------------------------------------
// Scrubber
// ---------------------------------------------------------------------------

/// The year slider. Years map to dataset indices by a fixed table:
/// `min` is index 0 and every `step` years is the next index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrubber {
    min: i32,
    max: i32,
    step: i32,
    value: i32,
}

impl Scrubber {
    pub fn new(min: i32, max: i32, step: i32) -> Self {
        Self {
            min,
            max,
            step: step.max(1),
            value: min,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Text of the label next to the slider.
    pub fn label(&self) -> String {
        self.value.to_string()
    }

    /// Number of discrete positions.
    pub fn len(&self) -> usize {
        if self.max < self.min {
            0
        } else {
            ((self.max - self.min) / self.step) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dataset index for `year`, or `None` if the slider cannot produce it.
    pub fn index_of(&self, year: i32) -> Option<usize> {
        if year < self.min || year > self.max || (year - self.min) % self.step != 0 {
            return None;
        }
        Some(((year - self.min) / self.step) as usize)
    }

    /// Move the handle to show `year` without emitting a change. Values
    /// outside the range pin to the nearest end.
    pub(crate) fn sync(&mut self, year: i32) {
        self.value = year.clamp(self.min, self.max.max(self.min));
    }
}

// ---------------------------------------------------------------------------
// UpdateResult
// ---------------------------------------------------------------------------

/// What one `update` call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub year: i32,
    /// Countries whose bubble was created.
    pub entered: Vec<String>,
    /// Countries whose bubble was removed.
    pub exited: Vec<String>,
    /// Bubbles kept and retargeted.
    pub updated: usize,
}

impl UpdateResult {
    /// Number of bubbles rendered after the update.
    pub fn rendered(&self) -> usize {
        self.entered.len() + self.updated
    }
}

// ---------------------------------------------------------------------------
// UpdateEngine
// ---------------------------------------------------------------------------

/// Owns the scales, the rendered scene, and the dynamic labels.
#[derive(Debug, Clone)]
pub struct UpdateEngine {
    scales: ScaleSet,
    surface: RenderSurface,
    scene: Scene,
    tooltip: Tooltip,
    scrubber: Scrubber,
    year_label: Option<String>,
    transition_ms: u64,
    easing: Easing,
}

impl UpdateEngine {
    pub fn new(chart: &ChartConfig, playback: &PlaybackConfig) -> Self {
        let scales = ScaleSet::new(chart);
        let surface = RenderSurface::new(chart, &scales);
        Self {
            scales,
            surface,
            scene: Scene::new(),
            tooltip: Tooltip::new(),
            scrubber: Scrubber::new(
                playback.scrubber_min,
                playback.scrubber_max,
                playback.scrubber_step,
            ),
            year_label: None,
            transition_ms: playback.transition_ms,
            easing: playback.easing,
        }
    }

    /// Reconcile the scene against `snapshot` restricted to `filter`.
    pub fn update(&mut self, snapshot: &YearSnapshot, filter: &ContinentFilter) -> UpdateResult {
        let data: Vec<&CountryRecord> = snapshot.filtered(filter).collect();
        let plan = plan_join(self.scene.keyed(), &data, |r| r.country.as_str());

        let mut result = UpdateResult {
            year: snapshot.year,
            updated: plan.update.len(),
            ..Default::default()
        };

        // Exit.
        self.tooltip.forget(&plan.exit);
        result.exited = self
            .scene
            .remove_all(&plan.exit)
            .into_iter()
            .map(|b| b.datum.country)
            .collect();

        // Enter.
        let mut merged: Vec<(BubbleId, usize)> = Vec::with_capacity(data.len());
        for &i in &plan.enter {
            let record = data[i];
            let fill = self.scales.color.color(&record.continent);
            let id = self.scene.insert(Bubble::entering(record.clone(), fill));
            result.entered.push(record.country.clone());
            merged.push((id, i));
        }

        // Merge: entered + kept bubbles transition to their new position.
        merged.extend(plan.update.iter().copied());
        for (id, i) in merged {
            let record = data[i];
            let target = self.scales.attrs(record);
            if let Some(bubble) = self.scene.get_mut(id) {
                bubble.datum = record.clone();
                bubble.transition_to(target, self.transition_ms, self.easing);
            }
        }

        // Labels.
        self.year_label = Some(snapshot.year.to_string());
        self.scrubber.sync(snapshot.year);

        debug!(
            year = snapshot.year,
            filter = %filter,
            entered = result.entered.len(),
            exited = result.exited.len(),
            updated = result.updated,
            "update"
        );
        result
    }

    /// Advance in-flight transitions. Returns how many are still running.
    pub fn advance_transitions(&mut self, dt_ms: u64) -> usize {
        self.scene.advance(dt_ms)
    }

    /// Run every transition to completion.
    pub fn finish_transitions(&mut self) {
        self.scene.advance(u64::MAX);
    }

    // -----------------------------------------------------------------------
    // Pointer interaction
    // -----------------------------------------------------------------------

    /// Pointer entered a bubble.
    pub fn pointer_over(&mut self, bubble: BubbleId, page_x: f64, page_y: f64) {
        if self.scene.contains(bubble) {
            self.tooltip.pointer_over(bubble, page_x, page_y);
        }
    }

    /// Pointer moved while over the hovered bubble.
    pub fn pointer_move(&mut self, page_x: f64, page_y: f64) {
        if self.tooltip.is_visible() {
            self.tooltip.pointer_move(page_x, page_y);
        }
    }

    /// Pointer left the hovered bubble.
    pub fn pointer_out(&mut self) {
        self.tooltip.pointer_out();
    }

    /// Route a pointer position on the canvas to over/move/out, hit-testing
    /// against the drawn bubbles. Page coordinates position the tooltip.
    /// Returns the hovered bubble, if any.
    pub fn pointer_at(
        &mut self,
        canvas_x: f64,
        canvas_y: f64,
        page_x: f64,
        page_y: f64,
    ) -> Option<BubbleId> {
        let (x, y) = self.surface.to_chart(canvas_x, canvas_y);
        let hit = self.scene.hit_test(x, y);
        match (self.tooltip.target(), hit) {
            (Some(current), Some(id)) if current == id => self.pointer_move(page_x, page_y),
            (_, Some(id)) => self.pointer_over(id, page_x, page_y),
            (Some(_), None) => self.pointer_out(),
            (None, None) => {}
        }
        hit
    }

    /// Tooltip text lines, if the tooltip is showing.
    pub fn tooltip_lines(&self) -> Option<Vec<String>> {
        let id = self.tooltip.target()?;
        self.scene.get(id).map(|b| tooltip_lines(&b.datum))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Text of the year label; `None` before the first update.
    pub fn year_label(&self) -> Option<&str> {
        self.year_label.as_deref()
    }
}
