//! Keyed scene graph of bubble elements.
//!
//! Bubbles live in a `SlotMap` keyed by [`BubbleId`], with a secondary index
//! from country name to id and a paint order list. [`plan_join`] diffs the
//! current keyed set against incoming data and yields enter/update/exit
//! sets; applying the plan is the update engine's job.
//!
//! # Identity
//!
//! A country that stays in the data keeps the same `BubbleId` across
//! updates. Only exit followed by a later enter produces a new id.

use std::collections::HashMap;

use serde::Serialize;
use slotmap::SlotMap;

use crate::dataset::CountryRecord;
use crate::id::BubbleId;
use crate::transition::{Attrs, Easing, Transition};

// ---------------------------------------------------------------------------
// Bubble
// ---------------------------------------------------------------------------

/// One rendered circle bound to a country record.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    /// The bound record; replaced on every update that keeps the bubble.
    pub datum: CountryRecord,
    /// Fill color, fixed when the bubble enters.
    pub fill: &'static str,
    attrs: Attrs,
    transition: Option<Transition>,
}

impl Bubble {
    /// A new bubble with unset attributes.
    pub fn entering(datum: CountryRecord, fill: &'static str) -> Self {
        Self {
            datum,
            fill,
            attrs: Attrs::ORIGIN,
            transition: None,
        }
    }

    /// The join key.
    pub fn key(&self) -> &str {
        &self.datum.country
    }

    /// Attributes as currently drawn.
    pub fn attrs(&self) -> Attrs {
        self.attrs
    }

    /// Where the bubble is heading; its current attributes when at rest.
    pub fn target(&self) -> Attrs {
        self.transition
            .as_ref()
            .map_or(self.attrs, Transition::target)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Start a transition from the current attributes to `to`, replacing any
    /// transition in flight.
    pub fn transition_to(&mut self, to: Attrs, duration_ms: u64, easing: Easing) {
        let transition = Transition::new(self.attrs, to, duration_ms, easing);
        if transition.is_finished() {
            self.attrs = to;
            self.transition = None;
        } else {
            self.transition = Some(transition);
        }
    }

    /// Advance the in-flight transition. Returns true while still animating.
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        self.attrs = transition.advance(dt_ms);
        if transition.is_finished() {
            self.transition = None;
            false
        } else {
            true
        }
    }
}

/// Last-rendered visual state of one bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualState {
    pub country: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub color: &'static str,
}

// ---------------------------------------------------------------------------
// Join planning
// ---------------------------------------------------------------------------

/// Result of diffing keyed elements against new data.
///
/// `enter` and `update` hold indices into the data slice that was joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPlan {
    /// Data with no existing element.
    pub enter: Vec<usize>,
    /// Existing elements whose key is still present, with their new datum.
    pub update: Vec<(BubbleId, usize)>,
    /// Existing elements whose key is gone.
    pub exit: Vec<BubbleId>,
}

impl JoinPlan {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }
}

/// Diff `existing` (key, id) pairs against `data`, matching by `key_of`.
///
/// `update` and `exit` follow the order of `existing`; `enter` follows data
/// order. If a key repeats in `data`, only its first occurrence joins.
pub fn plan_join<'k, T>(
    existing: impl IntoIterator<Item = (&'k str, BubbleId)>,
    data: &[T],
    key_of: impl Fn(&T) -> &str,
) -> JoinPlan {
    let mut by_key: HashMap<&str, usize> = HashMap::with_capacity(data.len());
    for (i, datum) in data.iter().enumerate() {
        by_key.entry(key_of(datum)).or_insert(i);
    }

    let mut plan = JoinPlan::default();
    let mut matched = vec![false; data.len()];
    for (key, id) in existing {
        match by_key.get(key) {
            Some(&i) => {
                matched[i] = true;
                plan.update.push((id, i));
            }
            None => plan.exit.push(id),
        }
    }

    for (i, datum) in data.iter().enumerate() {
        if !matched[i] && by_key.get(key_of(datum)) == Some(&i) {
            plan.enter.push(i);
        }
    }
    plan
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The set of rendered bubbles.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    bubbles: SlotMap<BubbleId, Bubble>,
    index: HashMap<String, BubbleId>,
    /// Paint order: earlier entries are drawn first (underneath).
    order: Vec<BubbleId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.get_mut(id)
    }

    pub fn contains(&self, id: BubbleId) -> bool {
        self.bubbles.contains_key(id)
    }

    /// The bubble currently bound to `country`.
    pub fn id_of(&self, country: &str) -> Option<BubbleId> {
        self.index.get(country).copied()
    }

    /// Bubbles in paint order.
    pub fn iter(&self) -> impl Iterator<Item = (BubbleId, &Bubble)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.bubbles.get(id).map(|b| (id, b)))
    }

    /// (key, id) pairs in paint order, for joining.
    pub fn keyed(&self) -> impl Iterator<Item = (&str, BubbleId)> + '_ {
        self.iter().map(|(id, b)| (b.key(), id))
    }

    /// Add a bubble on top of the paint order.
    pub(crate) fn insert(&mut self, bubble: Bubble) -> BubbleId {
        let key = bubble.key().to_string();
        let id = self.bubbles.insert(bubble);
        self.index.insert(key, id);
        self.order.push(id);
        id
    }

    /// Remove a batch of bubbles. Unknown ids are ignored.
    pub(crate) fn remove_all(&mut self, ids: &[BubbleId]) -> Vec<Bubble> {
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(bubble) = self.bubbles.remove(id) {
                self.index.remove(bubble.key());
                removed.push(bubble);
            }
        }
        if !removed.is_empty() {
            let bubbles = &self.bubbles;
            self.order.retain(|id| bubbles.contains_key(*id));
        }
        removed
    }

    /// Advance every in-flight transition. Returns how many are still running.
    pub fn advance(&mut self, dt_ms: u64) -> usize {
        self.bubbles
            .values_mut()
            .map(|b| b.advance(dt_ms))
            .filter(|&running| running)
            .count()
    }

    pub fn is_animating(&self) -> bool {
        self.bubbles.values().any(Bubble::is_animating)
    }

    /// Topmost bubble containing the chart-space point `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<BubbleId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.bubbles.get(id).is_some_and(|b| b.attrs().contains(x, y)))
    }

    /// Current visual state of every bubble, in paint order.
    pub fn visual_state(&self) -> Vec<VisualState> {
        self.iter()
            .map(|(_, b)| {
                let a = b.attrs();
                VisualState {
                    country: b.key().to_string(),
                    cx: a.cx,
                    cy: a.cy,
                    r: a.r,
                    color: b.fill,
                }
            })
            .collect()
    }
}
