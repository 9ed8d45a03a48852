//! Timed interpolation of circle attributes.
//!
//! A [`Transition`] moves a bubble from one set of [`Attrs`] to another over
//! a fixed duration, shaped by an [`Easing`] curve. Time is advanced
//! explicitly by the caller in milliseconds.

use serde::{Deserialize, Serialize};

/// Circle attributes in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attrs {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Attrs {
    /// Unset attributes. Entering bubbles animate from here.
    pub const ORIGIN: Attrs = Attrs {
        cx: 0.0,
        cy: 0.0,
        r: 0.0,
    };

    /// Interpolate towards `to`; `t` is 0 at `self` and 1 at `to`.
    pub fn lerp(&self, to: &Attrs, t: f64) -> Attrs {
        Attrs {
            cx: self.cx + (to.cx - self.cx) * t,
            cy: self.cy + (to.cy - self.cy) * t,
            r: self.r + (to.r - self.r) * t,
        }
    }

    /// Whether `(x, y)` lies inside the circle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// Easing curve applied to normalized transition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// An in-flight interpolation between two attribute sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: Attrs,
    to: Attrs,
    duration_ms: u64,
    elapsed_ms: u64,
    easing: Easing,
}

impl Transition {
    pub fn new(from: Attrs, to: Attrs, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// Advance by `dt_ms` and return the attributes at the new time.
    pub fn advance(&mut self, dt_ms: u64) -> Attrs {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.current()
    }

    /// Linear progress in `[0, 1]`. A zero-length transition is complete.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            1.0
        } else {
            self.elapsed_ms as f64 / self.duration_ms as f64
        }
    }

    /// Attributes at the current time.
    pub fn current(&self) -> Attrs {
        if self.is_finished() {
            return self.to;
        }
        self.from.lerp(&self.to, self.easing.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn start(&self) -> Attrs {
        self.from
    }

    pub fn target(&self) -> Attrs {
        self.to
    }
}
