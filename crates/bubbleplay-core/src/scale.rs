//! Scale functions mapping data values to visual coordinates.
//!
//! All scales are total: inputs outside the domain extrapolate (or clamp,
//! where noted) and never fail.
//!
//! - [`LogScale`] -- income to x, base 10.
//! - [`LinearScale`] -- life expectancy to y (inverted range).
//! - [`RadiusScale`] -- population to radius via a linear size mapping.
//! - [`ColorScale`] -- continent to a Category10 color.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::continent::Continent;
use crate::dataset::CountryRecord;
use crate::transition::Attrs;

/// The Category10 palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

// ---------------------------------------------------------------------------
// Linear
// ---------------------------------------------------------------------------

/// Continuous linear mapping from a domain interval to a range interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
    clamp: bool,
}

impl LinearScale {
    /// An unclamped linear scale.
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Clamp inputs to the domain before mapping.
    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a domain value into the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let mut t = (value - d0) / (d1 - d0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values covering the domain.
    ///
    /// Steps are 1, 2, or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [a, b] = self.domain;
        let (start, stop) = if a <= b { (a, b) } else { (b, a) };
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let step = tick_step(start, stop, count);
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Nice tick spacing for `count` ticks over `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count.max(1) as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Format a tick value with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{value:.decimals$}")
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Base-10 logarithmic mapping. Non-positive inputs map to the range start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LogScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn map(&self, value: f64) -> f64 {
        let [r0, r1] = self.range;
        if value <= 0.0 || self.domain[0] <= 0.0 || self.domain[1] <= 0.0 {
            return r0;
        }
        let l0 = self.domain[0].log10();
        let l1 = self.domain[1].log10();
        if l0 == l1 {
            return (r0 + r1) / 2.0;
        }
        let t = (value.log10() - l0) / (l1 - l0);
        r0 + t * (r1 - r0)
    }
}

// ---------------------------------------------------------------------------
// Radius
// ---------------------------------------------------------------------------

/// Circle size for a radius. Bubble sizes are mapped linearly, then
/// converted back with [`circle_radius`].
pub fn circle_size(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Inverse of [`circle_size`].
pub fn circle_radius(size: f64) -> f64 {
    size / (2.0 * PI)
}

/// Population to bubble radius. Population is clamped to the domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusScale {
    size: LinearScale,
}

impl RadiusScale {
    pub fn new(population_domain: [f64; 2], min_radius: f64, max_radius: f64) -> Self {
        let size = LinearScale::new(
            population_domain,
            [circle_size(min_radius), circle_size(max_radius)],
        )
        .clamped();
        Self { size }
    }

    /// Circle size for a population, before conversion to a radius.
    pub fn size(&self, population: f64) -> f64 {
        self.size.map(population)
    }

    pub fn radius(&self, population: f64) -> f64 {
        circle_radius(self.size(population))
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Ordinal continent -> color mapping over [`CATEGORY10`].
///
/// Configured continents take palette slots in order. Any other continent
/// takes the next free slot the first time it is looked up, wrapping after
/// ten. Assignment is therefore stable for the lifetime of the scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Vec<Continent>,
}

impl ColorScale {
    pub fn new(continents: &[Continent]) -> Self {
        let mut scale = Self { domain: Vec::new() };
        for continent in continents {
            scale.color(continent);
        }
        scale
    }

    /// Color for `continent`, assigning a slot on first sight.
    pub fn color(&mut self, continent: &Continent) -> &'static str {
        let slot = match self.domain.iter().position(|c| c == continent) {
            Some(slot) => slot,
            None => {
                self.domain.push(continent.clone());
                self.domain.len() - 1
            }
        };
        CATEGORY10[slot % CATEGORY10.len()]
    }

    /// Color already assigned to `continent`, without assigning one.
    pub fn assigned(&self, continent: &Continent) -> Option<&'static str> {
        self.domain
            .iter()
            .position(|c| c == continent)
            .map(|slot| CATEGORY10[slot % CATEGORY10.len()])
    }

    /// Continents in slot order.
    pub fn domain(&self) -> &[Continent] {
        &self.domain
    }
}

// ---------------------------------------------------------------------------
// ScaleSet
// ---------------------------------------------------------------------------

/// The four scales used by the chart, built once from a [`ChartConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSet {
    pub x: LogScale,
    pub y: LinearScale,
    pub radius: RadiusScale,
    pub color: ColorScale,
}

impl ScaleSet {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            x: LogScale::new(config.income_domain, [0.0, config.chart_width()]),
            y: LinearScale::new(config.life_exp_domain, [config.chart_height(), 0.0]),
            radius: RadiusScale::new(config.population_domain, config.min_radius, config.max_radius),
            color: ColorScale::new(&config.continents),
        }
    }

    /// Target circle attributes for a record, in chart coordinates.
    pub fn attrs(&self, record: &CountryRecord) -> Attrs {
        Attrs {
            cx: self.x.map(record.income),
            cy: self.y.map(record.life_exp),
            r: self.radius.radius(record.population as f64),
        }
    }
}
