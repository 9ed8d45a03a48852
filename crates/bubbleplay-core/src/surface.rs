//! Static chart furniture: axes, titles, legend, and label anchors.
//!
//! The surface is laid out once against the [`ScaleSet`] and never changes
//! during playback. All positions are in chart coordinates, i.e. relative to
//! the `(margin.left, margin.top)` translation.

use crate::config::{ChartConfig, Margin};
use crate::continent::Continent;
use crate::scale::{ScaleSet, format_tick, tick_step};
use crate::tooltip::format_dollars;

/// Which side of the plotting area an axis sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

/// A tick mark with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    /// Position along the axis in chart coordinates.
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    /// Translation of the axis group within the chart.
    pub origin: (f64, f64),
    /// Extent of the axis line along its direction.
    pub extent: [f64; 2],
    pub ticks: Vec<AxisTick>,
}

/// A text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees applied about the chart origin.
    pub rotate: f64,
    pub font_size: f64,
    pub fill: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub continent: Continent,
    pub label: String,
    pub color: &'static str,
    /// Vertical offset within the legend group.
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub origin: (f64, f64),
    pub swatch_size: f64,
    pub rows: Vec<LegendRow>,
}

/// Everything drawn once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub chart_width: f64,
    pub chart_height: f64,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub x_title: TextLabel,
    pub y_title: TextLabel,
    /// Position of the year label; its text changes every update.
    pub year_anchor: (f64, f64),
    pub legend: Legend,
}

pub const YEAR_LABEL_FILL: &str = "grey";
pub const TITLE_FONT_SIZE: f64 = 24.0;
const LEGEND_ROW_SPACING: f64 = 20.0;

impl RenderSurface {
    pub fn new(config: &ChartConfig, scales: &ScaleSet) -> Self {
        let chart_width = config.chart_width();
        let chart_height = config.chart_height();

        let x_axis = Axis {
            orient: AxisOrient::Bottom,
            origin: (0.0, chart_height),
            extent: scales.x.range(),
            ticks: config
                .x_ticks
                .iter()
                .map(|&value| AxisTick {
                    value,
                    offset: scales.x.map(value),
                    label: format_dollars(value).replace(',', ""),
                })
                .collect(),
        };

        let [d0, d1] = scales.y.domain();
        let step = tick_step(d0.min(d1), d0.max(d1), config.y_tick_count);
        let y_axis = Axis {
            orient: AxisOrient::Left,
            origin: (0.0, 0.0),
            extent: scales.y.range(),
            ticks: scales
                .y
                .ticks(config.y_tick_count)
                .into_iter()
                .map(|value| AxisTick {
                    value,
                    offset: scales.y.map(value),
                    label: format_tick(value, step),
                })
                .collect(),
        };

        let legend = Legend {
            origin: (chart_width - 30.0, 250.0),
            swatch_size: 10.0,
            rows: config
                .continents
                .iter()
                .enumerate()
                .map(|(i, continent)| LegendRow {
                    continent: continent.clone(),
                    label: continent.capitalized(),
                    color: scales.color.assigned(continent).unwrap_or("#000000"),
                    offset_y: i as f64 * LEGEND_ROW_SPACING,
                })
                .collect(),
        };

        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            margin: config.margin,
            chart_width,
            chart_height,
            x_axis,
            y_axis,
            x_title: TextLabel {
                text: "GDP Per Capita ($)".to_string(),
                x: chart_width / 2.0,
                y: 450.0,
                rotate: 0.0,
                font_size: TITLE_FONT_SIZE,
                fill: None,
            },
            y_title: TextLabel {
                text: "Life Expectancy (Years)".to_string(),
                x: -(chart_height / 2.0),
                y: -60.0,
                rotate: -90.0,
                font_size: TITLE_FONT_SIZE,
                fill: None,
            },
            year_anchor: (chart_width - 50.0, 360.0),
            legend,
        }
    }

    /// Convert canvas coordinates to chart coordinates.
    pub fn to_chart(&self, canvas_x: f64, canvas_y: f64) -> (f64, f64) {
        (canvas_x - self.margin.left, canvas_y - self.margin.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RenderSurface {
        let config = ChartConfig::default();
        let scales = ScaleSet::new(&config);
        RenderSurface::new(&config, &scales)
    }

    #[test]
    fn x_axis_dollar_ticks() {
        let s = surface();
        let labels: Vec<_> = s.x_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["$400", "$4000", "$40000"]);
        assert_eq!(s.x_axis.origin, (0.0, 390.0));
        assert!(s.x_axis.ticks.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn y_axis_ticks_every_ten_years() {
        let s = surface();
        assert_eq!(s.y_axis.ticks.len(), 10);
        assert_eq!(s.y_axis.ticks[0].label, "0");
        assert_eq!(s.y_axis.ticks[0].offset, 390.0);
        assert_eq!(s.y_axis.ticks[9].label, "90");
        assert_eq!(s.y_axis.ticks[9].offset, 0.0);
    }

    #[test]
    fn legend_rows() {
        let s = surface();
        assert_eq!(s.legend.origin, (660.0, 250.0));
        let rows: Vec<_> = s
            .legend
            .rows
            .iter()
            .map(|r| (r.label.as_str(), r.color, r.offset_y))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Europe", "#1f77b4", 0.0),
                ("Asia", "#ff7f0e", 20.0),
                ("Americas", "#2ca02c", 40.0),
                ("Africa", "#d62728", 60.0),
            ]
        );
    }

    #[test]
    fn label_anchors() {
        let s = surface();
        assert_eq!(s.year_anchor, (640.0, 360.0));
        assert_eq!((s.x_title.x, s.x_title.y), (345.0, 450.0));
        assert_eq!((s.y_title.x, s.y_title.y), (-195.0, -60.0));
        assert_eq!(s.to_chart(150.0, 60.0), (50.0, 50.0));
    }
}
