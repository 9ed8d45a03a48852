//! SVG output for the bubble chart.
//!
//! Serializes the static [`RenderSurface`], the rendered bubbles as they are
//! currently drawn, and the hover tooltip into one standalone SVG document.
//! A frame is a pure function of the [`UpdateEngine`]: rendering never
//! mutates the chart.
//!
//! # Document layout
//!
//! ```text
//! <svg width height>
//!   <g transform="translate(margin.left, margin.top)">
//!     x axis, y axis, titles, year label, legend, circles (paint order)
//!   </g>
//!   tooltip (page coordinates)
//! </svg>
//! ```

use std::fmt::{self, Write};

use bubbleplay_core::surface::{
    Axis, AxisOrient, Legend, RenderSurface, TITLE_FONT_SIZE, TextLabel, YEAR_LABEL_FILL,
};
use bubbleplay_core::update::UpdateEngine;

/// Errors raised while producing an SVG frame.
#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("failed to format SVG: {0}")]
    Format(#[from] fmt::Error),
}

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
const TOOLTIP_PADDING: f64 = 8.0;
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Render the current frame of `engine` into a new string.
pub fn render_frame(engine: &UpdateEngine) -> Result<String, SvgError> {
    let mut out = String::with_capacity(16 * 1024);
    write_frame(&mut out, engine)?;
    Ok(out)
}

/// Write the current frame of `engine` to `out`.
pub fn write_frame<W: Write>(out: &mut W, engine: &UpdateEngine) -> fmt::Result {
    let surface = engine.surface();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(surface.width),
        h = num(surface.height),
    )?;
    writeln!(
        out,
        r#"<g transform="translate({}, {})">"#,
        num(surface.margin.left),
        num(surface.margin.top),
    )?;

    write_axis(out, &surface.x_axis, "x axis")?;
    write_axis(out, &surface.y_axis, "y axis")?;
    write_label(out, &surface.x_title, "x-title")?;
    write_label(out, &surface.y_title, "y-title")?;
    write_year_label(out, surface, engine.year_label())?;
    write_legend(out, &surface.legend)?;
    write_bubbles(out, engine)?;

    writeln!(out, "</g>")?;
    write_tooltip(out, engine)?;
    writeln!(out, "</svg>")
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

fn write_axis<W: Write>(out: &mut W, axis: &Axis, class: &str) -> fmt::Result {
    let (ox, oy) = axis.origin;
    writeln!(
        out,
        r#"<g class="{class}" transform="translate({}, {})" font-size="10" font-family="sans-serif">"#,
        num(ox),
        num(oy),
    )?;
    let [a, b] = axis.extent;
    match axis.orient {
        AxisOrient::Bottom => {
            writeln!(
                out,
                r#"<path class="domain" stroke="currentColor" d="M{},{}V0H{}V{}"/>"#,
                num(a),
                num(TICK_SIZE),
                num(b),
                num(TICK_SIZE),
            )?;
            for tick in &axis.ticks {
                writeln!(
                    out,
                    r#"<g class="tick" transform="translate({}, 0)"><line stroke="currentColor" y2="{}"/><text fill="currentColor" y="{}" dy="0.71em" text-anchor="middle">{}</text></g>"#,
                    num(tick.offset),
                    num(TICK_SIZE),
                    num(TICK_SIZE + TICK_PADDING),
                    escape(&tick.label),
                )?;
            }
        }
        AxisOrient::Left => {
            writeln!(
                out,
                r#"<path class="domain" stroke="currentColor" d="M{},{}H0V{}H{}"/>"#,
                num(-TICK_SIZE),
                num(a),
                num(b),
                num(-TICK_SIZE),
            )?;
            for tick in &axis.ticks {
                writeln!(
                    out,
                    r#"<g class="tick" transform="translate(0, {})"><line stroke="currentColor" x2="{}"/><text fill="currentColor" x="{}" dy="0.32em" text-anchor="end">{}</text></g>"#,
                    num(tick.offset),
                    num(-TICK_SIZE),
                    num(-(TICK_SIZE + TICK_PADDING)),
                    escape(&tick.label),
                )?;
            }
        }
    }
    writeln!(out, "</g>")
}

fn write_label<W: Write>(out: &mut W, label: &TextLabel, class: &str) -> fmt::Result {
    write!(
        out,
        r#"<text class="{class}" x="{}" y="{}" font-size="{}px" text-anchor="middle""#,
        num(label.x),
        num(label.y),
        num(label.font_size),
    )?;
    if label.rotate != 0.0 {
        write!(out, r#" transform="rotate({})""#, num(label.rotate))?;
    }
    if let Some(fill) = label.fill {
        write!(out, r#" fill="{fill}""#)?;
    }
    writeln!(out, ">{}</text>", escape(&label.text))
}

fn write_year_label<W: Write>(
    out: &mut W,
    surface: &RenderSurface,
    year: Option<&str>,
) -> fmt::Result {
    let (x, y) = surface.year_anchor;
    writeln!(
        out,
        r#"<text class="year-label" x="{}" y="{}" font-size="{}px" opacity="0.4" text-anchor="middle" fill="{YEAR_LABEL_FILL}">{}</text>"#,
        num(x),
        num(y),
        num(TITLE_FONT_SIZE),
        escape(year.unwrap_or("")),
    )
}

fn write_legend<W: Write>(out: &mut W, legend: &Legend) -> fmt::Result {
    let (ox, oy) = legend.origin;
    writeln!(
        out,
        r#"<g class="legend" transform="translate({}, {})">"#,
        num(ox),
        num(oy),
    )?;
    for row in &legend.rows {
        writeln!(
            out,
            r#"<g transform="translate(0, {})"><rect width="{s}" height="{s}" fill="{}"/><text x="-10" y="10" text-anchor="end" style="text-transform: capitalize">{}</text></g>"#,
            num(row.offset_y),
            row.color,
            escape(&row.label),
            s = num(legend.swatch_size),
        )?;
    }
    writeln!(out, "</g>")
}

// ---------------------------------------------------------------------------
// Bubbles and tooltip
// ---------------------------------------------------------------------------

fn write_bubbles<W: Write>(out: &mut W, engine: &UpdateEngine) -> fmt::Result {
    for state in engine.scene().visual_state() {
        writeln!(
            out,
            r#"<circle data-country="{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            escape(&state.country),
            num(state.cx),
            num(state.cy),
            num(state.r),
            state.color,
        )?;
    }
    Ok(())
}

fn write_tooltip<W: Write>(out: &mut W, engine: &UpdateEngine) -> fmt::Result {
    let Some(lines) = engine.tooltip_lines() else {
        return Ok(());
    };
    let (px, py) = engine.tooltip().position();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = longest as f64 * TOOLTIP_CHAR_WIDTH + 2.0 * TOOLTIP_PADDING;
    let height = lines.len() as f64 * TOOLTIP_LINE_HEIGHT + 2.0 * TOOLTIP_PADDING;

    // Anchored above the pointer, horizontally centered.
    writeln!(
        out,
        r#"<g class="d3-tip" transform="translate({}, {})" font-size="12" font-family="sans-serif">"#,
        num(px - width / 2.0),
        num(py - height - TOOLTIP_PADDING),
    )?;
    writeln!(
        out,
        r#"<rect width="{}" height="{}" rx="2" fill="rgba(0, 0, 0, 0.8)"/>"#,
        num(width),
        num(height),
    )?;
    for (i, line) in lines.iter().enumerate() {
        writeln!(
            out,
            r##"<text x="{}" y="{}" fill="#fff">{}</text>"##,
            num(TOOLTIP_PADDING),
            num(TOOLTIP_PADDING + (i as f64 + 0.8) * TOOLTIP_LINE_HEIGHT),
            escape(line),
        )?;
    }
    writeln!(out, "</g>")
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
