// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! An [`AxisSpec`] pairs a positional scale with tick and label settings. It can list its ticks
//! (for tests and custom renderers) or emit the domain line, tick, label and title marks.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use peniko::Brush;
use peniko::color::palette::css;
use statviz_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::format::format_number;
use crate::scale::{ScaleBand, ScaleLinear, ScaleTime};
use crate::time::{SECONDS_PER_YEAR, format_minutes_seconds, format_year};
use crate::z_order;

/// Formats a tick value given the tick step.
pub type TickFormatter = Arc<dyn Fn(f64, f64) -> String + Send + Sync>;

/// Which side of the plot the axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Horizontal axis with ticks and labels below the line.
    Bottom,
    /// Vertical axis with ticks and labels left of the line.
    Left,
}

/// The scale an axis renders.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    /// Linear values.
    Linear(ScaleLinear),
    /// Time values (seconds).
    Time(ScaleTime),
    /// Band indices.
    Band(ScaleBand),
}

impl From<ScaleLinear> for AxisScale {
    fn from(value: ScaleLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTime> for AxisScale {
    fn from(value: ScaleTime) -> Self {
        Self::Time(value)
    }
}

impl From<ScaleBand> for AxisScale {
    fn from(value: ScaleBand) -> Self {
        Self::Band(value)
    }
}

impl AxisScale {
    fn position(&self, v: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(v),
            Self::Time(s) => s.map(v),
            Self::Band(s) => s.center(band_index(v)),
        }
    }

    fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.range(),
            Self::Band(s) => {
                let n = s.count();
                (s.x(0), s.x(n.saturating_sub(1)) + s.band_width())
            }
        }
    }

    fn default_ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Time(s) => s.ticks(count),
            Self::Band(s) => (0..s.count()).map(|i| i as f64).collect(),
        }
    }

    fn default_label(&self, v: f64, step: f64) -> String {
        match self {
            Self::Linear(_) => format_number(v, step),
            Self::Time(s) => {
                let (d0, d1) = s.domain();
                if (d1 - d0).abs() > SECONDS_PER_YEAR {
                    format_year(v)
                } else {
                    format_minutes_seconds(v)
                }
            }
            Self::Band(_) => alloc::format!("{}", band_index(v)),
        }
    }
}

fn band_index(v: f64) -> usize {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, reason = "band indices are small")]
    {
        v as usize
    }
}

/// A resolved tick: its domain value, pixel position and label.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Domain value.
    pub value: f64,
    /// Pixel position along the axis.
    pub position: f64,
    /// Formatted label.
    pub label: String,
}

/// An axis: a scale plus tick/label settings and a position.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; generated marks use fixed offsets from it.
    pub id_base: u64,
    /// The scale to render.
    pub scale: AxisScale,
    /// Axis side.
    pub orient: AxisOrient,
    /// Position of the axis line: `y` for bottom axes, `x` for left axes.
    pub offset: f64,
    /// Approximate tick count when ticks are generated.
    pub tick_count: usize,
    /// Explicit tick values, overriding generation.
    pub tick_values: Option<Vec<f64>>,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between tick end and label.
    pub tick_padding: f64,
    /// Label font size.
    pub font_size: f64,
    /// Paint for the domain line, ticks and labels.
    pub brush: Brush,
    /// Optional label formatter `(value, step) -> label`.
    pub tick_formatter: Option<TickFormatter>,
    /// Optional axis title.
    pub title: Option<String>,
    /// Distance from the axis line to the title.
    pub title_offset: f64,
    /// Title font size.
    pub title_font_size: f64,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("scale", &self.scale)
            .field("orient", &self.orient)
            .field("offset", &self.offset)
            .field("tick_count", &self.tick_count)
            .field("tick_values", &self.tick_values)
            .field("tick_size", &self.tick_size)
            .field("tick_padding", &self.tick_padding)
            .field("font_size", &self.font_size)
            .field("brush", &self.brush)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .field("title", &self.title)
            .field("title_offset", &self.title_offset)
            .field("title_font_size", &self.title_font_size)
            .finish()
    }
}

impl AxisSpec {
    /// Creates an axis with d3-like defaults (6px ticks, 3px padding, 10px labels).
    pub fn new(id_base: u64, scale: impl Into<AxisScale>, orient: AxisOrient, offset: f64) -> Self {
        Self {
            id_base,
            scale: scale.into(),
            orient,
            offset,
            tick_count: 10,
            tick_values: None,
            tick_size: 6.0,
            tick_padding: 3.0,
            font_size: 10.0,
            brush: css::BLACK.into(),
            tick_formatter: None,
            title: None,
            title_offset: 40.0,
            title_font_size: 14.0,
        }
    }

    /// A bottom axis whose line sits at `y`.
    pub fn bottom(id_base: u64, scale: impl Into<AxisScale>, y: f64) -> Self {
        Self::new(id_base, scale, AxisOrient::Bottom, y)
    }

    /// A left axis whose line sits at `x`.
    pub fn left(id_base: u64, scale: impl Into<AxisScale>, x: f64) -> Self {
        Self::new(id_base, scale, AxisOrient::Left, x)
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Uses explicit tick values.
    pub fn with_tick_values(mut self, values: Vec<f64>) -> Self {
        self.tick_values = Some(values);
        self
    }

    /// Sets the label formatter.
    pub fn with_tick_formatter(
        mut self,
        f: impl Fn(f64, f64) -> String + Send + Sync + 'static,
    ) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the distance between the axis line and its title.
    pub fn with_title_offset(mut self, title_offset: f64) -> Self {
        self.title_offset = title_offset;
        self
    }

    /// Resolves tick values, positions and labels.
    pub fn ticks(&self) -> Vec<AxisTick> {
        let values = match &self.tick_values {
            Some(v) => v.clone(),
            None => self.scale.default_ticks(self.tick_count),
        };
        let step = match values.as_slice() {
            [a, b, ..] => (b - a).abs(),
            _ => 0.0,
        };
        values
            .into_iter()
            .map(|value| AxisTick {
                value,
                position: self.scale.position(value),
                label: match &self.tick_formatter {
                    Some(f) => f(value, step),
                    None => self.scale.default_label(value, step),
                },
            })
            .collect()
    }

    fn point(&self, along: f64, across: f64) -> Point {
        match self.orient {
            AxisOrient::Bottom => Point::new(along, self.offset + across),
            AxisOrient::Left => Point::new(self.offset - across, along),
        }
    }

    /// Generates the axis marks.
    pub fn marks(&self) -> Vec<Mark> {
        let mut out = Vec::new();
        let (r0, r1) = self.scale.range();

        let mut domain = BezPath::new();
        domain.move_to(self.point(r0, 0.0));
        domain.line_to(self.point(r1, 0.0));
        out.push(
            Mark::builder(MarkId::from_raw(self.id_base))
                .path(domain)
                .z_index(z_order::AXIS_RULES)
                .fill(Brush::Solid(css::TRANSPARENT))
                .stroke(self.brush.clone(), 1.0)
                .class("domain")
                .build(),
        );

        let (anchor, baseline) = match self.orient {
            AxisOrient::Bottom => (TextAnchor::Middle, TextBaseline::Hanging),
            AxisOrient::Left => (TextAnchor::End, TextBaseline::Middle),
        };
        for (i, tick) in self.ticks().into_iter().enumerate() {
            let mut line = BezPath::new();
            line.move_to(self.point(tick.position, 0.0));
            line.line_to(self.point(tick.position, self.tick_size));
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1 + i as u64))
                    .path(line)
                    .z_index(z_order::AXIS_RULES)
                    .fill(Brush::Solid(css::TRANSPARENT))
                    .stroke(self.brush.clone(), 1.0)
                    .class("tick")
                    .build(),
            );
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1000 + i as u64))
                    .text(
                        self.point(tick.position, self.tick_size + self.tick_padding),
                        tick.label,
                    )
                    .font_size(self.font_size)
                    .text_anchor(anchor)
                    .text_baseline(baseline)
                    .z_index(z_order::AXIS_LABELS)
                    .fill(self.brush.clone())
                    .class("tick-label")
                    .build(),
            );
        }

        if let Some(title) = &self.title {
            let mid = 0.5 * (r0 + r1);
            let angle = match self.orient {
                AxisOrient::Bottom => 0.0,
                AxisOrient::Left => -90.0,
            };
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 9000))
                    .text(self.point(mid, self.title_offset), title.clone())
                    .font_size(self.title_font_size)
                    .text_anchor(TextAnchor::Middle)
                    .text_baseline(TextBaseline::Middle)
                    .angle(angle)
                    .z_index(z_order::AXIS_TITLES)
                    .fill(self.brush.clone())
                    .class("axis-title")
                    .build(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use statviz_core::Shape;

    use super::*;
    use crate::time::year_start_seconds;

    #[test]
    fn linear_axis_labels_group_thousands() {
        let scale = ScaleLinear::new((0.0, 18_000.0), (450.0, 50.0)).unwrap();
        let axis = AxisSpec::left(0x10, scale, 80.0);
        let ticks = axis.ticks();
        assert_eq!(ticks[0].label, "0");
        assert_eq!(ticks[0].position, 450.0);
        assert!(ticks.iter().any(|t| t.label == "10,000"));
    }

    #[test]
    fn time_axis_formats_years() {
        let lo = year_start_seconds(1947).unwrap();
        let hi = year_start_seconds(2016).unwrap();
        let axis = AxisSpec::bottom(0x20, ScaleTime::new((lo, hi), (80.0, 1200.0)).unwrap(), 500.0);
        let ticks = axis.ticks();
        assert_eq!(ticks[0].label, "1950");
    }

    #[test]
    fn band_axis_uses_formatter_and_centers() {
        let band = ScaleBand::new((0.0, 120.0), 12).unwrap();
        let axis = AxisSpec::left(0x30, band, 80.0)
            .with_tick_formatter(|v, _| crate::time::month_name(v as usize).unwrap_or("").into());
        let ticks = axis.ticks();
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0].label, "January");
        assert_eq!(ticks[0].position, 5.0);
    }

    #[test]
    fn marks_include_domain_ticks_labels_and_title() {
        let scale = ScaleLinear::new((0.0, 10.0), (0.0, 100.0)).unwrap();
        let axis = AxisSpec::bottom(0x40, scale, 200.0)
            .with_tick_values(vec![0.0, 5.0, 10.0])
            .with_title("Quarter");
        let marks = axis.marks();
        assert_eq!(marks.len(), 1 + 3 * 2 + 1);
        let title = marks.last().unwrap();
        assert_eq!(title.id, MarkId::from_raw(0x40 + 9000));
        let Shape::Text(t) = &title.shape else {
            panic!("title should be text");
        };
        assert_eq!(t.text, "Quarter");
        assert_eq!(t.pos, Point::new(50.0, 240.0));
    }
}
