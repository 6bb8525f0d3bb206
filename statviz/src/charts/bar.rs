// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quarterly GDP bar chart.

use chrono::Months;
use kurbo::Rect;
use peniko::Color;
use statviz_charts::{
    AxisSpec, Insets, PlotFrame, ScaleLinear, ScaleTime, Size, date_to_seconds, extent,
    format_number, format_year, z_order,
};
use statviz_core::Mark;
use statviz_transforms::{GdpRaw, GdpRecord};

use super::{chart_title, shared};
use crate::descriptor::{ChartDescriptor, ChartKind, GeometryDescriptor, PrimitiveKind, ids};
use crate::error::{Error, Result};

/// Bar chart settings.
#[derive(Clone, Debug, PartialEq)]
pub struct BarConfig {
    /// Space around the plot.
    pub insets: Insets,
    /// Width of one bar; the canvas grows with the number of bars.
    pub bar_width: f64,
    /// Bar color.
    pub fill: Color,
    /// Chart title.
    pub title: String,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
    /// Distance from the canvas edge to the axis titles.
    pub axis_title_margin: f64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            insets: Insets::new(50.0, 50.0, 80.0, 80.0),
            bar_width: 4.0,
            fill: Color::from_rgb8(0x00, 0x59, 0x00),
            title: "United States GDP".into(),
            x_title: "Quarter".into(),
            y_title: "Billions (USD)".into(),
            axis_title_margin: 20.0,
        }
    }
}

impl BarConfig {
    /// Sets the bar width.
    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.bar_width = bar_width;
        self
    }

    /// Sets the bar color.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Canvas size for `bars` bars: the plot is exactly as wide as the bars, and the canvas is
    /// two thirds as tall as it is wide.
    pub fn size(&self, bars: usize) -> Size {
        let width = self.insets.left + bars as f64 * self.bar_width + self.insets.right;
        Size::new(width, (width * 2.0 / 3.0).floor())
    }
}

/// Scales of a bar chart.
#[derive(Clone, Debug, PartialEq)]
pub struct BarScales {
    /// Canvas and plot rectangle.
    pub frame: PlotFrame,
    /// Quarter start dates (epoch seconds) to x.
    pub x: ScaleTime,
    /// GDP to y, zero at the bottom.
    pub y: ScaleLinear,
}

/// Builds the bar chart scales.
///
/// The x domain runs from the first quarter to the end of the last one.
pub fn build_scales(records: &[GdpRecord], config: &BarConfig) -> Result<BarScales> {
    let first = records.iter().map(|r| r.date).min().ok_or(Error::Empty("GDP"))?;
    let last = records.iter().map(|r| r.date).max().ok_or(Error::Empty("GDP"))?;
    let end = last.checked_add_months(Months::new(3)).unwrap_or(last);
    let (_, gdp_max) = extent(records.iter().map(|r| r.gdp)).ok_or(Error::Empty("GDP"))?;

    let frame = PlotFrame::new(config.size(records.len()), config.insets);
    let x = ScaleTime::new((date_to_seconds(first), date_to_seconds(end)), frame.x_range())?;
    let y = ScaleLinear::new((0.0, gdp_max), frame.y_range_inverted())?;
    Ok(BarScales { frame, x, y })
}

/// Assembles bars, axes and title.
pub fn assemble(records: &[GdpRecord], scales: &BarScales, config: &BarConfig) -> ChartDescriptor {
    let BarScales { frame, x, y } = scales;
    let base = y.map(0.0);
    let mut geometry = GeometryDescriptor::default();
    for (i, r) in records.iter().enumerate() {
        let x0 = x.map(date_to_seconds(r.date));
        let top = y.map(r.gdp);
        geometry.push(
            PrimitiveKind::Rect,
            Mark::builder(ids::row(ids::GEOMETRY, i))
                .rect(Rect::new(x0, top.min(base), x0 + config.bar_width, top.max(base)))
                .fill(config.fill)
                .z_index(z_order::GEOMETRY)
                .class("bar")
                .datum(shared(r))
                .build(),
        );
    }

    let view = frame.view;
    let x_axis = AxisSpec::bottom(ids::X_AXIS, *x, frame.plot.y1)
        .with_tick_formatter(|v, _| format_year(v))
        .with_title(config.x_title.clone())
        .with_title_offset(view.y1 - config.axis_title_margin - frame.plot.y1);
    let y_axis = AxisSpec::left(ids::Y_AXIS, *y, frame.plot.x0)
        .with_tick_formatter(format_number)
        .with_title(config.y_title.clone())
        .with_title_offset(frame.plot.x0 - config.axis_title_margin);

    ChartDescriptor {
        kind: ChartKind::Bar,
        size: Size::new(view.width(), view.height()),
        geometry,
        axes: vec![x_axis, y_axis],
        legend: None,
        title: chart_title(&config.title, None, view.width()),
        scales: vec![x.spec(), y.spec()],
    }
}

/// Extracts, scales and assembles a GDP payload.
pub fn chart(raw: &GdpRaw, config: &BarConfig) -> Result<ChartDescriptor> {
    let extracted = raw.extract()?;
    let scales = build_scales(&extracted.records, config)?;
    log::debug!(
        "bar: {} bars ({} dropped)",
        extracted.records.len(),
        extracted.dropped
    );
    Ok(assemble(&extracted.records, &scales, config))
}
